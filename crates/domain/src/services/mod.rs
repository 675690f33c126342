//! Domain services.
//!
//! Services contain business logic that operates on domain models.

pub mod invoice;

pub use invoice::{render_pdf, InvoiceError, InvoiceLine, InvoiceTotals};
