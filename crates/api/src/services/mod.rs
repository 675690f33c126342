//! Application services.

pub mod auth;
pub mod cookies;
pub mod email;
pub mod eta;

pub use auth::{AuthError, AuthService};
pub use cookies::CookieHelper;
pub use email::{EmailAttachment, EmailMessage, EmailService};
pub use eta::{EtaError, EtaQuote, EtaService};
