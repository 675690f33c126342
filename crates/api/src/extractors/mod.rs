//! Request extractors.

pub mod caller;
pub mod session;
pub mod user_auth;

pub use caller::StaffCaller;
pub use session::CartSession;
pub use user_auth::{OptionalUserAuth, UserAuth};
