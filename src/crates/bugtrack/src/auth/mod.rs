//! Authentication context
//!
//! Login sessions and the extractors that turn a request's bearer token into
//! an explicit, request-scoped [`LoggedInUser`].

pub mod extract;
pub mod session;

pub use extract::{AdminUser, CurrentUser, MaybeUser};
pub use session::{LoggedInUser, SessionStore};
