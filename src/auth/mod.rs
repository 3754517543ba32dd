//! OAuth token storage, exchange, and request validation
//!
//! Three pieces: an in-memory [`TokenStore`], an [`OAuthExchanger`] speaking
//! the authorization-code and refresh-token grants, and the request
//! middleware that stitches them together in front of protected routes.

pub mod middleware;
pub mod oauth;
pub mod store;

pub use middleware::{AuthorizedContext, authorize, token_gate};
pub use oauth::OAuthExchanger;
pub use store::TokenStore;
