//! Account authentication: password hashing, token issue/verification and the
//! request middleware that turns a bearer token into an `AuthContext`.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::JwtService;
pub use middleware::AuthState;
pub use models::{AdminContext, AuthContext, JwtClaims, MaybeAuth};
