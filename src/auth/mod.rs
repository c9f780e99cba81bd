pub mod claims;
pub mod context;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use claims::Claims;
pub use context::AuthenticationContext;
pub use jwt::{Rejection, SigningKey, TokenIssuer, TokenValidator};
pub use middleware::{AuthMiddleware, AuthenticatedUser, Authentication, RequestAuthenticator};
pub use password::{Argon2Passwords, PasswordVerifier};
pub use policy::{AuthorizationPolicy, Operation, Requirement};
