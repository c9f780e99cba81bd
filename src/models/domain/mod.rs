pub mod question;
pub mod user;
pub use question::{NewQuestion, Question};
pub use user::{Role, User};
