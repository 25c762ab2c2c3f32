pub mod validator;

pub use validator::{FeedMessageValidator, ValidationResult};
