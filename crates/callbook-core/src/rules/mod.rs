pub mod credentials;
pub mod validation;

pub use credentials::{validate_credentials, MIN_PASSWORD_CHARS};
pub use validation::{
    parse_duration, validate, validate_patch, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
