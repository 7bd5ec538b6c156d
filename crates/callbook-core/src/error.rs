use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("all required fields must be filled in")]
    MissingFields,
    #[error("customer name must not contain digits")]
    InvalidName,
    #[error("customer phone must use the format XXXX-XXXX")]
    InvalidPhone,
    #[error("customer email must end with @gmail.com")]
    InvalidEmail,
    #[error("call duration must be a whole number between 1 and 60")]
    InvalidDuration,
    #[error("agent name must not contain digits")]
    InvalidAgentName,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("email and password are required")]
    EmptyCredentials,
    #[error("email must look like name@domain.tld")]
    InvalidLoginEmail,
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
}
