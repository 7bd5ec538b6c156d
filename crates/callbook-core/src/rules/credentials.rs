use crate::error::CredentialsError;

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Local checks run before a sign-in round trip is attempted.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), CredentialsError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(CredentialsError::EmptyCredentials);
    }
    if !looks_like_email(email) {
        return Err(CredentialsError::InvalidLoginEmail);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(CredentialsError::PasswordTooShort(MIN_PASSWORD_CHARS));
    }
    Ok(())
}

// local@domain.tld, no whitespace, a single '@', and a dot inside the domain.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::{validate_credentials, MIN_PASSWORD_CHARS};
    use crate::error::CredentialsError;

    #[test]
    fn accepts_well_formed_credentials() {
        assert!(validate_credentials("agent@callcenter.com", "secret1").is_ok());
        assert!(validate_credentials(" agent@mail.co.uk ", "123456").is_ok());
    }

    #[test]
    fn rejects_empty_values_first() {
        assert_eq!(
            validate_credentials("", "x"),
            Err(CredentialsError::EmptyCredentials)
        );
        assert_eq!(
            validate_credentials("not-an-email", ""),
            Err(CredentialsError::EmptyCredentials)
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "agent",
            "agent@",
            "@mail.com",
            "agent@mail",
            "agent@mail.",
            "agent@.com",
            "a b@mail.com",
            "a@b@mail.com",
        ] {
            assert_eq!(
                validate_credentials(email, "secret1"),
                Err(CredentialsError::InvalidLoginEmail),
                "{email}"
            );
        }
    }

    #[test]
    fn rejects_short_passwords() {
        assert_eq!(
            validate_credentials("agent@mail.com", "12345"),
            Err(CredentialsError::PasswordTooShort(MIN_PASSWORD_CHARS))
        );
    }
}
