pub const REQUIRED_EMAIL_DOMAIN: &str = "@gmail.com";

pub fn has_required_domain(value: &str) -> bool {
    value.ends_with(REQUIRED_EMAIL_DOMAIN)
}
