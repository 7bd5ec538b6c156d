/// Returns true for exactly four ASCII digits, a hyphen, then four ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 9 {
        return false;
    }
    bytes.iter().enumerate().all(|(index, byte)| {
        if index == 4 {
            *byte == b'-'
        } else {
            byte.is_ascii_digit()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::is_valid_phone;

    #[test]
    fn accepts_grouped_eight_digits() {
        assert!(is_valid_phone("5551-2345"));
        assert!(is_valid_phone("0000-0000"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(!is_valid_phone("55512345"));
        assert!(!is_valid_phone("555-12345"));
        assert!(!is_valid_phone("5551-23456"));
        assert!(!is_valid_phone("5551 2345"));
        assert!(!is_valid_phone("abcd-efgh"));
        assert!(!is_valid_phone("５５５１-２３４５"));
        assert!(!is_valid_phone(""));
    }
}
