//! Local credential checks, run before the identity provider is contacted

use crate::error::{AuthError, Result};

/// Accepts E.164 (`+` and 8 to 15 digits) or a bare 10-digit mobile number
pub fn validate_phone(phone: &str) -> Result<()> {
    let valid = match phone.strip_prefix('+') {
        Some(digits) => (8..=15).contains(&digits.len()) && all_digits(digits),
        None => phone.len() == 10 && all_digits(phone),
    };

    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidPhone)
    }
}

/// OTPs are exactly six ASCII digits
pub fn validate_otp(otp: &str) -> Result<()> {
    if otp.len() == 6 && all_digits(otp) {
        Ok(())
    } else {
        Err(AuthError::InvalidOtp)
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats() {
        assert!(validate_phone("+911234567890").is_ok());
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+12345678").is_ok());

        assert!(matches!(validate_phone(""), Err(AuthError::InvalidPhone)));
        assert!(matches!(validate_phone("+1234567"), Err(AuthError::InvalidPhone)));
        assert!(matches!(validate_phone("98765 43210"), Err(AuthError::InvalidPhone)));
        assert!(matches!(validate_phone("987654321"), Err(AuthError::InvalidPhone)));
        assert!(matches!(validate_phone("+91-1234567890"), Err(AuthError::InvalidPhone)));
    }

    #[test]
    fn test_otp_format() {
        assert!(validate_otp("000000").is_ok());
        assert!(matches!(validate_otp("12345"), Err(AuthError::InvalidOtp)));
        assert!(matches!(validate_otp("12345a"), Err(AuthError::InvalidOtp)));
        assert!(matches!(validate_otp("１２３４５６"), Err(AuthError::InvalidOtp)));
    }
}
