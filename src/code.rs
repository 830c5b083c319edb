//! Random numeric passcode generation

use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{PasscodeError, Result};

/// Maximum supported passcode length in digits.
///
/// A single 64-bit draw covers ~1.8e19 (20 decimal digits); keeping the
/// rightmost 14 digits stays uniform, while longer codes would expose
/// truncation bias from the most-significant end.
pub const MAX_CODE_LENGTH: usize = 14;

/// Generate a random numeric passcode of exactly `length` digits.
///
/// Draws 8 bytes from the system CSPRNG, renders them as an unsigned
/// decimal integer, keeps the rightmost `length` digits and left-pads
/// with `'0'` when the decimal form is shorter.
pub fn random_code(length: usize) -> Result<String> {
    if length == 0 || length > MAX_CODE_LENGTH {
        return Err(PasscodeError::InvalidParameter("code length"));
    }

    let rng = SystemRandom::new();
    let mut buf = [0u8; 8];
    rng.fill(&mut buf)?;

    let digits = u64::from_le_bytes(buf).to_string();
    let tail = if digits.len() > length {
        &digits[digits.len() - length..]
    } else {
        digits.as_str()
    };

    Ok(format!("{tail:0>length$}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_supported_lengths() {
        for length in 1..=MAX_CODE_LENGTH {
            let code = random_code(length).unwrap();
            assert_eq!(code.len(), length, "length {length}");
            assert!(code.chars().all(|c| c.is_ascii_digit()), "code {code}");
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            random_code(0),
            Err(PasscodeError::InvalidParameter("code length"))
        ));
    }

    #[test]
    fn test_oversized_length_rejected() {
        assert!(matches!(
            random_code(MAX_CODE_LENGTH + 1),
            Err(PasscodeError::InvalidParameter("code length"))
        ));
    }

    #[test]
    fn test_codes_vary() {
        // 6-digit codes colliding 10 times in a row would be a broken RNG.
        let first = random_code(6).unwrap();
        let all_equal = (0..10).all(|_| random_code(6).unwrap() == first);
        assert!(!all_equal);
    }
}
