//! Challenge value derivation
//!
//! The challenge value is what actually travels inside the token: either
//! the raw passcode (pass-through, no salt configured) or a PBKDF2-HMAC
//! digest of it. Issue and verify must run with identical parameters —
//! nothing about them is embedded in the token.

use std::num::NonZeroU32;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ring::pbkdf2;

use crate::error::{PasscodeError, Result};

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Default derived key length in bytes.
pub const DEFAULT_KEY_LENGTH: usize = 64;

/// Digest algorithm for the PBKDF2 HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Digest {
    Sha256,
    Sha384,
    #[default]
    Sha512,
}

impl Digest {
    fn algorithm(self) -> pbkdf2::Algorithm {
        match self {
            Digest::Sha256 => pbkdf2::PBKDF2_HMAC_SHA256,
            Digest::Sha384 => pbkdf2::PBKDF2_HMAC_SHA384,
            Digest::Sha512 => pbkdf2::PBKDF2_HMAC_SHA512,
        }
    }
}

/// String encoding applied to the derived key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
}

/// Challenge hashing parameters.
///
/// `salt: None` selects pass-through mode: the challenge value is the
/// passcode itself. That embeds a plaintext-equivalent in the (readable)
/// token payload and is intended for tests, not production.
#[derive(Debug, Clone)]
pub struct HashOptions {
    pub salt: Option<String>,
    pub iterations: u32,
    pub key_length: usize,
    pub digest: Digest,
    pub encoding: Encoding,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            salt: None,
            iterations: DEFAULT_ITERATIONS,
            key_length: DEFAULT_KEY_LENGTH,
            digest: Digest::default(),
            encoding: Encoding::default(),
        }
    }
}

impl HashOptions {
    /// Digest mode with the given salt and default parameters.
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: Some(salt.into()),
            ..Self::default()
        }
    }
}

/// Derive the challenge value for a passcode.
pub(crate) fn derive_challenge(code: &str, options: &HashOptions) -> Result<String> {
    let Some(salt) = options.salt.as_deref() else {
        return Ok(code.to_string());
    };

    let iterations = NonZeroU32::new(options.iterations)
        .ok_or(PasscodeError::InvalidParameter("iterations"))?;
    if options.key_length == 0 {
        return Err(PasscodeError::InvalidParameter("key length"));
    }

    let mut derived = vec![0u8; options.key_length];
    pbkdf2::derive(
        options.digest.algorithm(),
        iterations,
        salt.as_bytes(),
        code.as_bytes(),
        &mut derived,
    );

    Ok(match options.encoding {
        Encoding::Hex => hex::encode(&derived),
        Encoding::Base64 => STANDARD.encode(&derived),
    })
}
