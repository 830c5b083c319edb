use thiserror::Error;

pub type Result<T> = std::result::Result<T, PasscodeError>;

#[derive(Debug, Error)]
pub enum PasscodeError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("Token malformed")]
    TokenMalformed,

    #[error("Invalid token signature")]
    SignatureInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token {0} mismatch")]
    ClaimMismatch(&'static str),

    #[error("Invalid challenge code")]
    InvalidChallenge,

    #[error("Entropy source failure")]
    Entropy,

    #[error("Token engine error: {0}")]
    Jwt(String),
}

impl PasscodeError {
    /// Whether the caller can recover by retrying with corrected input.
    ///
    /// Everything except an entropy failure is caused by the supplied
    /// token, passcode, or parameters.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PasscodeError::Entropy)
    }
}

// Conversions from external error types
impl From<jsonwebtoken::errors::Error> for PasscodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                PasscodeError::TokenMalformed
            }
            ErrorKind::InvalidSignature => PasscodeError::SignatureInvalid,
            ErrorKind::ExpiredSignature => PasscodeError::TokenExpired,
            ErrorKind::InvalidIssuer => PasscodeError::ClaimMismatch("issuer"),
            ErrorKind::InvalidSubject => PasscodeError::ClaimMismatch("subject"),
            ErrorKind::InvalidAudience => PasscodeError::ClaimMismatch("audience"),
            // Tokens we did not issue, e.g. missing exp
            ErrorKind::MissingRequiredClaim(_) => PasscodeError::TokenMalformed,
            _ => PasscodeError::Jwt(err.to_string()),
        }
    }
}

impl From<ring::error::Unspecified> for PasscodeError {
    fn from(_: ring::error::Unspecified) -> Self {
        PasscodeError::Entropy
    }
}
