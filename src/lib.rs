//! Stateless challenge-passcode tokens
//!
//! Issues short-lived signed tokens bound to a single-use numeric passcode
//! and verifies a token/passcode pair without any server-side session state.
//! The passcode itself never travels in the token — only a challenge value
//! derived from it (PBKDF2 digest, or the raw code in the unsalted test
//! mode).
//!
//! **Security design**:
//! - HS256 signature over the full claim set; expiry enforced with zero leeway
//! - Optional issuer/subject/audience binding, checked before the challenge
//! - JWT ID (jti) on every token for correlation and replay tracking
//! - Reserved claims are applied after caller payload and cannot be shadowed
//! - Challenge comparison is constant-time
//!
//! ```no_run
//! use passcode_core::{issue, verify, Claims, HashOptions, SecurityOptions};
//!
//! let security = SecurityOptions::new("signing-secret");
//! let hash = HashOptions::with_salt("per-deployment-salt");
//!
//! let issued = issue(&Claims::new(), &security, &hash)?;
//! // deliver issued.code out-of-band, hand issued.token to the client...
//!
//! let presented = SecurityOptions {
//!     code: Some(issued.code),
//!     ..SecurityOptions::new("signing-secret")
//! };
//! let claims = verify(&issued.token, &presented, &hash)?;
//! # Ok::<(), passcode_core::PasscodeError>(())
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod challenge;
pub mod claims;
pub mod code;
pub mod error;

pub use challenge::{Digest, Encoding, HashOptions, DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH};
pub use claims::{drop_nulls, filter, Claims};
pub use code::{random_code, MAX_CODE_LENGTH};
pub use error::{PasscodeError, Result};

use claims::ClaimsBuilder;

/// Reserved claim carrying the challenge value.
///
/// The `$` prefix keeps it out of the ordinary claim namespace; the claim
/// is stripped before decoded claims are returned to the caller.
const CHALLENGE_CLAIM: &str = "$challenge";

/// Default passcode length in digits.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default token lifetime in seconds (5 minutes).
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 300;

/// Signing and binding parameters, supplied fresh on every call.
///
/// `None` for a binding claim means "do not emit / do not check". The JWT
/// algorithm is fixed at HS256 over `secret`.
#[derive(Debug, Clone)]
pub struct SecurityOptions {
    /// Signing secret. Required; an empty secret is rejected.
    pub secret: String,
    /// Explicit passcode. At issue it overrides generation; at verify it is
    /// the candidate the caller presented (defaults to the empty string).
    pub code: Option<String>,
    /// Length of generated passcodes, 1..=[`MAX_CODE_LENGTH`].
    pub code_length: usize,
    /// Token lifetime, added to the issue timestamp. May be negative.
    pub expires_in: Duration,
    pub issuer: Option<String>,
    pub subject: Option<String>,
    pub audience: Option<String>,
}

impl Default for SecurityOptions {
    fn default() -> Self {
        Self {
            secret: String::new(),
            code: None,
            code_length: DEFAULT_CODE_LENGTH,
            expires_in: Duration::seconds(DEFAULT_EXPIRES_IN_SECS),
            issuer: None,
            subject: None,
            audience: None,
        }
    }
}

impl SecurityOptions {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }
}

/// Result of a successful [`issue`] call.
///
/// `code` is the plaintext passcode for out-of-band delivery to the end
/// user; it appears nowhere in `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedChallenge {
    /// Token identifier (`jti` claim).
    pub id: String,
    /// Expiration as a Unix timestamp (`exp` claim).
    pub expires: i64,
    /// Compact signed token.
    pub token: String,
    /// Plaintext passcode.
    pub code: String,
}

/// Issue a challenge token.
///
/// Caller payload fields become claims (null entries dropped). `iat` and
/// `jti` may be supplied through the payload; they default to the current
/// time and a fresh UUID. Reserved fields — binding claims, timestamps and
/// the challenge value — are applied last and win over payload collisions.
///
/// Expiry is computed from the resolved issue time, so a back-dated `iat`
/// back-dates `exp` with it.
pub fn issue(
    payload: &Claims,
    security: &SecurityOptions,
    hash: &HashOptions,
) -> Result<IssuedChallenge> {
    if security.secret.is_empty() {
        return Err(PasscodeError::MissingParameter("secret"));
    }

    let code = match &security.code {
        Some(code) => code.clone(),
        None => random_code(security.code_length)?,
    };

    if hash.salt.is_none() {
        warn!("issuing challenge without a salt - token embeds the raw passcode");
    }
    let challenge = challenge::derive_challenge(&code, hash)?;

    let now = Utc::now().timestamp();
    let iat = payload.get("iat").and_then(Value::as_i64).unwrap_or(now);
    let jti = payload
        .get("jti")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let exp = iat + security.expires_in.num_seconds();

    let token_claims = ClaimsBuilder::with_payload(payload)
        .reserved_opt("iss", security.issuer.as_deref())
        .reserved_opt("sub", security.subject.as_deref())
        .reserved_opt("aud", security.audience.as_deref())
        .reserved("iat", iat)
        .reserved("jti", jti.as_str())
        .reserved("exp", exp)
        .reserved(CHALLENGE_CLAIM, challenge.as_str())
        .build();

    let token = encode(
        &Header::default(),
        &token_claims,
        &EncodingKey::from_secret(security.secret.as_bytes()),
    )?;

    debug!(%jti, expires = exp, "challenge token issued");

    Ok(IssuedChallenge {
        id: jti,
        expires: exp,
        token,
        code,
    })
}

/// Verify a challenge token against a presented passcode.
///
/// Signature, expiry and any configured binding claims are checked first,
/// each failure mapping to its own error. Only then is the challenge value
/// recomputed from `security.code` and compared, in constant time, against
/// the embedded one; any mismatch is [`PasscodeError::InvalidChallenge`].
///
/// On success the challenge claim is stripped and the remaining claims
/// returned. Hash parameters must match the ones used at issuance exactly —
/// a mismatch is indistinguishable from a wrong passcode.
pub fn verify(token: &str, security: &SecurityOptions, hash: &HashOptions) -> Result<Claims> {
    if token.is_empty() {
        return Err(PasscodeError::MissingParameter("token"));
    }
    if security.secret.is_empty() {
        return Err(PasscodeError::MissingParameter("secret"));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    if let Some(issuer) = &security.issuer {
        validation.set_issuer(&[issuer]);
    }
    validation.sub = security.subject.clone();
    match &security.audience {
        Some(audience) => validation.set_audience(&[audience]),
        // An absent binding means the claim is not checked, even when the
        // token carries one.
        None => validation.validate_aud = false,
    }

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(security.secret.as_bytes()),
        &validation,
    )?;
    let mut decoded_claims = decoded.claims;

    let candidate = security.code.as_deref().unwrap_or("");
    let challenge = challenge::derive_challenge(candidate, hash)?;

    let matches = decoded_claims
        .get(CHALLENGE_CLAIM)
        .and_then(Value::as_str)
        .is_some_and(|embedded| {
            constant_time_eq::constant_time_eq(embedded.as_bytes(), challenge.as_bytes())
        });
    if !matches {
        return Err(PasscodeError::InvalidChallenge);
    }

    decoded_claims.remove(CHALLENGE_CLAIM);

    debug!(
        jti = decoded_claims.get("jti").and_then(serde_json::Value::as_str),
        "challenge token verified"
    );

    Ok(decoded_claims)
}
