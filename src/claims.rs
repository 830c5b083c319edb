//! Claim set filtering and construction

use serde_json::{Map, Value};

/// A decoded or to-be-signed claim set.
pub type Claims = Map<String, Value>;

/// Return a new claim set containing only the entries the predicate accepts.
///
/// The input is never mutated.
pub fn filter<F>(claims: &Claims, predicate: F) -> Claims
where
    F: Fn(&str, &Value) -> bool,
{
    claims
        .iter()
        .filter(|(key, value)| predicate(key, value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Drop entries whose value is `null`.
///
/// Emitted tokens must not carry placeholder claims: a binding claim that
/// is absent means "do not check", which `null` would break downstream.
pub fn drop_nulls(claims: &Claims) -> Claims {
    filter(claims, |_, value| !value.is_null())
}

/// Ordered claim set builder.
///
/// Caller payload is applied first, reserved system fields last, so the
/// library's identifier, timestamps and challenge claims always win on a
/// key collision.
#[derive(Debug, Default)]
pub(crate) struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    pub fn with_payload(payload: &Claims) -> Self {
        Self {
            claims: drop_nulls(payload),
        }
    }

    /// Set a reserved claim, overwriting any caller-supplied value.
    pub fn reserved(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.claims.insert(key.to_string(), value.into());
        self
    }

    /// Set a reserved claim only when a value is present.
    pub fn reserved_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.reserved(key, value),
            None => self,
        }
    }

    pub fn build(self) -> Claims {
        self.claims
    }
}
