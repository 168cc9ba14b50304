//! Validated domain primitives.
//!
//! Newtype wrappers that are always valid once constructed: an [`Email`]
//! parsed from untrusted input has passed validation; one decoded from the
//! database is trusted as-is.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    InvalidEmail(String),
    InvalidMatricNumber(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            Self::InvalidMatricNumber(msg) => write!(f, "Invalid matric number: {}", msg),
        }
    }
}

// ============================================================================
// Email
// ============================================================================

/// A validated email address.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, format = "email", example = "student@unn.edu.ng")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, ValueTypeError> {
        let email = email.into();
        if email.is_empty() {
            return Err(ValueTypeError::InvalidEmail("email cannot be empty".into()));
        }
        if !email.validate_email() {
            return Err(ValueTypeError::InvalidEmail(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        Ok(Self(email))
    }

    /// Skip validation for values loaded from a trusted source (the
    /// database), where validation already happened on the way in.
    #[inline]
    pub fn new_unchecked(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email({})", self.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Email {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Email {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Email> for String {
    fn from(email: Email) -> String {
        email.0
    }
}

impl Type<sqlx::Postgres> for Email {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for Email {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::new_unchecked(s))
    }
}

impl PgHasArrayType for Email {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// MatricNumber
// ============================================================================

/// A student's matriculation number, e.g. `CSC/2023/001`.
///
/// Normalized to uppercase on construction; permitted characters are
/// letters, digits, `/` and `-`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(value_type = String, example = "CSC/2023/001")]
pub struct MatricNumber(String);

impl MatricNumber {
    const MAX_LEN: usize = 30;

    pub fn new(value: impl Into<String>) -> Result<Self, ValueTypeError> {
        let value = value.into().trim().to_ascii_uppercase();
        if value.is_empty() {
            return Err(ValueTypeError::InvalidMatricNumber(
                "matric number cannot be empty".into(),
            ));
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValueTypeError::InvalidMatricNumber(format!(
                "matric number must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '/' || c == '-')
        {
            return Err(ValueTypeError::InvalidMatricNumber(format!(
                "'{}' contains invalid characters",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Skip validation for values loaded from a trusted source.
    #[inline]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for MatricNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatricNumber({})", self.0)
    }
}

impl fmt::Display for MatricNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatricNumber {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for MatricNumber {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<MatricNumber> for String {
    fn from(matric: MatricNumber) -> String {
        matric.0
    }
}

impl Type<sqlx::Postgres> for MatricNumber {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for MatricNumber {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for MatricNumber {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::new_unchecked(s))
    }
}

impl PgHasArrayType for MatricNumber {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

impl<'de> Deserialize<'de> for MatricNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(Email::new("student@unn.edu.ng").is_ok());
        assert!(Email::new("a.b+c@example.com").is_ok());
    }

    #[test]
    fn invalid_emails() {
        assert!(Email::new("").is_err());
        assert!(Email::new("not-an-email").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@").is_err());
    }

    #[test]
    fn email_deserialize_validates() {
        let ok: Result<Email, _> = serde_json::from_str(r#""a@b.com""#);
        assert!(ok.is_ok());
        let bad: Result<Email, _> = serde_json::from_str(r#""nope""#);
        assert!(bad.is_err());
    }

    #[test]
    fn matric_numbers_normalize_to_uppercase() {
        let matric = MatricNumber::new("csc/2023/001").unwrap();
        assert_eq!(matric.as_str(), "CSC/2023/001");
    }

    #[test]
    fn matric_number_rejects_garbage() {
        assert!(MatricNumber::new("").is_err());
        assert!(MatricNumber::new("   ").is_err());
        assert!(MatricNumber::new("CSC 2023 001").is_err());
        assert!(MatricNumber::new("x".repeat(31)).is_err());
    }
}
