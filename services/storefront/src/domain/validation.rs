//! Request-body validation.
//!
//! Bodies go through three steps:
//! 1. serde deserialization, where the helpers in [`de`] strip markup from
//!    strings, turn numeric strings into numbers and map empty optionals to
//!    `None`;
//! 2. `validator` constraint checks declared on the input struct;
//! 3. conversion of every violation into a [`FieldError`] with a camelCase
//!    path matching the JSON the client sent.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Remove anything that looks like a tag, then trim.
///
/// Idempotent: a `<` left behind has no `>` after it, so a second pass
/// finds nothing to remove.
pub fn sanitize_text(input: &str) -> String {
    TAG.replace_all(input, "").trim().to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every violation found in one request body, ordered by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            path: path.into(),
            message: message.into(),
        }])
    }

    /// Message shown to the user when only one line fits.
    pub fn headline(&self) -> &str {
        self.0
            .first()
            .map_or("invalid request", |e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let path = camel_case(&field);
                errs.iter().map(move |err| FieldError {
                    path: path.clone(),
                    message: err
                        .message
                        .as_ref()
                        .map_or_else(|| format!("{path} is invalid"), |m| m.to_string()),
                })
            })
            .collect();
        out.sort_by(|a, b| a.path.cmp(&b.path));
        Self(out)
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Deserialize `payload` into `T` and run its declared constraints.
///
/// Type mismatches stop at the first offending field; constraint violations
/// are all collected.
pub fn validate<T>(payload: serde_json::Value) -> Result<T, FieldErrors>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        if path == "." {
            FieldErrors::single("body", "request body must be a JSON object")
        } else {
            FieldErrors::single(path, err.into_inner().to_string())
        }
    })?;
    value.validate()?;
    Ok(value)
}

/// `deserialize_with` helpers for untrusted input.
pub mod de {
    use std::fmt;
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::de::{self, Deserialize, Deserializer, Visitor};

    use super::sanitize_text;

    /// Sanitized string; `null` becomes empty so length checks report it.
    pub fn sanitized<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().map(sanitize_text).unwrap_or_default())
    }

    /// Sanitized string, `None` when null or empty after sanitizing.
    pub fn optional_sanitized<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw
            .as_deref()
            .map(sanitize_text)
            .filter(|s| !s.is_empty()))
    }

    /// Every element sanitized; `null` becomes an empty list.
    pub fn sanitized_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Vec<String>>::deserialize(d)?;
        Ok(raw
            .unwrap_or_default()
            .iter()
            .map(|s| sanitize_text(s))
            .collect())
    }

    /// Trimmed but otherwise untouched, for values such as email addresses.
    pub fn trimmed<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().map(str::trim).unwrap_or_default().to_owned())
    }

    const WHOLE_NUMBER: &str = "must be a whole number";

    struct LenientInt;

    impl Visitor<'_> for LenientInt {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(WHOLE_NUMBER))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.fract() == 0.0 && v.abs() < 1e15 {
                Ok(v as i64)
            } else {
                Err(E::custom(WHOLE_NUMBER))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim().parse().map_err(|_| E::custom(WHOLE_NUMBER))
        }

        // Missing and null both fall through to the range check.
        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    /// Integer from a JSON number or a numeric string.
    pub fn lenient_int<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(LenientInt)
    }

    const DECIMAL: &str = "must be a number";

    struct LenientDecimal;

    impl Visitor<'_> for LenientDecimal {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        // Go through the shortest round-trip text so 49.99 stays 49.99.
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Decimal::from_str(&v.to_string())
                .map(Some)
                .map_err(|_| E::custom(DECIMAL))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Decimal::from_str(v.trim())
                .map(Some)
                .map_err(|_| E::custom(DECIMAL))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    /// Decimal from a JSON number or a numeric string; `null` is `None`.
    pub fn lenient_decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(LenientDecimal)
    }
}
