/// Serde utility functions for common patterns
use serde::{Deserialize, Deserializer};

use crate::backend::Gender;

/// PostgREST renders `numeric` columns as JSON numbers or strings depending on
/// precision. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid numeric value: {:?}", s))),
        }
    }
}

/// Deserialize an optional numeric column that may arrive as a number, a
/// numeric string or `null`.
///
/// Usage:
/// ```ignore
/// #[derive(Deserialize)]
/// struct Course {
///     #[serde(default, deserialize_with = "crate::serde_utils::lenient_f64")]
///     price: Option<f64>,
/// }
/// ```
pub fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(de)?
        .map(NumberOrString::into_f64)
        .transpose()
}

/// Like [`lenient_f64`] for columns declared `not null`.
pub fn required_f64<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(de)?.into_f64()
}

/// Deserialize a gender column case-insensitively. Empty or unknown values
/// become `None`, so one odd row never fails a whole list.
pub fn lenient_gender<'de, D>(de: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.and_then(|g| g.trim().parse().ok()))
}

/// Treat a JSON `null` as the type's default (empty array, `false`).
pub fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
