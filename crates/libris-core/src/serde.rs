//! Deserialization helpers for query strings and request bodies.

use serde::{Deserialize, Deserializer};

/// Trims search terms. A blank `q=` reads as "no search".
pub fn deserialize_search_term<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Tells an absent field (`None`) apart from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
