//! Tolerant field decoders for catalog JSON
//!
//! The catalog reports numbers as strings in some endpoints and as numbers in
//! others (`"duration": "245"` vs `"duration": 245`). These decoders accept
//! both and map anything unparseable to `None`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

pub(crate) fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Unsigned(n)) => Some(n),
        Some(Scalar::Float(f)) if f.is_finite() && f >= 0.0 => Some(f as u64),
        Some(Scalar::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(Scalar::Unsigned(n)) => Some(n.to_string()),
        Some(Scalar::Signed(n)) => Some(n.to_string()),
        _ => None,
    })
}
