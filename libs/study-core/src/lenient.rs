//! Best-effort field deserializers for records read back from storage.
//!
//! A field that does not decode becomes `None` instead of failing the whole
//! record, so one bad document never blocks a statistics snapshot.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OrIgnored<T> {
    Value(T),
    Ignored(IgnoredAny),
}

/// Decode `T`, or `None` for null and values of the wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OrIgnored::<T>::deserialize(deserializer)? {
        OrIgnored::Value(value) => Some(value),
        OrIgnored::Ignored(_) => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Number(f64),
    Text(String),
    Ignored(IgnoredAny),
}

/// Decode a score given as a number or a numeric string. Non-finite values
/// are treated as missing.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => Some(n),
        RawScore::Text(s) => s.trim().parse::<f64>().ok(),
        RawScore::Ignored(_) => None,
    };
    Ok(score.filter(|s| s.is_finite()))
}
