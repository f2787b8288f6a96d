//! Lenient field decoders for gateway payloads.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Money may arrive as a JSON number or as a numeric string (`"129.50"`).
/// Anything unparseable decodes as `0.0`.
pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(n)) => n,
        Some(RawAmount::Text(s)) => s.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

/// Counts may arrive as integers, floats or numeric strings (`"2"`). Negative or
/// unparseable values decode as `0`; values past `u32::MAX` saturate.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let from_float = |f: f64| if f.is_finite() && f > 0.0 { f.round() as u64 } else { 0 };
    let raw = match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Unsigned(n)) => n,
        Some(RawCount::Float(f)) => from_float(f),
        Some(RawCount::Text(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(from_float))
                .unwrap_or(0)
        }
        None => 0,
    };
    Ok(u32::try_from(raw).unwrap_or(u32::MAX))
}

/// RFC 3339 timestamps, or naive `YYYY-MM-DD HH:MM:SS` treated as UTC.
/// Missing or unparseable values decode as `None` rather than failing the whole payload.
pub fn timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
