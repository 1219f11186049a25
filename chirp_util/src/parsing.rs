use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error)]
pub enum ParsingError {
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid total count: {0}")]
    InvalidTotalCount(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

type Result<T> = std::result::Result<T, ParsingError>;

/// Parse the value of an `X-Total-Count` header.
pub fn parse_total_count(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ParsingError::InvalidTotalCount(value.to_string()))
}

/// Parse an ISO-8601 timestamp, e.g. `2024-03-01T10:00:00.000Z`.
/// Forms without an offset (`2024-03-01T10:00:00`, `2024-03-01`) are read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ParsingError::InvalidTimestamp(value.to_string()))
}

/// Format a timestamp the way browsers do with `Date.toISOString()`.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Append a resource path to a base URL, keeping any path prefix of the base.
pub fn resource_url(base: &Url, resource: &str) -> Result<Url> {
    if base.cannot_be_a_base() {
        return Err(ParsingError::InvalidUrl(base.to_string()));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ParsingError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(resource.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

/// Serde adapter for ISO-8601 timestamps.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter for ids that may arrive as a string or an integer.
pub mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        };
        if id.trim().is_empty() {
            return Err(de::Error::custom("empty id"));
        }
        Ok(id)
    }
}
