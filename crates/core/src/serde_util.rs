//! Serde helpers for the backend wire formats.

/// Unix-millis `i64` <-> `DateTime<Utc>`.
///
/// The backend stamps documents with `_created_at` as epoch milliseconds,
/// not ISO 8601 strings.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Mongo hands back whole numbers but some drivers emit floats.
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() {
            return Err(serde::de::Error::custom(format!("Invalid timestamp: {millis}")));
        }
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {millis}")))
    }
}

/// Same as [`timestamp_ms`] for optional fields.
pub mod timestamp_ms_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<i64>::deserialize(deserializer)?;
        millis
            .map(|ms| {
                DateTime::<Utc>::from_timestamp_millis(ms)
                    .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {ms}")))
            })
            .transpose()
    }
}

/// Exchange tickers encode rates as decimal strings (`"42000.12"`), the
/// mock backends as plain numbers. Accept both; `null` reads as `NaN` so a
/// missing rate degrades the projection instead of failing the poll.
pub mod lenient_f64 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Number(n)) => Ok(n),
            Some(Raw::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("Invalid rate '{s}': {e}"))),
            None => Ok(f64::NAN),
        }
    }

    pub fn nan() -> f64 {
        f64::NAN
    }
}
