//! Serde helpers storing `DateTime<Utc>` as fractional Unix epoch seconds.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn to_epoch_secs(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_micros() as f64 / 1_000_000.0
}

pub fn from_epoch_secs<E: de::Error>(secs: f64) -> Result<DateTime<Utc>, E> {
    if !secs.is_finite() {
        return Err(E::custom(format!("invalid timestamp {secs}")));
    }
    DateTime::from_timestamp_micros((secs * 1_000_000.0).round() as i64)
        .ok_or_else(|| E::custom(format!("timestamp out of range: {secs}")))
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(to_epoch_secs(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    from_epoch_secs(f64::deserialize(deserializer)?)
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&to_epoch_secs(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(from_epoch_secs)
            .transpose()
    }
}
