use std::fmt;

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An instant in time that may be invalid.
///
/// Timestamps restored from storage are coerced rather than rejected: text that
/// does not parse yields an invalid value, which display code renders as
/// `Invalid date`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    /// Current time, truncated to the millisecond precision used on disk.
    pub fn now() -> Self {
        Self(Some(Utc::now().trunc_subsecs(3)))
    }

    pub fn invalid() -> Self {
        Self(None)
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(Some(value))
    }

    pub fn from_unix_ms(value: i64) -> Self {
        Self(Utc.timestamp_millis_opt(value).single())
    }

    pub fn parse(raw: &str) -> Self {
        Self(
            DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|value| value.with_timezone(&Utc)),
        )
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the instant, substituting the current time when invalid.
    pub fn or_now(&self) -> DateTime<Utc> {
        self.0.unwrap_or_else(Utc::now)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(value) => {
                serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> de::Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 3339 timestamp, epoch milliseconds or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Timestamp, E> {
        Ok(Timestamp::parse(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Timestamp, E> {
        Ok(Timestamp::from_unix_ms(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Timestamp, E> {
        Ok(i64::try_from(value)
            .map(Timestamp::from_unix_ms)
            .unwrap_or_default())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Timestamp, E> {
        if value.is_finite() {
            Ok(Timestamp::from_unix_ms(value as i64))
        } else {
            Ok(Timestamp::invalid())
        }
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Timestamp, E> {
        Ok(Timestamp::invalid())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Timestamp, E> {
        Ok(Timestamp::invalid())
    }

    fn visit_none<E: de::Error>(self) -> Result<Timestamp, E> {
        Ok(Timestamp::invalid())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Timestamp, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Timestamp::invalid())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Timestamp, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        while map
            .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
            .is_some()
        {}
        Ok(Timestamp::invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Holder {
        #[serde(default)]
        at: Timestamp,
    }

    fn decode(json: &str) -> Timestamp {
        serde_json::from_str::<Holder>(json)
            .expect("holder should decode")
            .at
    }

    #[test]
    fn serializes_as_iso_text_with_millis() {
        let ts = Timestamp::from_unix_ms(1_700_000_000_123);
        let json = serde_json::to_string(&Holder { at: ts }).expect("serialize");

        assert_eq!(json, r#"{"at":"2023-11-14T22:13:20.123Z"}"#);
    }

    #[test]
    fn restores_text_timestamps_to_the_same_instant() {
        let original = Timestamp::now();
        let json = serde_json::to_string(&Holder { at: original }).expect("serialize");

        assert_eq!(decode(&json), original);
    }

    #[test]
    fn accepts_epoch_milliseconds() {
        assert_eq!(
            decode(r#"{"at":1700000000123}"#),
            Timestamp::from_unix_ms(1_700_000_000_123)
        );
    }

    #[test]
    fn malformed_or_missing_values_become_invalid_instead_of_failing() {
        assert!(!decode(r#"{"at":"yesterday-ish"}"#).is_valid());
        assert!(!decode(r#"{"at":null}"#).is_valid());
        assert!(!decode(r#"{"at":{"nested":true}}"#).is_valid());
        assert!(!decode(r#"{}"#).is_valid());
    }

    #[test]
    fn invalid_timestamps_serialize_as_null() {
        let json = serde_json::to_string(&Holder {
            at: Timestamp::invalid(),
        })
        .expect("serialize");

        assert_eq!(json, r#"{"at":null}"#);
    }
}
