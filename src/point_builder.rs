use crate::field_value::FieldValue;
use crate::point::Point;
use chrono::{DateTime, Utc};
use log::trace;

/// Accumulates the parts of a [`Point`].
///
/// Tags and fields are upserted by key: the last value written for a key
/// wins, while the key keeps the position of its first insertion.
#[derive(Debug, Clone, Default)]
pub struct PointBuilder {
    measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, FieldValue)>,
    timestamp: Option<i64>,
}

impl PointBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn measurement(mut self, measurement: impl Into<String>) -> Self {
        self.set_measurement(measurement);
        self
    }

    pub fn set_measurement(&mut self, measurement: impl Into<String>) {
        self.measurement = measurement.into();
    }

    pub fn get_measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_tag(key, value);
        self
    }

    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        upsert(&mut self.tags, key.into(), value.into());
        self
    }

    pub fn add_tags<K, V>(&mut self, tags: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in tags {
            self.add_tag(key, value);
        }
        self
    }

    pub fn set_tags<K, V>(&mut self, tags: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.clear();
        self.add_tags(tags)
    }

    pub fn get_tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Adds a field from anything convertible to a [`FieldValue`]. Integers
    /// narrower than 64 bits widen to `Integer`, `f32` widens to `Float`.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.add_field(key, value);
        self
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        upsert(&mut self.fields, key.into(), value.into());
        self
    }

    pub fn add_fields<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        for (key, value) in fields {
            self.add_field(key, value);
        }
        self
    }

    pub fn set_fields<K, V>(&mut self, fields: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.clear();
        self.add_fields(fields)
    }

    pub fn get_fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.set_timestamp(Some(timestamp));
        self
    }

    /// Sets the timestamp from a UTC datetime. Datetimes outside the range
    /// representable as i64 nanoseconds (roughly 1677 to 2262) clear it.
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.set_timestamp(time.timestamp_nanos_opt());
        self
    }

    pub fn set_timestamp(&mut self, timestamp: Option<i64>) -> &mut Self {
        self.timestamp = timestamp;
        self
    }

    pub fn get_timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Finalizes into a [`Point`], or `None` when no field was ever set or
    /// the measurement is empty.
    pub fn build(self) -> Option<Point> {
        if self.measurement.is_empty() {
            trace!("build: empty measurement, nothing to emit");
        } else if self.fields.is_empty() {
            trace!(
                "build: no fields for measurement {}, nothing to emit",
                self.measurement
            );
        }
        Point::new(self.measurement, self.tags, self.fields, self.timestamp)
    }
}

fn upsert<V>(entries: &mut Vec<(String, V)>, key: String, value: V) {
    match entries.iter_mut().find(|(existing, _)| *existing == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}
