use crate::config::Precision;
use crate::field_value::FieldValue;
use crate::point::Point;
use crate::point_builder::PointBuilder;
use anyhow::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One JSON input record, e.g.
/// `{"measurement":"weather","tags":{"location":"us-midwest"},"fields":{"temperature":82.0},"timestamp":1465839830100400200}`.
#[derive(Debug, Deserialize)]
pub struct PointRecord {
    pub measurement: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl PointRecord {
    pub fn from_json(json: &str) -> Result<PointRecord, Error> {
        Ok(serde_json::from_str(json)?)
    }

    #[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
    pub fn into_point(self, precision: &Precision) -> Result<Option<Point>, Error> {
        // Converts the record to a Point, scaling the timestamp to nanoseconds

        let timestamp = match self.timestamp {
            Some(timestamp) => Some(precision.to_nanoseconds(timestamp)?),
            None => None,
        };

        let mut builder = PointBuilder::new().measurement(self.measurement);
        builder
            .add_tags(self.tags)
            .add_fields(self.fields)
            .set_timestamp(timestamp);
        Ok(builder.build())
    }
}
