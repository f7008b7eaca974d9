use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::AlertSeverity;

/// Latest pollutant reading for one location. Concentrations are µg/m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "city")]
    pub location: String,
    #[serde(rename = "aqi")]
    pub index: f64,
    #[serde(rename = "pm25")]
    pub pm2_5: f64,
    pub pm10: f64,
    pub co: f64,
    #[serde(default)]
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub nh3: f64,
    #[serde(rename = "timestamp", deserialize_with = "deserialize_observed_at")]
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub time: String,
    #[serde(rename = "aqi")]
    pub index: f64,
    #[serde(default, rename = "pm25", skip_serializing_if = "Option::is_none")]
    pub pm2_5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub day: String,
    #[serde(rename = "predicted_aqi")]
    pub predicted_index: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub location: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub time: String,
}

/// Accepts RFC 3339 timestamps, and naive ISO-8601 ones (read as UTC) since the
/// backend emits those when it runs without timezone support.
fn deserialize_observed_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_observed_at(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid reading timestamp '{raw}'"))
    })
}

pub fn parse_observed_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
