use serde::{Deserialize, Serialize};

/// Single microinverter report as returned by `/api/v1/production/inverters`.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverterReading {
    pub serial_number: String,

    /// Unix timestamp in seconds.
    #[serde(default)]
    pub last_report_date: i64,

    #[serde(rename = "devType", default)]
    pub device_type: i64,

    #[serde(default)]
    pub last_report_watts: i64,

    #[serde(default)]
    pub max_report_watts: i64,
}

/// Payload posted to the receiver.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<'a> {
    pub envoy_serial: &'a str,
    pub inverters: &'a [InverterReading],
}
