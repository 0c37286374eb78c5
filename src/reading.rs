//! The telemetry record and its wire encoding

use serde::{Deserialize, Serialize};

/// One environmental sample, the unit of transmission
///
/// Serialized as a single JSON object. No timestamp travels with the
/// reading; the collector stamps arrival time and keys its store on
/// `(location, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Install-point label of the sending device
    pub location: String,
    /// Device id in colon-hex MAC format
    pub device_id: String,
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity percentage
    pub humidity: f32,
    /// Hectopascals
    pub air_pressure: f32,
}

impl Reading {
    /// Build a reading from raw sensor values
    ///
    /// `pressure_pa` is the barometer's raw Pascal reading; it is stored
    /// in hectopascals. Non-finite values from a faulted sensor are kept
    /// as-is; validation is the collector's problem.
    pub fn new(
        location: impl Into<String>,
        device_id: impl Into<String>,
        temperature: f32,
        humidity: f32,
        pressure_pa: f32,
    ) -> Self {
        Self {
            location: location.into(),
            device_id: device_id.into(),
            temperature,
            humidity,
            air_pressure: pressure_pa / 100.0,
        }
    }

    /// Encode for transmission
    ///
    /// Returns the JSON form without a line terminator; the session
    /// appends the newline on write. A reading is a flat struct of
    /// strings and numbers, so serialization cannot fail.
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("reading serialization is infallible")
    }
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\",{},{:.1}\u{00b0}C,{:.1}%,{:.1}hpa",
            self.location, self.device_id, self.temperature, self.humidity, self.air_pressure
        )
    }
}
