//! Key paths of the four sections of an integration's strings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Entity platforms the integration provides names for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    /// `binary_sensor`
    BinarySensor,
    /// `button`
    Button,
    /// `climate`
    Climate,
    /// `number`
    Number,
    /// `sensor`
    Sensor,
    /// `water_heater`
    WaterHeater,
}

impl Platform {
    /// Every platform, in key order.
    pub const ALL: [Self; 6] = [
        Self::BinarySensor,
        Self::Button,
        Self::Climate,
        Self::Number,
        Self::Sensor,
        Self::WaterHeater,
    ];

    /// Platform name as written in key paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BinarySensor => "binary_sensor",
            Self::Button => "button",
            Self::Climate => "climate",
            Self::Number => "number",
            Self::Sensor => "sensor",
            Self::WaterHeater => "water_heater",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform name that is not one of [`Platform::ALL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown entity platform '{0}'")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Steps of the configuration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    /// Initial setup.
    User,
    /// Asking for credentials again after they stopped working.
    ReauthConfirm,
}

impl FlowStep {
    /// Step name as written in key paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::ReauthConfirm => "reauth_confirm",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `entity.<platform>.<key>.name`
#[must_use]
pub fn entity_name(platform: Platform, key: &str) -> String {
    format!("entity.{platform}.{key}.name")
}

/// `config.step.<step>.description`
#[must_use]
pub fn step_description(step: FlowStep) -> String {
    format!("config.step.{step}.description")
}

/// `config.step.<step>.data.<field>`
#[must_use]
pub fn step_field_label(step: FlowStep, field: &str) -> String {
    format!("config.step.{step}.data.{field}")
}

/// `config.step.<step>.data_description.<field>`
#[must_use]
pub fn step_field_description(step: FlowStep, field: &str) -> String {
    format!("config.step.{step}.data_description.{field}")
}

/// `config.error.<code>`
#[must_use]
pub fn flow_error(code: &str) -> String {
    format!("config.error.{code}")
}

/// `config.abort.<reason>`
#[must_use]
pub fn flow_abort(reason: &str) -> String {
    format!("config.abort.{reason}")
}

/// `exceptions.<key>.message`
#[must_use]
pub fn exception_message(key: &str) -> String {
    format!("exceptions.{key}.message")
}

/// `services.<service>.name`
#[must_use]
pub fn service_name(service: &str) -> String {
    format!("services.{service}.name")
}

/// `services.<service>.description`
#[must_use]
pub fn service_description(service: &str) -> String {
    format!("services.{service}.description")
}

/// `services.<service>.fields.<field>.name`
#[must_use]
pub fn service_field_name(service: &str, field: &str) -> String {
    format!("services.{service}.fields.{field}.name")
}

/// `services.<service>.fields.<field>.description`
#[must_use]
pub fn service_field_description(service: &str, field: &str) -> String {
    format!("services.{service}.fields.{field}.description")
}

/// Splits an entity key path into its platform and entity key.
///
/// `entity.sensor.outside_temperature.name` -> `("sensor", "outside_temperature")`
#[must_use]
pub fn split_entity_key(key: &str) -> Option<(&str, &str)> {
    let mut parts = key.strip_prefix("entity.")?.splitn(3, '.');
    let platform = parts.next()?;
    let entity = parts.next()?;
    Some((platform, entity))
}
