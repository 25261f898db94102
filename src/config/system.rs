//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::motor::MotorConfig;
use super::switch::LimitSwitchConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Named motor configurations.
    #[serde(default)]
    pub motors: FnvIndexMap<String<32>, MotorConfig, 8>,

    /// Named limit switch configurations.
    #[serde(default)]
    pub limit_switches: FnvIndexMap<String<32>, LimitSwitchConfig, 16>,
}

impl SystemConfig {
    /// Get a motor configuration by name.
    pub fn motor(&self, name: &str) -> Option<&MotorConfig> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Get a limit switch configuration by name.
    pub fn limit_switch(&self, name: &str) -> Option<&LimitSwitchConfig> {
        self.limit_switches
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all motor names.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.motors.keys().map(|s| s.as_str())
    }

    /// List all limit switch names.
    pub fn limit_switch_names(&self) -> impl Iterator<Item = &str> {
        self.limit_switches.keys().map(|s| s.as_str())
    }
}
