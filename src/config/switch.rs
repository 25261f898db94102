//! Limit switch configuration from TOML.

use serde::Deserialize;

/// Polarity settings for one limit switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitSwitchConfig {
    /// `true` for normally-open switches that read high once the end is
    /// reached (most mechanical endstops). `false` inverts this (many
    /// optical endstops).
    pub default_open: bool,
}

impl Default for LimitSwitchConfig {
    fn default() -> Self {
        Self { default_open: true }
    }
}
