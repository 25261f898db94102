//! Named motor commands for dispatchers and CLIs.

use serde::Deserialize;

use crate::config::units::Degrees;

/// A command a dispatcher can hand to
/// [`StepperMotor::execute`](super::StepperMotor::execute).
///
/// Deserializes from externally tagged data, e.g. `{ move = 45.0 }` or
/// `"center"` in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Relative move by an angle.
    Move(Degrees),
    /// Seek the min endstop and calibrate.
    Min,
    /// Seek the max endstop or the software max position.
    Max,
    /// Move to the middle of the travel.
    Center,
    /// Power the driver.
    Enable,
    /// Unpower the driver.
    Disable,
}

impl Command {
    /// Command name as exposed to dispatchers.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Move(_) => "Move",
            Command::Min => "Min",
            Command::Max => "Max",
            Command::Center => "Center",
            Command::Enable => "Enable",
            Command::Disable => "Disable",
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Script {
        steps: Vec<Command>,
    }

    #[test]
    fn test_parse_commands() {
        let script: Script = toml::from_str(
            r#"
steps = ["enable", "min", { move = -45.0 }, "center"]
"#,
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                Command::Enable,
                Command::Min,
                Command::Move(Degrees(-45.0)),
                Command::Center,
            ]
        );
        assert_eq!(script.steps[2].name(), "Move");
    }
}
