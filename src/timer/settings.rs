use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("invalid timer settings: {0}")]
    InvalidSettings(String),
}

/// Interval lengths in seconds, stored per identity under `pomodoro_<id>`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work_interval: u32,
    pub break_interval: u32,
    pub intervals_until_long_break: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_interval: 25 * 60,
            break_interval: 5 * 60,
            intervals_until_long_break: 4,
        }
    }
}

impl TimerSettings {
    pub const LONG_BREAK_MULTIPLIER: u32 = 3;

    pub fn validate(&self) -> Result<(), TimerError> {
        let fields = [
            ("workInterval", self.work_interval),
            ("breakInterval", self.break_interval),
            ("intervalsUntilLongBreak", self.intervals_until_long_break),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(TimerError::InvalidSettings(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }

    pub fn long_break_interval(&self) -> u32 {
        self.break_interval
            .saturating_mul(Self::LONG_BREAK_MULTIPLIER)
    }

    pub fn merged(&self, patch: &TimerSettingsPatch) -> Self {
        Self {
            work_interval: patch.work_interval.unwrap_or(self.work_interval),
            break_interval: patch.break_interval.unwrap_or(self.break_interval),
            intervals_until_long_break: patch
                .intervals_until_long_break
                .unwrap_or(self.intervals_until_long_break),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimerSettingsPatch {
    #[serde(default)]
    pub work_interval: Option<u32>,
    #[serde(default)]
    pub break_interval: Option<u32>,
    #[serde(default)]
    pub intervals_until_long_break: Option<u32>,
}

impl TimerSettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn work_interval(mut self, seconds: u32) -> Self {
        self.work_interval = Some(seconds);
        self
    }

    pub fn break_interval(mut self, seconds: u32) -> Self {
        self.break_interval = Some(seconds);
        self
    }

    pub fn intervals_until_long_break(mut self, count: u32) -> Self {
        self.intervals_until_long_break = Some(count);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_shape_uses_camel_case_seconds() {
        let json = serde_json::to_value(TimerSettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "workInterval": 1500,
                "breakInterval": 300,
                "intervalsUntilLongBreak": 4
            })
        );
    }

    #[test]
    fn merge_only_touches_patched_fields() {
        let merged = TimerSettings::default().merged(&TimerSettingsPatch::new().break_interval(600));
        assert_eq!(merged.work_interval, 1500);
        assert_eq!(merged.break_interval, 600);
        assert_eq!(merged.long_break_interval(), 1800);
    }

    #[test]
    fn zero_values_are_rejected() {
        let settings = TimerSettings {
            intervals_until_long_break: 0,
            ..TimerSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(TimerError::InvalidSettings(msg)) if msg.contains("intervalsUntilLongBreak")
        ));
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        assert!(serde_json::from_str::<TimerSettingsPatch>(r#"{"longBreak":900}"#).is_err());
    }
}
