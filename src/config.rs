use std::{env, path::PathBuf, time::Duration};

const APP_DIR: &str = "pomoplan";
const DEFAULT_DATABASE_FILE: &str = "pomoplan.sqlite3";
const DEFAULT_TICK_MS: u64 = 1_000;

/// Runtime configuration, assembled from defaults and `POMOPLAN_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
    pub tick_interval: Duration,
    pub mute_alerts: bool,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: DEFAULT_DATABASE_FILE.into(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            mute_alerts: false,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("POMOPLAN_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        config.debug = env_flag("POMOPLAN_DEBUG");
        config.mute_alerts = env_flag("POMOPLAN_MUTE");

        if let Some(ms) = env::var("POMOPLAN_TICK_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
        {
            config.tick_interval = Duration::from_millis(ms);
        }

        config
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// `<platform data dir>/pomoplan`, e.g. `~/.local/share/pomoplan` on Linux or
/// `~/Library/Application Support/pomoplan` on macOS.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| env::temp_dir().join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_sqlite_file_in_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/pomoplan-test"),
            ..AppConfig::default()
        };

        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/pomoplan-test/pomoplan.sqlite3")
        );
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert!(!config.mute_alerts);
    }

    #[test]
    fn default_data_dir_is_app_folder_under_platform_data_dir() {
        let data_dir = AppConfig::default().data_dir;

        assert!(data_dir.ends_with(APP_DIR));
        if let Some(platform) = dirs::data_dir() {
            assert_eq!(data_dir, platform.join(APP_DIR));
        }
    }
}
