//! Logger bootstrap.
//!
//! `RUST_LOG` wins when set; otherwise the level comes from the config's
//! debug flag.

use crate::config::AppConfig;

pub fn init(config: &AppConfig) {
    let level = if config.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // try_init so tests and embedders that already installed a logger keep it.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
