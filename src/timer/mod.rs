pub mod alert;
pub mod controller;
pub mod settings;
pub mod state;

pub use alert::{AlertSink, SilentAlert};
pub use controller::{TimerController, TimerEvent, TimerSnapshot};
pub use settings::{TimerError, TimerSettings, TimerSettingsPatch};
pub use state::{Phase, TickOutcome, TimerState, TimerStatus};
