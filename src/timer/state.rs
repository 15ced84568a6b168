use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Paused,
    Running,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(self) -> bool {
        !matches!(self, Phase::Focus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Idle,
    Counted { remaining: u32 },
    Completed { finished: Phase, next: Phase },
}

/// Pomodoro countdown, without any clock. The controller drives `tick` once
/// per elapsed second while running.
///
/// The long-break flavour is not stored: a break is long when the interval
/// counter has reached `intervals_until_long_break`. The counter only moves
/// when a break ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub settings: TimerSettings,
    pub status: TimerStatus,
    pub on_break: bool,
    pub time_remaining: u32,
    pub current_interval: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl TimerState {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            status: TimerStatus::Paused,
            on_break: false,
            time_remaining: settings.work_interval,
            current_interval: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn phase(&self) -> Phase {
        match (self.on_break, self.long_break_due()) {
            (false, _) => Phase::Focus,
            (true, false) => Phase::ShortBreak,
            (true, true) => Phase::LongBreak,
        }
    }

    /// Returns whether the status changed.
    pub fn start(&mut self) -> bool {
        let changed = !self.is_running();
        self.status = TimerStatus::Running;
        changed
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.is_running();
        self.status = TimerStatus::Paused;
        changed
    }

    /// Pauses and refills the current phase. A long break is refilled with the
    /// plain break length.
    pub fn reset(&mut self) {
        self.status = TimerStatus::Paused;
        self.time_remaining = self.base_duration();
    }

    /// Pauses and moves to the next phase exactly as a finished countdown
    /// would. Returns the phase now current.
    pub fn skip(&mut self) -> Phase {
        self.status = TimerStatus::Paused;
        self.advance();
        self.phase()
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        if self.time_remaining <= 1 {
            let finished = self.phase();
            self.advance();
            return TickOutcome::Completed {
                finished,
                next: self.phase(),
            };
        }

        self.time_remaining -= 1;
        TickOutcome::Counted {
            remaining: self.time_remaining,
        }
    }

    /// Installs new settings. While paused the remaining time is recomputed for
    /// the current phase; a running countdown keeps its remaining time.
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        if !self.is_running() {
            self.time_remaining = self.base_duration();
        }
    }

    fn long_break_due(&self) -> bool {
        self.current_interval >= self.settings.intervals_until_long_break
    }

    fn base_duration(&self) -> u32 {
        if self.on_break {
            self.settings.break_interval
        } else {
            self.settings.work_interval
        }
    }

    fn advance(&mut self) {
        if self.on_break {
            self.on_break = false;
            self.current_interval = if self.long_break_due() {
                1
            } else {
                self.current_interval + 1
            };
            self.time_remaining = self.settings.work_interval;
        } else {
            self.on_break = true;
            self.time_remaining = if self.long_break_due() {
                self.settings.long_break_interval()
            } else {
                self.settings.break_interval
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> TimerState {
        TimerState::new(TimerSettings {
            work_interval: 1500,
            break_interval: 300,
            intervals_until_long_break: 4,
        })
    }

    /// Runs the current phase to completion one tick at a time.
    fn run_out(state: &mut TimerState) -> TickOutcome {
        state.start();
        loop {
            match state.tick() {
                TickOutcome::Counted { .. } => continue,
                outcome => return outcome,
            }
        }
    }

    #[test]
    fn fourth_break_is_tripled_and_counter_wraps() {
        let mut state = standard();
        let mut breaks = Vec::new();

        for cycle in 1..=4 {
            assert_eq!(state.current_interval, cycle);
            assert_eq!(state.phase(), Phase::Focus);

            run_out(&mut state);
            assert!(state.on_break);
            assert_eq!(state.current_interval, cycle, "focus end must not count");
            breaks.push(state.time_remaining);

            run_out(&mut state);
            assert!(!state.on_break);
            assert_eq!(state.time_remaining, 1500);
        }

        assert_eq!(breaks, vec![300, 300, 300, 900]);
        assert_eq!(state.current_interval, 1);
    }

    #[test]
    fn completion_reports_phases_and_keeps_running() {
        let mut state = standard();
        state.current_interval = 4;

        assert_eq!(
            run_out(&mut state),
            TickOutcome::Completed {
                finished: Phase::Focus,
                next: Phase::LongBreak
            }
        );
        assert!(state.is_running());
        assert_eq!(
            run_out(&mut state),
            TickOutcome::Completed {
                finished: Phase::LongBreak,
                next: Phase::Focus
            }
        );
    }

    #[test]
    fn tick_decrements_only_while_running() {
        let mut state = standard();
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.time_remaining, 1500);

        state.start();
        assert_eq!(state.tick(), TickOutcome::Counted { remaining: 1499 });
        state.pause();
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.time_remaining, 1499);
    }

    #[test]
    fn start_and_pause_keep_remaining_and_phase() {
        let mut state = standard();
        state.time_remaining = 42;

        assert!(state.start());
        assert!(!state.start());
        assert!(state.pause());
        assert!(!state.pause());
        assert_eq!(state.time_remaining, 42);
        assert_eq!(state.phase(), Phase::Focus);
    }

    #[test]
    fn reset_during_long_break_restores_plain_break() {
        let mut state = standard();
        state.current_interval = 4;
        state.skip();
        assert_eq!(state.phase(), Phase::LongBreak);
        assert_eq!(state.time_remaining, 900);

        state.start();
        state.tick();
        state.reset();

        assert!(!state.is_running());
        assert_eq!(state.time_remaining, 300);
        assert_eq!(state.phase(), Phase::LongBreak);
    }

    #[test]
    fn reset_in_focus_refills_work_interval() {
        let mut state = standard();
        state.start();
        state.tick();
        state.tick();
        state.reset();

        assert_eq!(state.time_remaining, 1500);
        assert_eq!(state.status, TimerStatus::Paused);
    }

    #[test]
    fn skip_while_running_transitions_once_and_pauses() {
        let mut state = standard();
        state.start();
        state.tick();

        assert_eq!(state.skip(), Phase::ShortBreak);
        assert!(!state.is_running());
        assert_eq!(state.time_remaining, 300);
        assert_eq!(state.current_interval, 1);
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.phase(), Phase::ShortBreak);
    }

    #[test]
    fn skip_out_of_break_counts_like_completion() {
        let mut skipped = standard();
        let mut completed = standard();

        for _ in 0..8 {
            skipped.skip();
            run_out(&mut completed);
            completed.pause();
            assert_eq!(skipped.on_break, completed.on_break);
            assert_eq!(skipped.current_interval, completed.current_interval);
            assert_eq!(skipped.time_remaining, completed.time_remaining);
        }
        assert_eq!(skipped.current_interval, 1);
    }

    #[test]
    fn settings_change_recomputes_only_when_paused() {
        let mut state = standard();
        state.skip();
        state.apply_settings(TimerSettings {
            break_interval: 600,
            ..state.settings
        });
        assert_eq!(state.time_remaining, 600);

        state.start();
        state.tick();
        state.apply_settings(TimerSettings {
            break_interval: 120,
            ..state.settings
        });
        assert_eq!(state.time_remaining, 599);
        assert_eq!(state.settings.break_interval, 120);
    }

    #[test]
    fn lowering_long_break_threshold_below_counter_still_wraps() {
        let mut state = standard();
        state.current_interval = 3;
        state.apply_settings(TimerSettings {
            intervals_until_long_break: 2,
            ..state.settings
        });

        state.skip();
        assert_eq!(state.phase(), Phase::LongBreak);
        state.skip();
        assert_eq!(state.current_interval, 1);
    }
}
