use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

/// Short two-note bell played when an interval ends.
/// Each note is a sine with an exponential decay so it fades instead of clicking off.
pub struct Chime {
    notes: [f32; 2],
    note_samples: usize,
    num_sample: usize,
}

impl Chime {
    pub fn new() -> Self {
        Self::with_notes(880.0, 1320.0, Duration::from_millis(350))
    }

    pub fn with_notes(first: f32, second: f32, note_len: Duration) -> Self {
        let note_samples = (note_len.as_secs_f32() * SAMPLE_RATE as f32) as usize;
        Self {
            notes: [first, second],
            note_samples: note_samples.max(1),
            num_sample: 0,
        }
    }

    fn total_samples(&self) -> usize {
        self.note_samples * self.notes.len()
    }
}

impl Default for Chime {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples() {
            return None;
        }

        let note = self.notes[self.num_sample / self.note_samples];
        let offset = (self.num_sample % self.note_samples) as f32 / SAMPLE_RATE as f32;
        self.num_sample += 1;

        let envelope = (-6.0 * offset).exp();
        Some((2.0 * PI * note * offset).sin() * envelope * 0.25)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples() - self.num_sample.min(self.total_samples()))
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples() as f32 / SAMPLE_RATE as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_and_quiet() {
        let chime = Chime::with_notes(440.0, 660.0, Duration::from_millis(10));
        let expected = chime.total_samples();
        let samples: Vec<f32> = chime.collect();

        assert_eq!(samples.len(), expected);
        assert!(samples.iter().all(|s| s.abs() <= 0.25));
    }
}
