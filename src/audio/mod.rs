pub mod chime;

use chime::Chime;

use anyhow::{anyhow, Result};
use log::warn;
use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Mutex,
};
use std::thread;

use crate::timer::AlertSink;

enum AudioCommand {
    Chime,
}

/// Plays the end-of-interval chime on a dedicated audio thread. The output
/// stream is opened lazily on the first chime and kept for later ones.
pub struct ChimePlayer {
    tx: Mutex<Option<Sender<AudioCommand>>>,
}

impl ChimePlayer {
    pub fn new() -> Self {
        Self {
            tx: Mutex::new(None),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|_| anyhow!("audio sender lock poisoned"))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        // OutputStream is not Send, so it lives and dies on this thread.
        thread::Builder::new()
            .name("chime-audio".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::Chime => {
                            if let Err(err) = ensure_sink(&mut _stream, &mut sink) {
                                warn!("Skipping chime: {err}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(Chime::new());
                            }
                        }
                    }
                }
            })?;

        *guard = Some(tx.clone());
        Ok(tx)
    }
}

impl Default for ChimePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink for ChimePlayer {
    fn chime(&self) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::Chime)
            .map_err(|e| anyhow!("audio thread gone: {e}"))
    }
}
