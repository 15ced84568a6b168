use anyhow::Result;

/// End-of-interval signal. Called fire-and-forget from the ticker; errors are
/// logged by the caller and otherwise ignored.
pub trait AlertSink: Send + Sync {
    fn chime(&self) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl AlertSink for SilentAlert {
    fn chime(&self) -> Result<()> {
        Ok(())
    }
}
