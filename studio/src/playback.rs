//! Single-source playback.

use std::sync::{Arc, Mutex};

use tracing::debug;
use vocalstudio_audio::PlayableBuffer;
use vocalstudio_audio::device::{DeviceError, OutputContext, SourceHandle};

use crate::lock;

/// Plays one buffer at a time.
///
/// Starting a new buffer stops the previous source first, so at most one
/// source sounds at any moment.
#[derive(Default)]
pub struct PlaybackEngine {
    active: Mutex<Option<Box<dyn SourceHandle>>>,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops whatever is playing and starts `buffer` on `ctx` immediately.
    pub fn play(
        &self,
        buffer: Arc<PlayableBuffer>,
        ctx: &dyn OutputContext,
    ) -> Result<(), DeviceError> {
        let mut active = lock(&self.active);
        if let Some(mut previous) = active.take() {
            previous.stop();
        }
        debug!(
            frames = buffer.length(),
            sample_rate = buffer.sample_rate(),
            "playback start"
        );
        *active = Some(ctx.start(buffer)?);
        Ok(())
    }

    /// Stops the active source. Does nothing when idle.
    pub fn stop(&self) {
        if let Some(mut source) = lock(&self.active).take() {
            source.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.active)
            .as_ref()
            .is_some_and(|source| source.is_playing())
    }
}
