use shared::error::CheckoutError;
use tracing::debug;

/// One preloaded sample recording.
pub trait PlaybackHandle: Send {
    fn play(&mut self);
    fn pause(&mut self);
    /// Moves the playhead back to the start without changing play state.
    fn rewind(&mut self);
    fn is_playing(&self) -> bool;
    /// Reports a natural end of playback. Returns `true` once per completion.
    fn has_ended(&mut self) -> bool;
}

/// Owns the sample handles and keeps at most one of them playing.
pub struct PlaybackController {
    handles: Vec<Box<dyn PlaybackHandle>>,
    current: Option<usize>,
}

impl PlaybackController {
    pub fn new(handles: Vec<Box<dyn PlaybackHandle>>) -> Self {
        Self {
            handles,
            current: None,
        }
    }

    pub fn currently_playing(&self) -> Option<usize> {
        self.current
    }

    pub fn playing_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_playing()).count()
    }

    /// Pauses `index` if it is the current sample, otherwise stops and rewinds
    /// every other sample and starts `index`.
    pub fn toggle(&mut self, index: usize) -> Result<Option<usize>, CheckoutError> {
        if index >= self.handles.len() {
            return Err(CheckoutError::UnknownSample(index));
        }

        if self.current == Some(index) {
            self.handles[index].pause();
            self.current = None;
        } else {
            for (i, handle) in self.handles.iter_mut().enumerate() {
                if i != index {
                    handle.pause();
                    handle.rewind();
                }
            }
            self.handles[index].play();
            self.current = Some(index);
        }

        debug!(current = ?self.current, "sample playback toggled");
        Ok(self.current)
    }

    /// Natural completion of `index`; clears state only if it is still current.
    pub fn handle_ended(&mut self, index: usize) -> bool {
        if self.current != Some(index) {
            return false;
        }
        self.current = None;
        true
    }

    /// Routes completions reported by the handles. `true` if state changed.
    pub fn poll_ended(&mut self) -> bool {
        let ended: Vec<usize> = self
            .handles
            .iter_mut()
            .enumerate()
            .filter_map(|(i, handle)| handle.has_ended().then_some(i))
            .collect();

        ended
            .into_iter()
            .fold(false, |changed, index| self.handle_ended(index) || changed)
    }
}

#[cfg(test)]
#[path = "tests/playback_tests.rs"]
mod tests;
