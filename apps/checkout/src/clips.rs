use std::time::{Duration, Instant};

use checkout_core::PlaybackHandle;
use shared::domain::SampleSong;
use tracing::debug;

/// Sample preview driven by a wall clock instead of an audio device.
pub struct PreviewClip {
    title: &'static str,
    length: Duration,
    offset: Duration,
    started_at: Option<Instant>,
}

impl PreviewClip {
    pub fn new(song: &SampleSong, length: Duration) -> Self {
        Self {
            title: song.title,
            length,
            offset: Duration::ZERO,
            started_at: None,
        }
    }

    pub fn position(&self) -> Duration {
        let running = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        (self.offset + running).min(self.length)
    }
}

impl PlaybackHandle for PreviewClip {
    fn play(&mut self) {
        if self.started_at.is_some() {
            return;
        }
        if self.offset >= self.length {
            self.offset = Duration::ZERO;
        }
        self.started_at = Some(Instant::now());
        debug!(title = self.title, offset_ms = self.offset.as_millis() as u64, "clip playing");
    }

    fn pause(&mut self) {
        if self.started_at.is_some() {
            self.offset = self.position();
            self.started_at = None;
        }
    }

    fn rewind(&mut self) {
        self.offset = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some() && self.position() < self.length
    }

    fn has_ended(&mut self) -> bool {
        if self.started_at.is_none() || self.position() < self.length {
            return false;
        }
        self.offset = self.length;
        self.started_at = None;
        debug!(title = self.title, "clip ended");
        true
    }
}

pub fn preview_clips(songs: &[SampleSong], length: Duration) -> Vec<Box<dyn PlaybackHandle>> {
    songs
        .iter()
        .map(|song| Box::new(PreviewClip::new(song, length)) as Box<dyn PlaybackHandle>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::SAMPLE_SONGS;

    #[test]
    fn clip_ends_once_after_its_length() {
        let mut clip = PreviewClip::new(&SAMPLE_SONGS[0], Duration::from_millis(5));
        clip.play();
        std::thread::sleep(Duration::from_millis(20));

        assert!(!clip.is_playing());
        assert!(clip.has_ended());
        assert!(!clip.has_ended());
    }

    #[test]
    fn pause_keeps_position_and_rewind_resets_it() {
        let mut clip = PreviewClip::new(&SAMPLE_SONGS[1], Duration::from_secs(60));
        clip.play();
        std::thread::sleep(Duration::from_millis(10));
        clip.pause();

        let paused_at = clip.position();
        assert!(paused_at > Duration::ZERO);
        assert!(!clip.is_playing());
        assert_eq!(clip.position(), paused_at);

        clip.rewind();
        assert_eq!(clip.position(), Duration::ZERO);
    }
}
