use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::protocol::IntakePayload;
use url::Url;

use crate::{navigation::Navigator, playback::PlaybackHandle, submission::IntakeClient};

pub(crate) fn page_location(query: &str) -> Url {
    Url::parse(&format!("https://cantodefe.example/checkout{query}")).expect("page url")
}

pub(crate) fn payment_url() -> Url {
    Url::parse("https://pay.example/session/test").expect("payment url")
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    replaced: Mutex<Vec<Url>>,
    assigned: Mutex<Vec<Url>>,
    back_calls: AtomicUsize,
}

impl RecordingNavigator {
    pub(crate) fn replaced(&self) -> Vec<Url> {
        self.replaced.lock().expect("lock").clone()
    }

    pub(crate) fn assigned(&self) -> Vec<Url> {
        self.assigned.lock().expect("lock").clone()
    }

    pub(crate) fn back_calls(&self) -> usize {
        self.back_calls.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn replace_location(&self, location: &Url) {
        self.replaced.lock().expect("lock").push(location.clone());
    }

    fn assign(&self, url: &Url) {
        self.assigned.lock().expect("lock").push(url.clone());
    }

    fn back(&self) {
        self.back_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct RecordingIntake {
    payloads: tokio::sync::Mutex<Vec<IntakePayload>>,
    fail_with: Option<String>,
}

impl RecordingIntake {
    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self {
            payloads: tokio::sync::Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub(crate) async fn payloads(&self) -> Vec<IntakePayload> {
        self.payloads.lock().await.clone()
    }
}

#[async_trait]
impl IntakeClient for RecordingIntake {
    async fn submit(&self, payload: IntakePayload) -> Result<()> {
        self.payloads.lock().await.push(payload);
        match &self.fail_with {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct SampleProbe {
    pub(crate) playing: bool,
    pub(crate) position_secs: u32,
    pub(crate) finished: bool,
    pub(crate) play_calls: usize,
}

pub(crate) struct FakeSample {
    probe: Arc<Mutex<SampleProbe>>,
}

impl PlaybackHandle for FakeSample {
    fn play(&mut self) {
        let mut probe = self.probe.lock().expect("lock");
        probe.playing = true;
        probe.play_calls += 1;
    }

    fn pause(&mut self) {
        self.probe.lock().expect("lock").playing = false;
    }

    fn rewind(&mut self) {
        self.probe.lock().expect("lock").position_secs = 0;
    }

    fn is_playing(&self) -> bool {
        self.probe.lock().expect("lock").playing
    }

    fn has_ended(&mut self) -> bool {
        let mut probe = self.probe.lock().expect("lock");
        if !probe.finished {
            return false;
        }
        probe.finished = false;
        probe.playing = false;
        true
    }
}

pub(crate) type Probe = Arc<Mutex<SampleProbe>>;

pub(crate) fn fake_samples(count: usize) -> (Vec<Box<dyn PlaybackHandle>>, Vec<Probe>) {
    let probes: Vec<Probe> = (0..count)
        .map(|_| Arc::new(Mutex::new(SampleProbe::default())))
        .collect();
    let handles = probes
        .iter()
        .map(|probe| {
            Box::new(FakeSample {
                probe: Arc::clone(probe),
            }) as Box<dyn PlaybackHandle>
        })
        .collect();
    (handles, probes)
}

/// Simulates the sample reaching its natural end.
pub(crate) fn finish(probe: &Probe) {
    probe.lock().expect("lock").finished = true;
}

pub(crate) fn probe_state(probe: &Probe) -> SampleProbe {
    probe.lock().expect("lock").clone()
}
