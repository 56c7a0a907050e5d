use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    domain::{OrderField, OrderPreferences, OrderSummary},
    error::CheckoutError,
};
use storage::SessionStore;
use tokio::sync::broadcast;
use tracing::{debug, info};
use url::Url;

use crate::{
    events::{CheckoutEvent, Notice},
    form_state::FormState,
    navigation::Navigator,
    playback::{PlaybackController, PlaybackHandle},
    submission::{IntakeClient, SubmissionHandoff, SubmissionReceipt},
};

pub const CHANGES_SAVED_MESSAGE: &str = "¡Cambios guardados!";

pub struct CheckoutServices {
    pub store: Arc<dyn SessionStore>,
    pub intake: Arc<dyn IntakeClient>,
    pub navigator: Arc<dyn Navigator>,
    pub payment_url: Url,
}

/// The order review screen: summary, editor, sample previews and submission.
pub struct CheckoutPage {
    form: FormState,
    handoff: SubmissionHandoff,
    playback: PlaybackController,
    navigator: Arc<dyn Navigator>,
    events: broadcast::Sender<CheckoutEvent>,
    editor_open: bool,
}

impl CheckoutPage {
    pub async fn open(
        location: Url,
        services: CheckoutServices,
        samples: Vec<Box<dyn PlaybackHandle>>,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let form = FormState::load(services.store, location).await;
        Self {
            form,
            handoff: SubmissionHandoff::new(services.intake, services.payment_url),
            playback: PlaybackController::new(samples),
            navigator: services.navigator,
            events,
            editor_open: false,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.events.subscribe()
    }

    pub fn preferences(&self) -> &OrderPreferences {
        self.form.preferences()
    }

    pub fn location(&self) -> &Url {
        self.form.location()
    }

    pub fn summary(&self, today: NaiveDate) -> OrderSummary {
        OrderSummary::new(self.form.preferences(), today)
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    pub fn open_editor(&mut self) {
        self.editor_open = true;
        self.emit(CheckoutEvent::EditorOpened);
    }

    /// Closes the editor. Edits were already written through, nothing reverts.
    pub fn cancel_editor(&mut self) {
        self.close_editor();
    }

    pub async fn save_changes(&mut self) {
        self.form.save_all().await;
        self.emit(CheckoutEvent::Notice(Notice::success(CHANGES_SAVED_MESSAGE)));
        self.close_editor();
    }

    pub async fn update_field(&mut self, field: OrderField, value: &str) {
        if let Some(location) = self.form.update_field(field, value).await {
            self.navigator.replace_location(&location);
            self.emit(CheckoutEvent::LocationChanged(location));
        }
    }

    pub fn submit(&self) -> Result<SubmissionReceipt, CheckoutError> {
        match self
            .handoff
            .submit(self.form.preferences(), self.navigator.as_ref())
        {
            Ok(receipt) => {
                self.emit(CheckoutEvent::Navigated(receipt.payment_url().clone()));
                Ok(receipt)
            }
            Err(err) => {
                info!(error = %err, code = ?err.code(), "checkout submission blocked");
                self.emit(CheckoutEvent::Notice(Notice::error(err.user_message())));
                Err(err)
            }
        }
    }

    pub fn currently_playing(&self) -> Option<usize> {
        self.playback.currently_playing()
    }

    pub fn toggle_sample(&mut self, index: usize) -> Result<Option<usize>, CheckoutError> {
        let current = self.playback.toggle(index).inspect_err(|err| {
            debug!(error = %err, code = ?err.code(), "sample toggle rejected");
        })?;
        self.emit(CheckoutEvent::PlaybackChanged(current));
        Ok(current)
    }

    pub fn sample_ended(&mut self, index: usize) {
        if self.playback.handle_ended(index) {
            self.emit(CheckoutEvent::PlaybackChanged(None));
        }
    }

    pub fn poll_samples(&mut self) {
        if self.playback.poll_ended() {
            self.emit(CheckoutEvent::PlaybackChanged(
                self.playback.currently_playing(),
            ));
        }
    }

    pub fn go_back(&self) {
        self.navigator.back();
        self.emit(CheckoutEvent::WentBack);
    }

    fn close_editor(&mut self) {
        self.editor_open = false;
        self.emit(CheckoutEvent::EditorClosed);
    }

    fn emit(&self, event: CheckoutEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/checkout_tests.rs"]
mod tests;
