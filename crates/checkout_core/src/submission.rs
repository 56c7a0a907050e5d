use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart::Form, Client};
use shared::{domain::OrderPreferences, error::CheckoutError, protocol::IntakePayload};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use url::Url;

use crate::navigation::Navigator;

const INTAKE_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Destination for order preferences before the payment handoff.
#[async_trait]
pub trait IntakeClient: Send + Sync {
    async fn submit(&self, payload: IntakePayload) -> Result<()>;
}

/// Posts the payload as `multipart/form-data` and ignores the response body.
pub struct HttpIntakeClient {
    http: Client,
    endpoint: Url,
}

impl HttpIntakeClient {
    pub fn new(endpoint: Url) -> Result<Self> {
        let http = Client::builder()
            .timeout(INTAKE_REQUEST_TIMEOUT)
            .build()
            .context("failed to build intake http client")?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl IntakeClient for HttpIntakeClient {
    async fn submit(&self, payload: IntakePayload) -> Result<()> {
        let form = payload
            .entries
            .into_iter()
            .fold(Form::new(), |form, entry| form.text(entry.external_id, entry.value));

        // The collector answers cross-origin; status and body carry no meaning.
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("intake request to {} failed", self.endpoint))?;
        debug!(status = %response.status(), "intake endpoint responded");
        Ok(())
    }
}

/// Handle to the in-flight intake request. Dropping it does not cancel anything.
#[derive(Debug)]
pub struct SubmissionReceipt {
    intake_task: JoinHandle<()>,
    payment_url: Url,
}

impl SubmissionReceipt {
    pub fn payment_url(&self) -> &Url {
        &self.payment_url
    }

    /// Waits at most `grace` for the intake request; `false` if it was still running.
    pub async fn settle(self, grace: Duration) -> bool {
        tokio::time::timeout(grace, self.intake_task).await.is_ok()
    }
}

pub struct SubmissionHandoff {
    intake: Arc<dyn IntakeClient>,
    payment_url: Url,
}

impl SubmissionHandoff {
    pub fn new(intake: Arc<dyn IntakeClient>, payment_url: Url) -> Self {
        Self {
            intake,
            payment_url,
        }
    }

    /// Dispatches intake without waiting on it, then navigates to payment.
    ///
    /// There is no duplicate guard: every call sends its own request and
    /// performs its own navigation. Must run inside a tokio runtime.
    pub fn submit(
        &self,
        preferences: &OrderPreferences,
        navigator: &dyn Navigator,
    ) -> Result<SubmissionReceipt, CheckoutError> {
        if !preferences.has_contact_email() {
            return Err(CheckoutError::MissingContactEmail);
        }

        let payload = IntakePayload::from_preferences(preferences);
        let intake = Arc::clone(&self.intake);
        let intake_task = tokio::spawn(async move {
            match intake.submit(payload).await {
                Ok(()) => info!("order preferences sent to intake endpoint"),
                Err(err) => error!(error = %format!("{err:#}"), "intake submission failed"),
            }
        });

        info!(payment_url = %self.payment_url, "handing off to payment page");
        navigator.assign(&self.payment_url);

        Ok(SubmissionReceipt {
            intake_task,
            payment_url: self.payment_url.clone(),
        })
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
