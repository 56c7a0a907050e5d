//! Checkout flow state: form synchronization, intake handoff and sample previews.
//!
//! Everything with a side effect sits behind a trait ([`SessionStore`],
//! [`Navigator`], [`IntakeClient`], [`PlaybackHandle`]) so front ends decide
//! what "storage", "browser" and "audio" mean.

pub mod checkout;
pub mod confirmation;
pub mod events;
pub mod form_state;
pub mod navigation;
pub mod playback;
pub mod submission;

pub use checkout::{CheckoutPage, CheckoutServices};
pub use confirmation::ConfirmationPage;
pub use events::{CheckoutEvent, Notice, NoticeLevel};
pub use form_state::FormState;
pub use navigation::{recipient_name_from, with_recipient_name, Navigator};
pub use playback::{PlaybackController, PlaybackHandle};
pub use storage::SessionStore;
pub use submission::{HttpIntakeClient, IntakeClient, SubmissionHandoff, SubmissionReceipt};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
