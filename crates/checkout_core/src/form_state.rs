use std::sync::Arc;

use shared::{
    domain::{OrderField, OrderPreferences},
    protocol::session_key,
};
use storage::SessionStore;
use tracing::debug;
use url::Url;

use crate::navigation::{recipient_name_from, with_recipient_name};

/// In-memory order preferences mirrored field by field into session storage.
///
/// Storage failures never escape this type: the in-memory copy stays
/// authoritative for the lifetime of the page.
pub struct FormState {
    store: Arc<dyn SessionStore>,
    preferences: OrderPreferences,
    location: Url,
}

impl FormState {
    /// Seeds every field from the navigation location (recipient name only),
    /// then the stored session value, then empty.
    pub async fn load(store: Arc<dyn SessionStore>, location: Url) -> Self {
        let mut preferences = OrderPreferences::default();
        let seeded_name = recipient_name_from(&location);

        for field in OrderField::ALL {
            if field == OrderField::RecipientName {
                if let Some(name) = &seeded_name {
                    preferences.set(field, name.as_str());
                    continue;
                }
            }
            if let Some(stored) = read_field(store.as_ref(), field).await {
                preferences.set(field, stored);
            }
        }

        debug!(
            seeded_recipient = seeded_name.is_some(),
            "checkout form state loaded"
        );

        Self {
            store,
            preferences,
            location,
        }
    }

    pub fn preferences(&self) -> &OrderPreferences {
        &self.preferences
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Writes one field through to storage. Returns the new page location
    /// when the edit changed the recipient name.
    pub async fn update_field(&mut self, field: OrderField, value: &str) -> Option<Url> {
        self.preferences.set(field, value);
        write_field(self.store.as_ref(), field, value).await;

        if field != OrderField::RecipientName {
            return None;
        }
        self.location = with_recipient_name(&self.location, value);
        Some(self.location.clone())
    }

    /// Re-writes every field. Each key is still stored on its own.
    pub async fn save_all(&self) {
        for field in OrderField::ALL {
            write_field(self.store.as_ref(), field, self.preferences.get(field)).await;
        }
    }
}

async fn read_field(store: &dyn SessionStore, field: OrderField) -> Option<String> {
    let key = session_key(field);
    match store.get(&key).await {
        Ok(value) => value,
        Err(err) => {
            debug!(key = %key, error = %format!("{err:#}"), "session storage read skipped");
            None
        }
    }
}

async fn write_field(store: &dyn SessionStore, field: OrderField, value: &str) {
    let key = session_key(field);
    if let Err(err) = store.set(&key, value).await {
        debug!(key = %key, error = %format!("{err:#}"), "session storage write skipped");
    }
}

#[cfg(test)]
#[path = "tests/form_state_tests.rs"]
mod tests;
