use serde::{Deserialize, Serialize};

use crate::domain::{OrderField, OrderPreferences};

pub const DEFAULT_INTAKE_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLScEPvbdWRJpR-Y5liv86CUXXJlPeRxEHXj_8iEToRk_5U0daA/formResponse";
pub const DEFAULT_PAYMENT_URL: &str = "https://buy.stripe.com/test_bJedR97rng2g7NRaQ500000";

/// Namespace shared by every session storage key written by the checkout page.
pub const SESSION_KEY_PREFIX: &str = "checkout_";
/// Query parameter carrying the recipient name in the page location.
pub const RECIPIENT_NAME_PARAM: &str = "recipientName";

pub fn session_key(field: OrderField) -> String {
    format!("{SESSION_KEY_PREFIX}{}", field.storage_key())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "field", rename_all = "snake_case")]
pub enum IntakeSource {
    Field(OrderField),
    /// Custom text or fallback when the relationship is "Otro".
    EffectiveRelationship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeFieldMapping {
    pub source: IntakeSource,
    pub external_id: &'static str,
}

/// External form entries, in the order they are appended to the request body.
pub const INTAKE_FIELDS: [IntakeFieldMapping; 9] = [
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Relationship),
        external_id: "entry.572932444",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::RecipientName),
        external_id: "entry.646865340",
    },
    IntakeFieldMapping {
        source: IntakeSource::EffectiveRelationship,
        external_id: "entry.381347280",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Genre),
        external_id: "entry.490417703",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Voice),
        external_id: "entry.1200658450",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Qualities),
        external_id: "entry.1546025979",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Memories),
        external_id: "entry.1185637620",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Message),
        external_id: "entry.988471068",
    },
    IntakeFieldMapping {
        source: IntakeSource::Field(OrderField::Email),
        external_id: "entry.1709259804",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeEntry {
    pub external_id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePayload {
    pub entries: Vec<IntakeEntry>,
}

impl IntakePayload {
    pub fn from_preferences(preferences: &OrderPreferences) -> Self {
        let entries = INTAKE_FIELDS
            .iter()
            .map(|mapping| {
                let value = match mapping.source {
                    IntakeSource::Field(field) => preferences.get(field),
                    IntakeSource::EffectiveRelationship => preferences.effective_relationship(),
                };
                IntakeEntry {
                    external_id: mapping.external_id.to_string(),
                    value: value.to_string(),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn value_of(&self, external_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.external_id == external_id)
            .map(|entry| entry.value.as_str())
    }

    pub fn value_for(&self, source: IntakeSource) -> Option<&str> {
        INTAKE_FIELDS
            .iter()
            .find(|mapping| mapping.source == source)
            .and_then(|mapping| self.value_of(mapping.external_id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::UNSPECIFIED_OTHER_RELATIONSHIP;

    #[test]
    fn intake_table_covers_every_field_once() {
        let mut seen = HashSet::new();
        for mapping in INTAKE_FIELDS {
            if let IntakeSource::Field(field) = mapping.source {
                assert!(seen.insert(field), "{field} mapped twice");
            }
        }
        for field in OrderField::ALL {
            if field == OrderField::CustomRelationship {
                // only reaches intake through the effective relationship
                continue;
            }
            assert!(seen.contains(&field), "{field} has no intake entry");
        }
        assert_eq!(
            INTAKE_FIELDS
                .iter()
                .filter(|m| m.source == IntakeSource::EffectiveRelationship)
                .count(),
            1
        );
    }

    #[test]
    fn intake_ids_are_unique_form_entries() {
        let mut ids = HashSet::new();
        for mapping in INTAKE_FIELDS {
            let digits = mapping
                .external_id
                .strip_prefix("entry.")
                .expect("entry prefix");
            assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
            assert!(ids.insert(mapping.external_id), "duplicate id");
        }
    }

    #[test]
    fn payload_maps_other_without_text_to_fallback() {
        let prefs = OrderPreferences {
            relationship: "Otro".into(),
            email: "a@b.com".into(),
            ..Default::default()
        };
        let payload = IntakePayload::from_preferences(&prefs);
        assert_eq!(payload.entries.len(), INTAKE_FIELDS.len());
        assert_eq!(
            payload.value_of("entry.381347280"),
            Some(UNSPECIFIED_OTHER_RELATIONSHIP)
        );
        assert_eq!(payload.value_of("entry.572932444"), Some("Otro"));
        assert_eq!(payload.value_of("entry.1709259804"), Some("a@b.com"));
    }

    #[test]
    fn payload_sends_raw_recipient_name_not_placeholder() {
        let payload = IntakePayload::from_preferences(&OrderPreferences::default());
        assert_eq!(
            payload.value_for(IntakeSource::Field(OrderField::RecipientName)),
            Some("")
        );
    }

    #[test]
    fn session_keys_share_prefix() {
        assert_eq!(session_key(OrderField::Voice), "checkout_voiceGender");
        assert_eq!(session_key(OrderField::Email), "checkout_email");
    }
}
