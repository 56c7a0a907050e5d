use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CheckoutError;

/// Relationship value that switches the form to free-text relationship entry.
pub const OTHER_RELATIONSHIP: &str = "Otro";
/// Sent as the effective relationship when "Otro" is picked without custom text.
pub const UNSPECIFIED_OTHER_RELATIONSHIP: &str = "Otro (no especificado)";
pub const RECIPIENT_PLACEHOLDER: &str = "Tu ser querido";

pub const RELATIONSHIP_OPTIONS: &[&str] = &[
    "Esposo", "Esposa", "Hermano", "Hermana", "Amigo", "Amiga", "Niño", "Niña", "Padre", "Madre",
    "Para mí", "Otro",
];

pub const GENRE_OPTIONS: &[&str] = &[
    "Pop",
    "Reggaetón",
    "Rock",
    "Mariachi",
    "Cumbia",
    "Rap",
    "Bachata",
    "Salsa",
    "Merengue",
    "Himnos",
    "Alabanzas",
];

pub const VOICE_OPTIONS: &[&str] = &["Voz femenina", "Voz masculina", "Sin preferencia"];

pub const DELIVERY_DAYS: i64 = 5;
pub const LIST_PRICE_USD: u32 = 99;
pub const SALE_PRICE_USD: u32 = 49;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Fields of [`OrderPreferences`], in intake payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    RecipientName,
    Relationship,
    CustomRelationship,
    Genre,
    Voice,
    Qualities,
    Memories,
    Message,
    Email,
}

impl OrderField {
    pub const ALL: [OrderField; 9] = [
        OrderField::RecipientName,
        OrderField::Relationship,
        OrderField::CustomRelationship,
        OrderField::Genre,
        OrderField::Voice,
        OrderField::Qualities,
        OrderField::Memories,
        OrderField::Message,
        OrderField::Email,
    ];

    /// Suffix under which the field is mirrored into session storage.
    pub fn storage_key(self) -> &'static str {
        match self {
            OrderField::RecipientName => "recipientName",
            OrderField::Relationship => "recipient",
            OrderField::CustomRelationship => "customRelationship",
            OrderField::Genre => "genre",
            OrderField::Voice => "voiceGender",
            OrderField::Qualities => "qualities",
            OrderField::Memories => "memories",
            OrderField::Message => "specialMessage",
            OrderField::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderField::RecipientName => "¿Cómo se llama?",
            OrderField::Relationship => "¿Cuál es tu relación con ellos?",
            OrderField::CustomRelationship => "Especifica la relación",
            OrderField::Genre => "Género musical",
            OrderField::Voice => "Género de voz preferido",
            OrderField::Qualities => "¿Qué los hace especiales?",
            OrderField::Memories => "Comparte tus recuerdos favoritos",
            OrderField::Message => "Un mensaje desde tu corazón",
            OrderField::Email => "Tu correo electrónico",
        }
    }

    /// Fixed vocabulary for choice fields, `None` for free text.
    pub fn options(self) -> Option<&'static [&'static str]> {
        match self {
            OrderField::Relationship => Some(RELATIONSHIP_OPTIONS),
            OrderField::Genre => Some(GENRE_OPTIONS),
            OrderField::Voice => Some(VOICE_OPTIONS),
            _ => None,
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            OrderField::Qualities | OrderField::Memories | OrderField::Message
        )
    }

    /// Checks a choice field value against its vocabulary. Empty clears the field.
    pub fn validate(self, value: &str) -> Result<(), CheckoutError> {
        match self.options() {
            Some(options) if !value.is_empty() && !options.contains(&value) => {
                Err(CheckoutError::InvalidOption {
                    field: self.storage_key(),
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

impl FromStr for OrderField {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if let Some(field) = Self::ALL
            .into_iter()
            .find(|field| field.storage_key().eq_ignore_ascii_case(needle))
        {
            return Ok(field);
        }

        match needle.to_ascii_lowercase().as_str() {
            "recipient_name" | "name" => Ok(OrderField::RecipientName),
            "relationship" => Ok(OrderField::Relationship),
            "custom_relationship" => Ok(OrderField::CustomRelationship),
            "voice" | "voice_gender" => Ok(OrderField::Voice),
            "message" | "special_message" => Ok(OrderField::Message),
            _ => Err(CheckoutError::UnknownField(needle.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPreferences {
    pub recipient_name: String,
    pub relationship: String,
    pub custom_relationship: String,
    pub genre: String,
    pub voice: String,
    pub qualities: String,
    pub memories: String,
    pub message: String,
    pub email: String,
}

impl OrderPreferences {
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::RecipientName => &self.recipient_name,
            OrderField::Relationship => &self.relationship,
            OrderField::CustomRelationship => &self.custom_relationship,
            OrderField::Genre => &self.genre,
            OrderField::Voice => &self.voice,
            OrderField::Qualities => &self.qualities,
            OrderField::Memories => &self.memories,
            OrderField::Message => &self.message,
            OrderField::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        let slot = match field {
            OrderField::RecipientName => &mut self.recipient_name,
            OrderField::Relationship => &mut self.relationship,
            OrderField::CustomRelationship => &mut self.custom_relationship,
            OrderField::Genre => &mut self.genre,
            OrderField::Voice => &mut self.voice,
            OrderField::Qualities => &mut self.qualities,
            OrderField::Memories => &mut self.memories,
            OrderField::Message => &mut self.message,
            OrderField::Email => &mut self.email,
        };
        *slot = value.into();
    }

    pub fn recipient_display_name(&self) -> &str {
        if self.recipient_name.is_empty() {
            RECIPIENT_PLACEHOLDER
        } else {
            &self.recipient_name
        }
    }

    pub fn is_other_relationship(&self) -> bool {
        self.relationship == OTHER_RELATIONSHIP
    }

    /// Relationship as reported to intake: custom text when "Otro" is selected.
    pub fn effective_relationship(&self) -> &str {
        if !self.is_other_relationship() {
            return &self.relationship;
        }

        match self.custom_relationship.trim() {
            "" => UNSPECIFIED_OTHER_RELATIONSHIP,
            custom => custom,
        }
    }

    pub fn has_contact_email(&self) -> bool {
        !self.email.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleSong {
    pub title: &'static str,
    pub ordered_by: &'static str,
    pub asset: &'static str,
    pub quote: &'static str,
}

pub const SAMPLE_SONGS: [SampleSong; 3] = [
    SampleSong {
        title: "Enviado Desde el Cielo",
        ordered_by: "Pamela S.",
        asset: "first-review-audio.mp4",
        quote: "\"Absolutamente hermoso, capturaron momentos tan especiales… ambos estábamos llorando.\" — Pamela S.",
    },
    SampleSong {
        title: "Gracia Salvadora",
        ordered_by: "Wendy B.",
        asset: "second-review-audio.mp4",
        quote: "\"Esto es absolutamente impresionante. No puedo creerlo… me va a costar mantenerlo en secreto hasta el domingo.\" — Wendy B.",
    },
    SampleSong {
        title: "Más Fuerte Ahora",
        ordered_by: "Markeeta B.",
        asset: "third-review-audio.mp4",
        quote: "\"Una canción muy muy maravillosa. ¡Me encantó absolutamente y a Dave también!\" — Markeeta B.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub recipient: String,
    pub delivery_date: NaiveDate,
    pub list_price_usd: u32,
    pub sale_price_usd: u32,
}

impl OrderSummary {
    pub fn new(preferences: &OrderPreferences, today: NaiveDate) -> Self {
        Self {
            recipient: preferences.recipient_display_name().to_string(),
            delivery_date: today + Duration::days(DELIVERY_DAYS),
            list_price_usd: LIST_PRICE_USD,
            sale_price_usd: SALE_PRICE_USD,
        }
    }

    pub fn discount_percent(&self) -> u32 {
        if self.list_price_usd == 0 {
            return 0;
        }
        let off = self.list_price_usd.saturating_sub(self.sale_price_usd);
        // Rounded to the nearest whole percent, 99 -> 49 reads as 50%.
        (off * 100 + self.list_price_usd / 2) / self.list_price_usd
    }

    pub fn formatted_delivery_date(&self) -> String {
        format_short_date(self.delivery_date)
    }
}

/// `"<day> <month>"` with Spanish short month names, e.g. `24 oct`.
pub fn format_short_date(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ];
    format!("{} {}", date.day(), MONTHS[date.month0() as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_relationship_prefers_trimmed_custom_text() {
        let mut prefs = OrderPreferences {
            relationship: OTHER_RELATIONSHIP.into(),
            custom_relationship: "  Abuela ".into(),
            ..Default::default()
        };
        assert_eq!(prefs.effective_relationship(), "Abuela");

        prefs.custom_relationship = "   ".into();
        assert_eq!(prefs.effective_relationship(), UNSPECIFIED_OTHER_RELATIONSHIP);

        prefs.relationship = "Madre".into();
        prefs.custom_relationship = "ignored".into();
        assert_eq!(prefs.effective_relationship(), "Madre");
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let mut prefs = OrderPreferences::default();
        assert_eq!(prefs.recipient_display_name(), RECIPIENT_PLACEHOLDER);
        prefs.set(OrderField::RecipientName, "Lucía");
        assert_eq!(prefs.recipient_display_name(), "Lucía");
    }

    #[test]
    fn parses_fields_by_storage_key_and_alias() {
        assert_eq!(
            "voiceGender".parse::<OrderField>().expect("key"),
            OrderField::Voice
        );
        assert_eq!(
            "custom_relationship".parse::<OrderField>().expect("alias"),
            OrderField::CustomRelationship
        );
        assert!(matches!(
            "shoe_size".parse::<OrderField>(),
            Err(CheckoutError::UnknownField(_))
        ));
    }

    #[test]
    fn validates_choice_fields_only() {
        assert!(OrderField::Genre.validate("Cumbia").is_ok());
        assert!(OrderField::Genre.validate("").is_ok());
        assert!(OrderField::Genre.validate("Polka").is_err());
        assert!(OrderField::Memories.validate("anything at all").is_ok());
    }

    #[test]
    fn summary_delivers_five_days_out_at_half_price() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("date");
        let summary = OrderSummary::new(&OrderPreferences::default(), today);
        assert_eq!(summary.formatted_delivery_date(), "24 oct");
        assert_eq!(summary.discount_percent(), 50);
        assert_eq!(summary.recipient, RECIPIENT_PLACEHOLDER);
    }

    #[test]
    fn short_date_crosses_month_boundary() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).expect("date") + Duration::days(5);
        assert_eq!(format_short_date(date), "4 sept");
    }
}
