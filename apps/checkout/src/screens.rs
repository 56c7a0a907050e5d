use std::fmt::Write as _;

use chrono::NaiveDate;
use checkout_core::{CheckoutPage, ConfirmationPage, Notice, NoticeLevel};
use shared::domain::{OrderField, OrderPreferences, SampleSong};

pub fn checkout(page: &CheckoutPage, today: NaiveDate) -> String {
    let summary = page.summary(today);
    let mut out = String::new();
    let _ = writeln!(out, "¡Ya casi está! Completa tu pedido");
    let _ = writeln!(
        out,
        "Canto personalizado para {} · entrega estimada: {}",
        summary.recipient,
        summary.formatted_delivery_date()
    );
    let _ = writeln!(
        out,
        "Precio: ${} USD (antes ${}, {}% de descuento)",
        summary.sale_price_usd,
        summary.list_price_usd,
        summary.discount_percent()
    );
    let email = page.preferences().email.as_str();
    let _ = write!(
        out,
        "Correo: {}",
        if email.is_empty() { "(sin correo)" } else { email }
    );
    out
}

pub fn editor(preferences: &OrderPreferences) -> String {
    let mut out = String::from("Revisar y Editar tu Pedido\n");
    for field in OrderField::ALL {
        if field == OrderField::CustomRelationship && !preferences.is_other_relationship() {
            continue;
        }
        let value = preferences.get(field);
        let shown = if value.is_empty() { "(vacío)" } else { value };
        let _ = writeln!(out, "  {:<20} {}: {}", field.storage_key(), field.label(), shown);
        if let Some(options) = field.options() {
            let _ = writeln!(out, "  {:<20} opciones: {}", "", options.join(", "));
        }
    }
    out.push_str("  (save para guardar, cancel para cerrar)");
    out
}

pub fn samples(songs: &[SampleSong], playing: Option<usize>) -> String {
    let mut out = String::from("Escucha otras canciones que hemos creado");
    for (index, song) in songs.iter().enumerate() {
        let marker = if playing == Some(index) { "❚❚" } else { "▶" };
        let _ = write!(
            out,
            "\n  {marker} {}. {} (pedido por {})\n     {}",
            index + 1,
            song.title,
            song.ordered_by,
            song.quote
        );
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("✔ {}", notice.message),
        NoticeLevel::Error => format!("✖ {}", notice.message),
    }
}

pub fn confirmation() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ConfirmationPage::TITLE);
    for message in ConfirmationPage::MESSAGES {
        let _ = writeln!(out, "{message}");
    }
    let (home_label, home_path) = ConfirmationPage::HOME_LINK;
    let _ = writeln!(out, "{home_label} ({home_path})");
    let links: Vec<String> = ConfirmationPage::FOOTER_LINKS
        .iter()
        .map(|(label, path)| format!("{label} ({path})"))
        .collect();
    let _ = write!(out, "{}", links.join(" · "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::SAMPLE_SONGS;

    #[test]
    fn editor_hides_custom_relationship_unless_other() {
        let mut prefs = OrderPreferences {
            relationship: "Padre".into(),
            ..Default::default()
        };
        assert!(!editor(&prefs).contains("customRelationship"));

        prefs.relationship = "Otro".into();
        assert!(editor(&prefs).contains("customRelationship"));
    }

    #[test]
    fn editor_marks_empty_fields_in_plain_text() {
        let prefs = OrderPreferences {
            email: "a@b.com".into(),
            ..Default::default()
        };
        let rendered = editor(&prefs);

        assert!(rendered.contains("¿Cómo se llama?: (vacío)"));
        assert!(rendered.contains("Tu correo electrónico: a@b.com"));
        assert!(!rendered.contains('—'));
    }

    #[test]
    fn samples_mark_the_playing_song() {
        let rendered = samples(&SAMPLE_SONGS, Some(1));
        assert_eq!(rendered.matches("❚❚").count(), 1);
        assert!(rendered.contains("❚❚ 2. Gracia Salvadora"));
    }

    #[test]
    fn confirmation_lists_footer_links() {
        let rendered = confirmation();
        assert!(rendered.starts_with(ConfirmationPage::TITLE));
        assert!(rendered.contains("/privacy-policy"));
        assert!(rendered.contains("/terms-of-service"));
    }
}
