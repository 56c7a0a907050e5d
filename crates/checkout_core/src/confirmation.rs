//! Thank-you screen shown after the payment provider redirects back.

pub struct ConfirmationPage;

impl ConfirmationPage {
    pub const TITLE: &'static str = "¡Muchas gracias por su pago!";
    pub const MESSAGES: [&'static str; 2] = [
        "Su pago a CantodeFe aparecerá reflejado en su estado de cuenta.",
        "Le enviaremos su acceso personal a CantodeFe dentro de un plazo máximo de 5 días.",
    ];
    pub const HOME_LINK: (&'static str, &'static str) = ("← Volver al inicio", "/");
    pub const FOOTER_LINKS: [(&'static str, &'static str); 2] = [
        ("Política de Privacidad", "/privacy-policy"),
        ("Términos de Servicio", "/terms-of-service"),
    ];
}
