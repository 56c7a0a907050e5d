use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("contact email is required before submitting the order")]
    MissingContactEmail,
    #[error("unknown order field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not a valid option for {field}")]
    InvalidOption { field: &'static str, value: String },
    #[error("no sample song at index {0}")]
    UnknownSample(usize),
}

impl CheckoutError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CheckoutError::UnknownSample(_) => ErrorCode::NotFound,
            _ => ErrorCode::Validation,
        }
    }

    /// Text shown to the customer for failures that reach the screen.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::MissingContactEmail => {
                "Por favor ingresa tu correo electrónico".to_string()
            }
            CheckoutError::UnknownField(field) => format!("Campo desconocido: {field}"),
            CheckoutError::InvalidOption { value, .. } => {
                format!("\"{value}\" no es una opción válida")
            }
            CheckoutError::UnknownSample(index) => format!("No existe la canción {}", index + 1),
        }
    }
}
