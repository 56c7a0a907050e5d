//! Commands typed at the checkout prompt.

use shared::{domain::OrderField, error::CheckoutError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Edit,
    Set { field: OrderField, value: String },
    Save,
    Cancel,
    Submit,
    /// Zero-based sample index.
    Play(usize),
    Samples,
    Back,
    Reload,
    Dump,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    Field(CheckoutError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => f.write_str("escribe un comando (help para ver la lista)"),
            ParseError::Unknown(cmd) => write!(f, "comando desconocido: {cmd}"),
            ParseError::Usage(usage) => write!(f, "uso: {usage}"),
            ParseError::Field(err) => f.write_str(&err.user_message()),
        }
    }
}

pub const HELP: &str = "\
show                      resumen del pedido
edit                      abrir el formulario de edición
set <campo> <valor>       cambiar un campo (\\n para saltos de línea)
email <correo>            cambiar el correo electrónico
save | cancel             guardar o cerrar el formulario
play <n>                  reproducir/pausar la canción n
samples                   ver las canciones de ejemplo
submit                    crear mi canto (ir al pago)
reload                    recargar la página
dump                      ver los datos del pedido en JSON
back | quit               volver | cerrar";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "show" => Ok(Command::Show),
        "edit" => Ok(Command::Edit),
        "save" => Ok(Command::Save),
        "cancel" => Ok(Command::Cancel),
        "submit" => Ok(Command::Submit),
        "samples" => Ok(Command::Samples),
        "back" => Ok(Command::Back),
        "reload" => Ok(Command::Reload),
        "dump" => Ok(Command::Dump),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "email" => Ok(Command::Set {
            field: OrderField::Email,
            value: rest.to_string(),
        }),
        "play" => rest
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(Command::Play)
            .ok_or(ParseError::Usage("play <n>  (n empieza en 1)")),
        "set" => parse_set(rest),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn parse_set(rest: &str) -> Result<Command, ParseError> {
    let (name, value) = match rest.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Err(ParseError::Usage("set <campo> <valor>"));
    }

    let field = name.parse::<OrderField>().map_err(ParseError::Field)?;
    let value = if field.is_multiline() {
        value.replace("\\n", "\n")
    } else {
        value.to_string()
    };
    field.validate(&value).map_err(ParseError::Field)?;

    Ok(Command::Set { field, value })
}
