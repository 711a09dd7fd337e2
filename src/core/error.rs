//! Purpose: Model every way a vault payload can be rejected.
//! Exports: `Error`, `ErrorKind`, `Result`, `to_exit_code`.
//! Role: Single error type shared by all three parsers and the CLI.
//! Invariants: Child-entity errors are returned unchanged by parent parsers.
//! Invariants: Messages name fields, never payload values.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    MissingField,
    InvalidDate,
    InvalidType,
    InvalidStatus,
    MalformedInput,
    Io,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    field: Option<String>,
    message: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            field: None,
            message: None,
            hint: None,
            source: None,
        }
    }

    /// `entity` is the human label of the level being validated ("MVault record").
    pub fn missing_field(entity: &str, field: &str) -> Self {
        Self::new(ErrorKind::MissingField)
            .with_field(field)
            .with_message(format!("malformed {entity}: {field} field is missing"))
    }

    pub fn invalid_date(entity: &str, field: &str) -> Self {
        Self::new(ErrorKind::InvalidDate)
            .with_field(field)
            .with_message(format!(
                "malformed {entity}: {field} date field is not correctly formatted"
            ))
            .with_hint("Dates are expected as YYYY-MM-DDThh:mm:ssZ (UTC).")
    }

    pub fn invalid_type(entity: &str, field: &str, expected: &str) -> Self {
        Self::new(ErrorKind::InvalidType)
            .with_field(field)
            .with_message(format!("malformed {entity}: {field} must be {expected}"))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::MissingField => 3,
        ErrorKind::InvalidDate => 4,
        ErrorKind::InvalidType => 5,
        ErrorKind::InvalidStatus => 6,
        ErrorKind::MalformedInput => 7,
        ErrorKind::Io => 8,
    }
}
