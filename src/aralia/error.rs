use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parsing,
    Format,
    FaultTree,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Parsing error: {0}")]
    Parsing(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Error in the fault tree: {0}")]
    FaultTree(#[from] mef_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{source}\nIn line {line}:\n{text}")]
    AtLine {
        line: usize,
        text: String,
        source: Box<Error>,
    },
}

impl Error {
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Attaches the offending input line.
    #[must_use]
    pub fn at_line(self, line: usize, text: &str) -> Self {
        match self {
            Self::Io(_) | Self::AtLine { .. } => self,
            other => Self::AtLine {
                line,
                text: text.to_string(),
                source: Box::new(other),
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parsing(_) => ErrorKind::Parsing,
            Self::Format(_) => ErrorKind::Format,
            Self::FaultTree(_) => ErrorKind::FaultTree,
            Self::Io(_) => ErrorKind::Io,
            Self::AtLine { source, .. } => source.kind(),
        }
    }

    /// Line number of the input that caused the error, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
