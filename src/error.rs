/// Failure categories surfaced by the pipeline.
///
/// Each stage reports problems through one of these kinds so callers can
/// distinguish "bad input schema" from "not enough data" from "a model blew
/// up" without parsing message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required logical role (date/sales) could not be resolved to a column.
    Schema,
    /// An invalid configuration value (fractions, horizons, counts).
    Config,
    /// Too few rows or points to produce a meaningful split.
    InsufficientData,
    /// Too little monthly history survives lag/rolling feature derivation.
    InsufficientHistory,
    /// An evaluation join produced zero comparable points.
    EmptyAlignment,
    /// A model failed to fit or predict.
    Model,
    /// Filesystem or encoding failure.
    Io,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientData, message)
    }

    pub fn insufficient_history(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientHistory, message)
    }

    pub fn empty_alignment(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyAlignment, message)
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Model, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Process exit code: 2 = input/schema/config, 3 = data shape, 4 = model/internal.
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::Schema | ErrorKind::Config | ErrorKind::Io => 2,
            ErrorKind::InsufficientData | ErrorKind::InsufficientHistory => 3,
            ErrorKind::EmptyAlignment | ErrorKind::Model => 4,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
