use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    MissingCredential(String),
    ValidationError(String),
    ConfigError(String),
    ParseError(String),
    LLMError(String),
    IoError(String),
}

impl AppError {
    /// Process exit code reported by the CLI for a fatal error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingCredential(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::ValidationError(_) | AppError::ConfigError(_) => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::MissingCredential(msg) => write!(f, "Missing credential: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::LLMError(msg) => write!(f, "LLM error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
