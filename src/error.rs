use crate::analytics::QueryError;
use crate::domain::PeriodError;

/// Exit code for configuration and usage problems.
pub const EXIT_USAGE: u8 = 2;
/// Exit code when a query has no data to answer with.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for transport and response decoding failures.
pub const EXIT_TRANSPORT: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(EXIT_TRANSPORT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::new(EXIT_NO_DATA, err.to_string())
    }
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        AppError::new(EXIT_USAGE, err.to_string())
    }
}
