//! Structured run failures.
//!
//! Every fallible operation in this crate reports an `AppError` to its caller;
//! nothing is silently defaulted and nothing panics in library code. The exit
//! code doubles as an error taxonomy:
//!
//! - 2: configuration-syntax error (malformed grammar token)
//! - 3: configuration-semantic error (e.g. no swept parameters)
//! - 4: numeric error (zero-length series, zero-division in normalization)
//! - 5: resource error (missing input file, output file exists)

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

    /// Malformed configuration token.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Well-formed configuration that does not describe a runnable search.
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Numeric failure detected during bundle construction or grid evaluation.
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// Filesystem-level failure.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(5, message)
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
