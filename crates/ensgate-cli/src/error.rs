use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Operation failures are not `CliError`s: they arrive as error envelopes
/// and exit with code 3.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ensgate_core::ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_code_two() {
        let error = CliError::from(ensgate_core::ConfigError::ZeroTimeout);
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn rendering_failures_exit_with_code_four() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").expect_err("must fail");
        let error = CliError::from(parse_error);
        assert_eq!(error.exit_code(), 4);
    }
}
