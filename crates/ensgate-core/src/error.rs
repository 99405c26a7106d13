use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Failure kind tagged at the transport/client boundary.
///
/// `Unclassified` is reserved for failures whose origin is unknown; the
/// classifier falls back to message heuristics only for that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Protocol,
    InvalidInput,
    Unclassified,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Protocol => "protocol",
            Self::InvalidInput => "invalid_input",
            Self::Unclassified => "unclassified",
        }
    }
}

/// Structured error raised by resolution clients and operation handlers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} error: {message}", kind.as_str())]
pub struct ResolveError {
    kind: ErrorKind,
    message: String,
}

impl ResolveError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, message)
    }

    pub fn providers_exhausted(provider_count: usize) -> Self {
        Self::network(format!(
            "all {provider_count} providers exhausted; no provider left to rotate to"
        ))
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn is_network(&self) -> bool {
        matches!(self.kind, ErrorKind::Network)
    }
}

/// Single endpoint failure recorded by the transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    pub url: String,
    pub attempts: u32,
    pub reason: String,
}

impl Display for EndpointFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} failed after {} attempt(s): {}",
            self.url, self.attempts, self.reason
        )
    }
}

/// Errors raised by endpoint and fallback transports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Endpoint(EndpointFailure),

    #[error("HTTP request failed on every provider: {}", join_failures(.failures))]
    Exhausted { failures: Vec<EndpointFailure> },

    #[error("no provider endpoints configured")]
    NoEndpoints,
}

impl TransportError {
    pub fn failures(&self) -> &[EndpointFailure] {
        match self {
            Self::Endpoint(failure) => std::slice::from_ref(failure),
            Self::Exhausted { failures } => failures,
            Self::NoEndpoints => &[],
        }
    }
}

impl From<TransportError> for ResolveError {
    fn from(error: TransportError) -> Self {
        Self::network(error.to_string())
    }
}

/// Caller input rejected before any upstream call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("name '{value}' contains whitespace")]
    NameContainsWhitespace { value: String },
    #[error("name '{value}' contains an empty label")]
    EmptyLabel { value: String },

    #[error("'{value}' is not a valid Ethereum address")]
    InvalidAddress { value: String },

    #[error("text record key cannot be empty")]
    EmptyTextKey,

    #[error("registration duration must be at least one year, got {years}")]
    InvalidDuration { years: u64 },

    #[error("wei amount must be a non-negative integer: '{value}'")]
    InvalidWei { value: String },
    #[error("wei amount overflowed")]
    WeiOverflow,

    #[error("timestamp {seconds} is out of range")]
    InvalidTimestamp { seconds: i64 },

    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },
    #[error("invalid parameters for {operation}: {reason}")]
    InvalidArguments { operation: String, reason: String },
}

impl From<ValidationError> for ResolveError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_input(error.to_string())
    }
}

/// Configuration errors surfaced before any client is built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("provider url must start with http:// or https://: '{value}'")]
    InvalidProviderUrl { value: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

fn join_failures(failures: &[EndpointFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_convert_to_network_kind() {
        let error = TransportError::Exhausted {
            failures: vec![EndpointFailure {
                url: String::from("https://a.example"),
                attempts: 4,
                reason: String::from("status 503"),
            }],
        };

        let resolved = ResolveError::from(error);
        assert_eq!(resolved.kind(), ErrorKind::Network);
        assert!(resolved.message().contains("HTTP request failed"));
        assert!(resolved.message().contains("https://a.example failed after 4 attempt(s)"));
    }

    #[test]
    fn validation_errors_convert_to_invalid_input_kind() {
        let resolved = ResolveError::from(ValidationError::InvalidAddress {
            value: String::from("not-an-address"),
        });

        assert_eq!(resolved.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            resolved.message(),
            "'not-an-address' is not a valid Ethereum address"
        );
    }

    #[test]
    fn resolve_error_renders_kind_then_message() {
        let error = ResolveError::protocol("resolver reverted");

        assert_eq!(error.to_string(), "protocol error: resolver reverted");
        let as_std: &dyn std::error::Error = &error;
        assert!(as_std.source().is_none());
    }

    #[test]
    fn exhausted_failures_are_listed_in_order() {
        let failures = vec![
            EndpointFailure {
                url: String::from("https://a.example"),
                attempts: 1,
                reason: String::from("status 400"),
            },
            EndpointFailure {
                url: String::from("https://b.example"),
                attempts: 2,
                reason: String::from("connection failed"),
            },
        ];
        let error = TransportError::Exhausted {
            failures: failures.clone(),
        };

        assert_eq!(error.failures(), failures.as_slice());
        let rendered = error.to_string();
        let a = rendered.find("https://a.example").expect("first endpoint rendered");
        let b = rendered.find("https://b.example").expect("second endpoint rendered");
        assert!(a < b);
    }
}
