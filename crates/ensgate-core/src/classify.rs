//! Maps failures onto the four user-facing error categories.

use std::fmt::{Display, Formatter};

use crate::error::{ErrorKind, ResolveError};

const NETWORK_MARKERS: [&str; 4] = ["fetch failed", "timeout", "network", "HTTP request failed"];
const INVALID_INPUT_MARKERS: [&str; 2] = ["invalid", "parameter"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NetworkError,
    EnsProtocolError,
    InvalidInputError,
    UnknownError,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "NetworkError",
            Self::EnsProtocolError => "EnsProtocolError",
            Self::InvalidInputError => "InvalidInputError",
            Self::UnknownError => "UnknownError",
        }
    }

    /// Renders the category's message template.
    pub fn render(self, message: &str, operation_label: &str) -> String {
        match self {
            Self::NetworkError => format!(
                "Network error while accessing Ethereum providers. Please check your internet \
connection or try again later. Technical details: {message}"
            ),
            Self::EnsProtocolError => format!("ENS error: {message}"),
            Self::InvalidInputError => format!("Invalid input: {message}"),
            Self::UnknownError => format!("Error during {operation_label}: {message}"),
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an unstructured message; case-sensitive, first match wins.
pub fn category_of_message(message: &str) -> ErrorCategory {
    if NETWORK_MARKERS.iter().any(|marker| message.contains(marker)) {
        ErrorCategory::NetworkError
    } else if message.contains("ENS") {
        ErrorCategory::EnsProtocolError
    } else if INVALID_INPUT_MARKERS.iter().any(|marker| message.contains(marker)) {
        ErrorCategory::InvalidInputError
    } else {
        ErrorCategory::UnknownError
    }
}

pub fn category_of(error: &ResolveError) -> ErrorCategory {
    match error.kind() {
        ErrorKind::Network => ErrorCategory::NetworkError,
        ErrorKind::Protocol => ErrorCategory::EnsProtocolError,
        ErrorKind::InvalidInput => ErrorCategory::InvalidInputError,
        ErrorKind::Unclassified => category_of_message(error.message()),
    }
}

/// Classifies a raw message.
pub fn classify_message(message: &str, operation_label: &str) -> String {
    category_of_message(message).render(message, operation_label)
}

/// Classifies a structured error, using message heuristics only for
/// [`ErrorKind::Unclassified`].
pub fn classify(error: &ResolveError, operation_label: &str) -> String {
    let message = if error.message().trim().is_empty() {
        error.to_string()
    } else {
        error.message().to_owned()
    };

    category_of(error).render(&message, operation_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_cascade_matches_documented_examples() {
        assert_eq!(
            classify_message("fetch failed: timeout", "resolving name"),
            "Network error while accessing Ethereum providers. Please check your internet \
connection or try again later. Technical details: fetch failed: timeout"
        );
        assert_eq!(
            classify_message("invalid parameter: name", "resolving name"),
            "Invalid input: invalid parameter: name"
        );
        assert_eq!(
            classify_message("ENS: name not found", "resolving name"),
            "ENS error: ENS: name not found"
        );
        assert_eq!(
            classify_message("boom", "resolving name"),
            "Error during resolving name: boom"
        );
    }

    #[test]
    fn network_markers_win_over_later_rules() {
        assert_eq!(
            category_of_message("ENS network unreachable"),
            ErrorCategory::NetworkError
        );
        assert_eq!(
            category_of_message("ENS rejected invalid name"),
            ErrorCategory::EnsProtocolError
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(category_of_message("Network down"), ErrorCategory::UnknownError);
        assert_eq!(category_of_message("ens lookup"), ErrorCategory::UnknownError);
        assert_eq!(category_of_message("Invalid name"), ErrorCategory::UnknownError);
    }

    #[test]
    fn structured_kind_overrides_message_text() {
        let error = ResolveError::protocol("invalid resolver response");
        assert_eq!(category_of(&error), ErrorCategory::EnsProtocolError);
        assert_eq!(classify(&error, "x"), "ENS error: invalid resolver response");

        let error = ResolveError::invalid_input("not-an-address is not an address");
        assert_eq!(
            classify(&error, "x"),
            "Invalid input: not-an-address is not an address"
        );

        let error = ResolveError::network("connection refused");
        assert_eq!(category_of(&error), ErrorCategory::NetworkError);
    }

    #[test]
    fn unclassified_errors_fall_back_to_heuristics() {
        let error = ResolveError::unclassified("request timeout: upstream");
        assert_eq!(category_of(&error), ErrorCategory::NetworkError);

        let error = ResolveError::unclassified("boom");
        assert_eq!(
            classify(&error, "checking availability"),
            "Error during checking availability: boom"
        );
    }

    #[test]
    fn empty_message_falls_back_to_display_output() {
        let error = ResolveError::unclassified("");

        assert_eq!(
            classify(&error, "resolving name"),
            "Error during resolving name: unclassified error: "
        );
    }
}
