use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const ETH_SUFFIX: &str = ".eth";

/// Name normalized to carry a top-level label, `.eth` when none was given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnsName(String);

impl EnsName {
    /// Trims the input and appends `.eth` when it does not already end with it.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::NameContainsWhitespace {
                value: trimmed.to_owned(),
            });
        }

        let normalized = if trimmed.ends_with(ETH_SUFFIX) {
            trimmed.to_owned()
        } else {
            format!("{trimmed}{ETH_SUFFIX}")
        };

        if normalized.split('.').any(str::is_empty) {
            return Err(ValidationError::EmptyLabel { value: normalized });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EnsName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EnsName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EnsName> for String {
    fn from(value: EnsName) -> Self {
        value.0
    }
}
