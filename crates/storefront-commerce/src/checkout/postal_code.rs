//! Brazilian postal code (CEP).

use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// An eight-digit CEP, stored as digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a CEP.
    pub const LEN: usize = 8;

    /// Parse user input, discarding anything that is not a digit.
    ///
    /// Valid iff exactly eight digits remain and they are not all zero.
    pub fn parse(input: &str) -> Result<Self, CommerceError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != Self::LEN || digits.bytes().all(|b| b == b'0') {
            return Err(CommerceError::InvalidPostalCode(input.to_string()));
        }
        Ok(Self(digits))
    }

    /// The bare digits, as sent to the API.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formatted as `12345-678`.
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for PostalCode {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
