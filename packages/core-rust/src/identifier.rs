//! Operation identifiers: a numeric index or a symbolic name.
//!
//! Every registered operation is addressable both ways. Which form a raw
//! string denotes is decided purely syntactically: an all-digits token is
//! an index, any other printable token is a name. Resolution (found /
//! not-found) is deferred to [`ModuleGroup`](crate::ModuleGroup) lookup.

use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// A caller-supplied reference to one operation, by global index or by name.
///
/// Two identifiers addressing the same operation through different forms
/// compare unequal; equality of addressing is decided by group lookup,
/// not by this type.
///
/// An operation whose name consists only of digits is unreachable by name:
/// the digit token always parses as index form. A digit run too long for
/// `u64` is kept as a name and fails at lookup instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Positional reference into the globally indexed operation list.
    Index(u64),
    /// Symbolic reference by operation name.
    Name(String),
}

impl FromStr for Identifier {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(DispatchError::MalformedIdentifier {
                text: s.to_string(),
            });
        }

        if text.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(match text.parse::<u64>() {
                Ok(index) => Self::Index(index),
                Err(_) => Self::Name(text.to_string()),
            });
        }

        if text.chars().all(|c| !c.is_whitespace() && !c.is_control()) {
            Ok(Self::Name(text.to_string()))
        } else {
            Err(DispatchError::MalformedIdentifier {
                text: s.to_string(),
            })
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}
