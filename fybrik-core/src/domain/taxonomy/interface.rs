// fybrik-core/src/domain/taxonomy/interface.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A connection protocol (`object-store`, `arrow-flight`, `jdbc-db2`, ...).
/// Kept as an open newtype: the set of protocols is defined by the admin's
/// taxonomy schema, not by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Protocol(pub String);

impl Protocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Protocol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A data format (`csv`, `parquet`, `json`, ...) or [`DataFormat::Any`] — the
/// wildcard that matches any concrete format, per spec §3.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFormat {
    Any,
    Named(String),
}

impl DataFormat {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Field-wise equality with the `Any` wildcard absorbing any concrete value.
    pub fn matches(&self, other: &DataFormat) -> bool {
        matches!((self, other), (DataFormat::Any, _) | (_, DataFormat::Any))
            || self == other
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Any => write!(f, "*"),
            DataFormat::Named(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for DataFormat {
    fn from(s: &str) -> Self {
        Self::Named(s.to_string())
    }
}

/// `(protocol, format)` pair describing a data connection, per spec §3.
/// Equality is field-wise; the `Any` format matches any format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interface {
    pub protocol: Protocol,
    pub format: DataFormat,
}

impl Interface {
    pub fn new(protocol: impl Into<Protocol>, format: DataFormat) -> Self {
        Self {
            protocol: protocol.into(),
            format,
        }
    }

    /// Whether `self` can serve as a source/sink matching `other`'s demand:
    /// protocol must be equal, format matches per [`DataFormat::matches`].
    pub fn matches(&self, other: &Interface) -> bool {
        self.protocol == other.protocol && self.format.matches(&other.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_format_matches_named() {
        let any = DataFormat::Any;
        let csv = DataFormat::named("csv");
        assert!(any.matches(&csv));
        assert!(csv.matches(&any));
    }

    #[test]
    fn named_formats_must_be_equal() {
        assert!(!DataFormat::named("csv").matches(&DataFormat::named("parquet")));
        assert!(DataFormat::named("csv").matches(&DataFormat::named("csv")));
    }

    #[test]
    fn interface_matches_requires_equal_protocol() {
        let a = Interface::new("s3", DataFormat::named("csv"));
        let b = Interface::new("jdbc-db2", DataFormat::named("csv"));
        assert!(!a.matches(&b));
    }

    #[test]
    fn interface_matches_with_wildcard_format() {
        let a = Interface::new("s3", DataFormat::Any);
        let b = Interface::new("s3", DataFormat::named("parquet"));
        assert!(a.matches(&b));
    }
}
