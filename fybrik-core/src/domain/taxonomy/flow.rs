// fybrik-core/src/domain/taxonomy/flow.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The data flow a request is asking for, per spec §3/§4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Read,
    Write,
    Copy,
    Delete,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Copy => "copy",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}
