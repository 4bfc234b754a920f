#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Signal delivered by `terminate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerminateSignal {
    #[default]
    Term,
    Kill,
    Int,
    Hup,
}
