//! Per-parse settings, threaded explicitly into the lexer and parser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language revision, used by the punctuation heuristics to decide which
/// words start a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Proto2,
    Proto3,
    Editions,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Proto2 => "proto2",
            Dialect::Proto3 => "proto3",
            Dialect::Editions => "editions",
        }
    }

    /// The dialect selected by a `syntax = "..."` value, if recognized.
    pub fn from_syntax(value: &str) -> Option<Self> {
        match value {
            "proto2" => Some(Dialect::Proto2),
            "proto3" => Some(Dialect::Proto3),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}` (expected proto2, proto3 or editions)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proto2" => Ok(Dialect::Proto2),
            "proto3" => Ok(Dialect::Proto3),
            "editions" => Ok(Dialect::Editions),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Starting dialect; a `syntax` or `edition` declaration overrides it.
    pub dialect: Dialect,
    /// Editor mode: tolerated syntax problems are reported as warnings.
    pub extended_syntax: bool,
    /// Parser step budget.
    pub exec_fuel: Option<u32>,
    /// Parser nesting budget.
    pub recursion_limit: Option<u32>,
    /// Lexical errors reported before the lexer gives up on the file.
    pub max_lexer_errors: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Proto2,
            extended_syntax: false,
            exec_fuel: Some(1_000_000),
            recursion_limit: Some(256),
            max_lexer_errors: 100,
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_extended_syntax(mut self, enabled: bool) -> Self {
        self.extended_syntax = enabled;
        self
    }

    pub fn with_exec_fuel(mut self, fuel: Option<u32>) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn with_recursion_limit(mut self, limit: Option<u32>) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_max_lexer_errors(mut self, max: usize) -> Self {
        self.max_lexer_errors = max;
        self
    }
}
