use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Line and column of a diagnostic. Both are 1-based; `column` counts
/// tab-separated columns, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The four ordered top-level regions of a VCF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    Fileformat,
    Meta,
    Header,
    Body,
}

impl Section {
    pub fn default_message(self) -> &'static str {
        match self {
            Section::Fileformat => "Error in file format section",
            Section::Meta => "Error in meta-data section",
            Section::Header => "Error in header section",
            Section::Body => "Error in body section",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Fileformat => "file format",
            Section::Meta => "meta-data",
            Section::Header => "header",
            Section::Body => "body",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Grammar violation detected by the state machine.
    #[error("{message}")]
    Syntax {
        section: Section,
        position: Position,
        message: String,
    },
    /// A meta-information line whose tokens fit none of the entry shapes.
    #[error("Error in meta-data section: {n_tokens} tokens do not form a meta-information entry")]
    MetaShape { position: Position, n_tokens: usize },
    /// A token that is not valid UTF-8.
    #[error("{}: invalid UTF-8 in token ({reason})", .section.default_message())]
    Encoding {
        section: Section,
        position: Position,
        reason: String,
    },
    /// POS is not representable as a position. Never recoverable.
    #[error("Error in body section: invalid position `{value}'")]
    InvalidPosition { position: Position, value: String },
}

impl ParseError {
    pub fn position(&self) -> Position {
        use ParseError::*;
        match self {
            Syntax { position, .. } => *position,
            MetaShape { position, .. } => *position,
            Encoding { position, .. } => *position,
            InvalidPosition { position, .. } => *position,
        }
    }

    pub fn section(&self) -> Section {
        use ParseError::*;
        match self {
            Syntax { section, .. } | Encoding { section, .. } => *section,
            MetaShape { .. } => Section::Meta,
            InvalidPosition { .. } => Section::Body,
        }
    }

    /// Fatal errors end the session whatever the error policy is.
    pub fn is_fatal(&self) -> bool {
        use ParseError::*;
        match self {
            Syntax { .. } | MetaShape { .. } | Encoding { .. } => false,
            InvalidPosition { .. } => true,
        }
    }
}
