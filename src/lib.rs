pub use crate::parser::{FullValidator, Parser, QuickValidator, Reader};
pub use crate::parser_diagnostics::{ParseError, Position, Section};
pub use crate::parsing::{check, read, validate};
pub use crate::source::{MetaEntry, MetaShapeError, Record, Source};

pub mod context;
pub mod error_policy;
pub mod lexing;
pub mod parser;
pub mod parser_diagnostics;
pub mod parsing;
pub mod source;
pub mod token_policy;
pub(crate) mod util;
