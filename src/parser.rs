use tracing::trace;

use crate::context::ParsingContext;
use crate::error_policy::{AbortErrors, ErrorPolicy, ReportErrors};
use crate::parser_diagnostics::ParseError;
use crate::source::{Record, Source};
use crate::token_policy::{AccumulateTokens, DiscardTokens, TokenPolicy};

/// Syntax check only.
pub type QuickValidator<'a> = Parser<'a, DiscardTokens, ReportErrors>;
/// Materializes the file and reports every defect.
pub type FullValidator<'a> = Parser<'a, AccumulateTokens, ReportErrors>;
/// Materializes the file and stops at the first defect.
pub type Reader<'a> = Parser<'a, AccumulateTokens, AbortErrors>;

/// A streaming VCF parser. Feed it chunks of any size, then call
/// [`Parser::finish`].
#[derive(Debug)]
pub struct Parser<'a, T, E> {
    pub(crate) ctx: ParsingContext<'a>,
    pub(crate) tokens: T,
    pub(crate) errors: E,
}

impl<'a, T, E> Parser<'a, T, E>
where
    T: TokenPolicy + Default,
    E: ErrorPolicy + Default,
{
    pub fn new(source: &'a mut Source, records: &'a mut Vec<Record>) -> Self {
        Self::with_policies(source, records, T::default(), E::default())
    }
}

impl<'a, T, E> Parser<'a, T, E>
where
    T: TokenPolicy,
    E: ErrorPolicy,
{
    pub fn with_policies(
        source: &'a mut Source,
        records: &'a mut Vec<Record>,
        tokens: T,
        errors: E,
    ) -> Self {
        Parser {
            ctx: ParsingContext::new(source, records),
            tokens,
            errors,
        }
    }

    /// Scans the next chunk of the file. The chunk may end anywhere,
    /// including in the middle of a token or a UTF-8 sequence.
    pub fn feed<B: AsRef<[u8]>>(&mut self, chunk: B) -> Result<(), ParseError> {
        let chunk = chunk.as_ref();
        self.ctx.n_batches += 1;
        trace!(batch = self.ctx.n_batches, len = chunk.len(), "feeding chunk");
        self.parse_buffer(chunk, false)
    }

    /// Signals the end of input and checks that the file ended in an
    /// accepting state. Calling it again has no effect.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.parse_buffer(&[], true)
    }

    pub fn is_valid(&self) -> bool {
        self.ctx.is_valid()
    }

    /// Errors recorded by the error policy.
    pub fn errors(&self) -> &[ParseError] {
        self.errors.errors()
    }

    pub fn context(&self) -> &ParsingContext<'a> {
        &self.ctx
    }

    pub fn token_policy(&self) -> &T {
        &self.tokens
    }

    pub fn into_policies(self) -> (T, E) {
        (self.tokens, self.errors)
    }
}
