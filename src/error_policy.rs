//! What to do when a section of the input is malformed.

use tracing::debug;

use crate::context::ParsingContext;
use crate::parser_diagnostics::{ParseError, Section};

pub trait ErrorPolicy {
    /// Decides the fate of an error. Returning `Err` ends the session;
    /// returning `Ok` lets the parser skip to the next line.
    fn handle_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        error: ParseError,
    ) -> Result<(), ParseError>;

    /// Errors recorded so far.
    fn errors(&self) -> &[ParseError] {
        &[]
    }

    fn handle_fileformat_section_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        message: Option<&str>,
    ) -> Result<(), ParseError> {
        let error = section_error(ctx, Section::Fileformat, message);
        self.handle_error(ctx, error)
    }

    fn handle_meta_section_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        message: Option<&str>,
    ) -> Result<(), ParseError> {
        let error = section_error(ctx, Section::Meta, message);
        self.handle_error(ctx, error)
    }

    fn handle_header_section_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        message: Option<&str>,
    ) -> Result<(), ParseError> {
        let error = section_error(ctx, Section::Header, message);
        self.handle_error(ctx, error)
    }

    fn handle_body_section_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        message: Option<&str>,
    ) -> Result<(), ParseError> {
        let error = section_error(ctx, Section::Body, message);
        self.handle_error(ctx, error)
    }
}

fn section_error(ctx: &ParsingContext<'_>, section: Section, message: Option<&str>) -> ParseError {
    ParseError::Syntax {
        section,
        position: ctx.position(),
        message: String::from(message.unwrap_or_else(|| section.default_message())),
    }
}

/// Stops at the first error. For input that was validated upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortErrors;

impl ErrorPolicy for AbortErrors {
    fn handle_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        error: ParseError,
    ) -> Result<(), ParseError> {
        ctx.invalidate();
        Err(error)
    }
}

/// Records every error and keeps going.
#[derive(Debug, Clone, Default)]
pub struct ReportErrors {
    errors: Vec<ParseError>,
}

impl ReportErrors {
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}

impl ErrorPolicy for ReportErrors {
    fn handle_error(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        error: ParseError,
    ) -> Result<(), ParseError> {
        let position = error.position();
        debug!(
            line = position.line,
            column = position.column,
            section = %error.section(),
            "{}",
            error
        );
        ctx.invalidate();
        self.errors.push(error);
        Ok(())
    }

    fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}
