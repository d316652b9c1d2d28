//! What to do with recognized tokens.

use std::collections::{BTreeMap, HashMap};
use std::mem;

use bstr::ByteSlice;

use crate::context::ParsingContext;
use crate::lexing::Column;
use crate::parser_diagnostics::{ParseError, Section};
use crate::source::{MetaEntry, Record};

/// Callbacks fired by the state machine as tokens and lines complete.
///
/// Every callback defaults to doing nothing. Callbacks that complete a line
/// may fail; the parser sends non-fatal failures through the error policy.
pub trait TokenPolicy {
    fn handle_token_begin(&mut self, _ctx: &ParsingContext<'_>) {}
    fn handle_token_char(&mut self, _ctx: &ParsingContext<'_>, _c: u8) {}
    fn handle_token_end(&mut self, _ctx: &ParsingContext<'_>) {}
    fn handle_newline(&mut self, _ctx: &ParsingContext<'_>) {}

    fn handle_fileformat(&mut self, _ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        Ok(())
    }

    fn handle_meta_typeid(&mut self, _ctx: &ParsingContext<'_>) {}
    fn handle_meta_key(&mut self, _ctx: &ParsingContext<'_>) {}
    fn handle_meta_value(&mut self, _ctx: &ParsingContext<'_>) {}

    fn handle_meta_line(&mut self, _ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        Ok(())
    }

    fn handle_sample_name(&mut self, _ctx: &ParsingContext<'_>) {}

    fn handle_header_line(&mut self, _ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        Ok(())
    }

    /// `n_columns` is the 1-based index of the column just completed.
    fn handle_column_end(&mut self, _ctx: &ParsingContext<'_>, _n_columns: usize) {}

    fn handle_body_line(&mut self, _ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        Ok(())
    }

    /// The token being scanned, if this policy keeps it.
    fn current_token(&self) -> Option<&[u8]> {
        None
    }
}

/// Syntax check only: nothing is materialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardTokens;

impl TokenPolicy for DiscardTokens {}

/// Builds `MetaEntry` and `Record` values and commits them to the context.
#[derive(Debug, Clone, Default)]
pub struct AccumulateTokens {
    current_token: Vec<u8>,
    line_typeid: Option<Vec<u8>>,
    grouped_tokens: Vec<Vec<u8>>,
    line_tokens: HashMap<Column, Vec<Vec<u8>>>,
}

impl TokenPolicy for AccumulateTokens {
    fn handle_token_begin(&mut self, _ctx: &ParsingContext<'_>) {
        self.current_token.clear();
    }

    fn handle_token_char(&mut self, _ctx: &ParsingContext<'_>, c: u8) {
        self.current_token.push(c);
    }

    fn handle_token_end(&mut self, _ctx: &ParsingContext<'_>) {
        self.grouped_tokens.push(mem::take(&mut self.current_token));
    }

    fn handle_newline(&mut self, _ctx: &ParsingContext<'_>) {
        self.current_token.clear();
        self.line_typeid = None;
        self.grouped_tokens.clear();
        self.line_tokens.clear();
    }

    fn handle_fileformat(&mut self, ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        let version = self.grouped_tokens.pop().unwrap_or_default();
        let version = decode(ctx, Section::Fileformat, version)?;
        ctx.set_version(version);
        Ok(())
    }

    fn handle_meta_typeid(&mut self, _ctx: &ParsingContext<'_>) {
        self.line_typeid = self.grouped_tokens.pop();
    }

    fn handle_meta_line(&mut self, ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        let type_id = self
            .line_typeid
            .take()
            .map(|type_id| decode(ctx, Section::Meta, type_id))
            .transpose()?;
        let tokens = decode_all(ctx, Section::Meta, mem::take(&mut self.grouped_tokens))?;
        let entry = MetaEntry::from_tokens(type_id, tokens).map_err(|e| ParseError::MetaShape {
            position: ctx.position(),
            n_tokens: e.n_tokens,
        })?;
        ctx.add_meta(entry);
        Ok(())
    }

    fn handle_header_line(&mut self, ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        let samples = decode_all(ctx, Section::Header, mem::take(&mut self.grouped_tokens))?;
        ctx.set_samples(samples);
        Ok(())
    }

    fn handle_column_end(&mut self, _ctx: &ParsingContext<'_>, n_columns: usize) {
        let tokens = mem::take(&mut self.grouped_tokens);
        self.line_tokens
            .entry(Column::from_index(n_columns))
            .or_default()
            .extend(tokens);
    }

    fn handle_body_line(&mut self, ctx: &mut ParsingContext<'_>) -> Result<(), ParseError> {
        let mut columns = mem::take(&mut self.line_tokens);
        let quality = columns.remove(&Column::Qual).unwrap_or_default().concat();
        let mut column = |column: Column| {
            let tokens = columns.remove(&column).unwrap_or_default();
            decode_all(&*ctx, Section::Body, tokens)
        };
        let chromosome = column(Column::Chrom)?.concat();
        let position = column(Column::Pos)?.concat();
        let ids = column(Column::Id)?;
        let reference = column(Column::Ref)?.concat();
        let alternates = column(Column::Alt)?;
        let filters = column(Column::Filter)?;
        let info = column(Column::Info)?;
        let format = column(Column::Format)?;
        let sample_columns = column(Column::Samples)?;
        let mut samples = Vec::with_capacity(ctx.samples().len());
        samples.extend(sample_columns);

        let position = position
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidPosition {
                position: ctx.position(),
                value: position.clone(),
            })?;
        let quality = quality
            .to_str()
            .ok()
            .and_then(|quality| quality.parse::<f64>().ok())
            .filter(|quality| quality.is_finite())
            .unwrap_or(0.0);
        let info = info
            .into_iter()
            .map(|field| match field.split_once('=') {
                Some((key, value)) => (key.to_owned(), Some(value.to_owned())),
                None => (field, None),
            })
            .collect::<BTreeMap<_, _>>();

        ctx.add_record(Record {
            chromosome,
            position,
            ids,
            reference,
            alternates,
            quality,
            filters,
            info,
            format,
            samples,
        });
        Ok(())
    }

    fn current_token(&self) -> Option<&[u8]> {
        Some(&self.current_token)
    }
}

fn decode(
    ctx: &ParsingContext<'_>,
    section: Section,
    token: Vec<u8>,
) -> Result<String, ParseError> {
    String::from_utf8(token).map_err(|e| ParseError::Encoding {
        section,
        position: ctx.position(),
        reason: e.utf8_error().to_string(),
    })
}

fn decode_all(
    ctx: &ParsingContext<'_>,
    section: Section,
    tokens: Vec<Vec<u8>>,
) -> Result<Vec<String>, ParseError> {
    tokens
        .into_iter()
        .map(|token| decode(ctx, section, token))
        .collect()
}
