use tracing::debug;

use crate::error_policy::ErrorPolicy;
use crate::parser::Parser;
use crate::parser_diagnostics::{ParseError, Section};
use crate::token_policy::TokenPolicy;
use crate::util::ByteExt;

const FILEFORMAT_KEY: &[u8] = b"##fileformat=";
const FILEFORMAT_MAGIC: &[u8] = b"VCFv";
/// Header line after its leading `#`.
const HEADER_COLUMNS: &[u8] = b"CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT";

/// Where the machine is in the grammar. This is the only state carried from
/// one chunk to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineState {
    /// Matched this many bytes of `##fileformat=`.
    FileformatKey(u8),
    /// Matched this many bytes of `VCFv`.
    FileformatMagic(u8),
    FileformatMajor { seen_digit: bool },
    FileformatMinor { seen_digit: bool },

    /// At the start of a meta-information or header line.
    MetaLineStart,
    /// After a line's first `#`.
    MetaHash,
    /// After `##`.
    MetaStart,
    /// Key-shaped prefix of a meta line: either a type-id or a bare value.
    MetaKey,
    MetaBareValue,
    /// After `key=`.
    MetaValueStart,
    MetaValue,
    MetaFieldKeyStart,
    MetaFieldKey,
    MetaFieldValueStart,
    MetaFieldValue,
    MetaFieldQuoted,
    /// After a backslash inside a quoted field value.
    MetaFieldEscape,
    MetaFieldQuoteEnd,
    /// After the closing `>`.
    MetaFieldsEnd,

    /// Matched this many bytes of the fixed header columns.
    HeaderFixed(u8),
    HeaderSampleStart,
    HeaderSample,

    /// At the start of a data line. The only accepting state.
    BodyLineStart,
    BodyTokenStart,
    BodyToken,

    /// Discarding the rest of a malformed line.
    SkipLine(Section),
    Finished,
    Aborted,
}

impl MachineState {
    pub const START: MachineState = MachineState::FileformatKey(0);

    pub fn section(self) -> Section {
        use MachineState::*;
        match self {
            FileformatKey(_) | FileformatMagic(_) | FileformatMajor { .. }
            | FileformatMinor { .. } => Section::Fileformat,
            MetaLineStart | MetaHash | MetaStart | MetaKey | MetaBareValue | MetaValueStart
            | MetaValue | MetaFieldKeyStart | MetaFieldKey | MetaFieldValueStart
            | MetaFieldValue | MetaFieldQuoted | MetaFieldEscape | MetaFieldQuoteEnd
            | MetaFieldsEnd => Section::Meta,
            HeaderFixed(_) | HeaderSampleStart | HeaderSample => Section::Header,
            BodyLineStart | BodyTokenStart | BodyToken | Finished | Aborted => Section::Body,
            SkipLine(section) => section,
        }
    }

    fn resume(section: Section) -> MachineState {
        match section {
            Section::Fileformat | Section::Meta => MachineState::MetaLineStart,
            Section::Header | Section::Body => MachineState::BodyLineStart,
        }
    }
}

/// Columns of a data line. Indices 1 to 9 are fixed; every later index is a
/// sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Chrom,
    Pos,
    Id,
    Ref,
    Alt,
    Qual,
    Filter,
    Info,
    Format,
    Samples,
}

impl Column {
    /// Number of columns before the first sample.
    pub const FIXED: usize = 9;

    /// Maps a 1-based column index to its column.
    pub fn from_index(n: usize) -> Column {
        debug_assert!(n >= 1, "column indices start at 1");
        match n {
            0 | 1 => Column::Chrom,
            2 => Column::Pos,
            3 => Column::Id,
            4 => Column::Ref,
            5 => Column::Alt,
            6 => Column::Qual,
            7 => Column::Filter,
            8 => Column::Info,
            9 => Column::Format,
            _ => Column::Samples,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Chrom => "CHROM",
            Column::Pos => "POS",
            Column::Id => "ID",
            Column::Ref => "REF",
            Column::Alt => "ALT",
            Column::Qual => "QUAL",
            Column::Filter => "FILTER",
            Column::Info => "INFO",
            Column::Format => "FORMAT",
            Column::Samples => "sample",
        }
    }

    /// Byte splitting a column into several tokens.
    fn separator(self) -> Option<u8> {
        match self {
            Column::Id | Column::Filter | Column::Info => Some(b';'),
            Column::Alt => Some(b','),
            Column::Format => Some(b':'),
            Column::Chrom | Column::Pos | Column::Ref | Column::Qual | Column::Samples => None,
        }
    }

    fn accepts(self, c: u8) -> bool {
        match self {
            Column::Chrom => c.is_token_byte() && c != b':',
            Column::Pos => c.is_ascii_digit(),
            Column::Ref => matches!(
                c,
                b'A' | b'C' | b'G' | b'T' | b'N' | b'a' | b'c' | b'g' | b't' | b'n'
            ),
            Column::Info | Column::Samples => {
                (c == b' ' || c.is_token_byte()) && Some(c) != self.separator()
            }
            Column::Id | Column::Alt | Column::Qual | Column::Filter | Column::Format => {
                c.is_token_byte() && Some(c) != self.separator()
            }
        }
    }
}

impl<'a, T, E> Parser<'a, T, E>
where
    T: TokenPolicy,
    E: ErrorPolicy,
{
    pub(crate) fn parse_buffer(&mut self, buf: &[u8], is_final: bool) -> Result<(), ParseError> {
        match self.ctx.cs {
            MachineState::Aborted => return Ok(()),
            MachineState::Finished if !buf.is_empty() => {
                let result = self.errors.handle_body_section_error(
                    &mut self.ctx,
                    Some("Error in body section: input after end of stream"),
                );
                return self.settle(MachineState::Finished, result);
            }
            _ => {}
        }
        for &c in buf {
            self.step(c)?;
        }
        if is_final {
            self.end_of_input()?;
        }
        Ok(())
    }

    fn end_of_input(&mut self) -> Result<(), ParseError> {
        match self.ctx.cs {
            MachineState::BodyLineStart => {
                debug!(
                    lines = self.ctx.n_lines,
                    batches = self.ctx.n_batches,
                    valid = self.ctx.is_valid,
                    "end of input"
                );
                self.ctx.cs = MachineState::Finished;
                Ok(())
            }
            MachineState::Finished | MachineState::Aborted => Ok(()),
            // The header is what is missing.
            MachineState::MetaLineStart => {
                let result = self.errors.handle_header_section_error(
                    &mut self.ctx,
                    Some("Error in header section: unexpected end of input"),
                );
                self.settle(MachineState::Finished, result)
            }
            cs => {
                let section = cs.section();
                let message = format!("{}: unexpected end of input", section.default_message());
                let result = self.section_error(section, &message);
                self.settle(MachineState::Finished, result)
            }
        }
    }

    fn step(&mut self, c: u8) -> Result<(), ParseError> {
        use MachineState::*;
        match self.ctx.cs {
            FileformatKey(n) => {
                let n = usize::from(n);
                if c != FILEFORMAT_KEY[n] {
                    return self.fileformat_error(c);
                }
                self.ctx.cs = if n + 1 == FILEFORMAT_KEY.len() {
                    FileformatMagic(0)
                } else {
                    FileformatKey((n + 1) as u8)
                };
            }
            FileformatMagic(n) => {
                let n = usize::from(n);
                if c != FILEFORMAT_MAGIC[n] {
                    return self.fileformat_error(c);
                }
                if n == 0 {
                    self.begin_token();
                }
                self.push_char(c);
                self.ctx.cs = if n + 1 == FILEFORMAT_MAGIC.len() {
                    FileformatMajor { seen_digit: false }
                } else {
                    FileformatMagic((n + 1) as u8)
                };
            }
            FileformatMajor { seen_digit } => match c {
                b'0'..=b'9' => {
                    self.push_char(c);
                    self.ctx.cs = FileformatMajor { seen_digit: true };
                }
                b'.' if seen_digit => {
                    self.push_char(c);
                    self.ctx.cs = FileformatMinor { seen_digit: false };
                }
                _ => return self.fileformat_error(c),
            },
            FileformatMinor { seen_digit } => match c {
                b'0'..=b'9' => {
                    self.push_char(c);
                    self.ctx.cs = FileformatMinor { seen_digit: true };
                }
                b'\n' if seen_digit => {
                    self.end_token();
                    let result = self.tokens.handle_fileformat(&mut self.ctx);
                    return self.complete_line(Section::Fileformat, result, MetaLineStart);
                }
                _ => return self.fileformat_error(c),
            },

            MetaLineStart => match c {
                b'#' => self.ctx.cs = MetaHash,
                b'\n' => return self.unexpected(Section::Meta, c, "in meta-information line"),
                _ => return self.unexpected(Section::Header, c, "at start of header line"),
            },
            MetaHash => match c {
                b'#' => self.ctx.cs = MetaStart,
                _ if c == HEADER_COLUMNS[0] => self.ctx.cs = HeaderFixed(1),
                _ => return self.header_column_error(c, 0),
            },
            MetaStart => {
                if c.is_key_byte() {
                    self.begin_token();
                    self.push_char(c);
                    self.ctx.cs = MetaKey;
                } else if c.is_line_byte() {
                    self.begin_token();
                    self.push_char(c);
                    self.ctx.cs = MetaBareValue;
                } else {
                    return self.unexpected(Section::Meta, c, "in meta-information line");
                }
            }
            MetaKey => match c {
                b'=' => {
                    self.end_token();
                    self.tokens.handle_meta_typeid(&self.ctx);
                    self.ctx.cs = MetaValueStart;
                }
                b'\n' => return self.complete_meta_line(),
                _ if c.is_key_byte() => self.push_char(c),
                _ if c.is_line_byte() => {
                    self.push_char(c);
                    self.ctx.cs = MetaBareValue;
                }
                _ => return self.unexpected(Section::Meta, c, "in meta-information line"),
            },
            MetaBareValue => match c {
                b'\n' => return self.complete_meta_line(),
                _ if c.is_line_byte() => self.push_char(c),
                _ => return self.unexpected(Section::Meta, c, "in meta-information line"),
            },
            MetaValueStart => match c {
                b'<' => self.ctx.cs = MetaFieldKeyStart,
                _ if c.is_line_byte() => {
                    self.begin_token();
                    self.push_char(c);
                    self.ctx.cs = MetaValue;
                }
                _ => return self.unexpected(Section::Meta, c, "in meta-information value"),
            },
            MetaValue => match c {
                b'\n' => {
                    self.end_token();
                    self.tokens.handle_meta_value(&self.ctx);
                    return self.complete_meta_line();
                }
                _ if c.is_line_byte() => self.push_char(c),
                _ => return self.unexpected(Section::Meta, c, "in meta-information value"),
            },
            MetaFieldKeyStart => {
                if !c.is_key_byte() {
                    return self.unexpected(Section::Meta, c, "in meta-information field key");
                }
                self.begin_token();
                self.push_char(c);
                self.ctx.cs = MetaFieldKey;
            }
            MetaFieldKey => match c {
                b'=' => {
                    self.end_token();
                    self.tokens.handle_meta_key(&self.ctx);
                    self.ctx.cs = MetaFieldValueStart;
                }
                _ if c.is_key_byte() => self.push_char(c),
                _ => return self.unexpected(Section::Meta, c, "in meta-information field key"),
            },
            MetaFieldValueStart => match c {
                b'"' => {
                    self.begin_token();
                    self.push_char(c);
                    self.ctx.cs = MetaFieldQuoted;
                }
                b',' | b'>' => {
                    return self.unexpected(Section::Meta, c, "in meta-information field value")
                }
                _ if c.is_line_byte() => {
                    self.begin_token();
                    self.push_char(c);
                    self.ctx.cs = MetaFieldValue;
                }
                _ => return self.unexpected(Section::Meta, c, "in meta-information field value"),
            },
            MetaFieldValue | MetaFieldQuoteEnd => match c {
                b',' => {
                    self.end_token();
                    self.tokens.handle_meta_value(&self.ctx);
                    self.ctx.cs = MetaFieldKeyStart;
                }
                b'>' => {
                    self.end_token();
                    self.tokens.handle_meta_value(&self.ctx);
                    self.ctx.cs = MetaFieldsEnd;
                }
                _ if self.ctx.cs == MetaFieldValue && c.is_line_byte() => self.push_char(c),
                _ => return self.unexpected(Section::Meta, c, "in meta-information field value"),
            },
            MetaFieldQuoted => match c {
                b'\\' => {
                    self.push_char(c);
                    self.ctx.cs = MetaFieldEscape;
                }
                b'"' => {
                    self.push_char(c);
                    self.ctx.cs = MetaFieldQuoteEnd;
                }
                _ if c.is_line_byte() => self.push_char(c),
                _ => return self.unexpected(Section::Meta, c, "in quoted meta-information value"),
            },
            MetaFieldEscape => {
                if !c.is_line_byte() {
                    return self.unexpected(Section::Meta, c, "in quoted meta-information value");
                }
                self.push_char(c);
                self.ctx.cs = MetaFieldQuoted;
            }
            MetaFieldsEnd => match c {
                b'\n' => return self.complete_meta_line(),
                _ => return self.unexpected(Section::Meta, c, "after meta-information fields"),
            },

            HeaderFixed(n) => {
                let n = usize::from(n);
                if n == HEADER_COLUMNS.len() {
                    match c {
                        b'\t' => {
                            self.ctx.n_columns += 1;
                            self.ctx.cs = HeaderSampleStart;
                        }
                        b'\n' => return self.complete_header_line(),
                        _ => return self.unexpected(Section::Header, c, "after FORMAT column"),
                    }
                } else if c == HEADER_COLUMNS[n] {
                    if c == b'\t' {
                        self.ctx.n_columns += 1;
                    }
                    self.ctx.cs = HeaderFixed((n + 1) as u8);
                } else {
                    return self.header_column_error(c, n);
                }
            }
            HeaderSampleStart => {
                if !(c == b' ' || c.is_token_byte()) {
                    return self.unexpected(Section::Header, c, "in sample name");
                }
                self.begin_token();
                self.push_char(c);
                self.ctx.cs = HeaderSample;
            }
            HeaderSample => match c {
                b'\t' => {
                    self.end_token();
                    self.tokens.handle_sample_name(&self.ctx);
                    self.ctx.n_columns += 1;
                    self.ctx.cs = HeaderSampleStart;
                }
                b'\n' => {
                    self.end_token();
                    self.tokens.handle_sample_name(&self.ctx);
                    return self.complete_header_line();
                }
                _ if c == b' ' || c.is_token_byte() => self.push_char(c),
                _ => return self.unexpected(Section::Header, c, "in sample name"),
            },

            BodyLineStart | BodyTokenStart => {
                let column = Column::from_index(self.ctx.n_columns);
                if !column.accepts(c) || (self.ctx.cs == BodyLineStart && c == b'#') {
                    return self.body_column_error(c);
                }
                self.begin_token();
                self.push_char(c);
                self.ctx.cs = BodyToken;
            }
            BodyToken => {
                let column = Column::from_index(self.ctx.n_columns);
                if column.accepts(c) {
                    self.push_char(c);
                } else if Some(c) == column.separator() {
                    self.end_token();
                    self.ctx.cs = BodyTokenStart;
                } else if c == b'\t' {
                    if let Some(expected) = self.expected_columns() {
                        if self.ctx.n_columns >= expected {
                            let message = format!(
                                "{}: expected {} columns, found more",
                                Section::Body.default_message(),
                                expected
                            );
                            return self.error_at(Section::Body, c, &message);
                        }
                    }
                    self.end_token();
                    self.tokens.handle_column_end(&self.ctx, self.ctx.n_columns);
                    self.ctx.n_columns += 1;
                    self.ctx.cs = BodyTokenStart;
                } else if c == b'\n' {
                    self.end_token();
                    self.tokens.handle_column_end(&self.ctx, self.ctx.n_columns);
                    return self.complete_body_line();
                } else {
                    return self.body_column_error(c);
                }
            }

            SkipLine(section) => {
                if c == b'\n' {
                    self.newline(MachineState::resume(section));
                }
            }
            Finished | Aborted => {}
        }
        Ok(())
    }

    fn complete_meta_line(&mut self) -> Result<(), ParseError> {
        self.end_token_if_open();
        let result = self.tokens.handle_meta_line(&mut self.ctx);
        self.complete_line(Section::Meta, result, MachineState::MetaLineStart)
    }

    fn complete_header_line(&mut self) -> Result<(), ParseError> {
        let n_samples = self.ctx.n_columns - Column::FIXED;
        self.ctx.n_samples = Some(n_samples);
        debug!(line = self.ctx.n_lines + 1, n_samples, "header line");
        let result = self.tokens.handle_header_line(&mut self.ctx);
        self.complete_line(Section::Header, result, MachineState::BodyLineStart)
    }

    fn complete_body_line(&mut self) -> Result<(), ParseError> {
        let n_columns = self.ctx.n_columns;
        match self.expected_columns() {
            Some(expected) if n_columns != expected => {
                let message = format!(
                    "{}: expected {} columns, found {}",
                    Section::Body.default_message(),
                    expected,
                    n_columns
                );
                return self.error_at(Section::Body, b'\n', &message);
            }
            None if n_columns < Column::FIXED => {
                let message = format!(
                    "{}: expected at least {} columns, found {}",
                    Section::Body.default_message(),
                    Column::FIXED,
                    n_columns
                );
                return self.error_at(Section::Body, b'\n', &message);
            }
            _ => {}
        }
        let result = self.tokens.handle_body_line(&mut self.ctx);
        self.complete_line(Section::Body, result, MachineState::BodyLineStart)
    }

    fn expected_columns(&self) -> Option<usize> {
        self.ctx.n_samples.map(|n_samples| Column::FIXED + n_samples)
    }

    /// Meta lines end their last token themselves unless it is a bare value
    /// or a lone key.
    fn end_token_if_open(&mut self) {
        if matches!(self.ctx.cs, MachineState::MetaKey | MachineState::MetaBareValue) {
            self.end_token();
        }
    }

    /// Finishes a line whose completion callback returned `result`.
    fn complete_line(
        &mut self,
        section: Section,
        result: Result<(), ParseError>,
        next: MachineState,
    ) -> Result<(), ParseError> {
        match result {
            Ok(()) => {
                self.newline(next);
                Ok(())
            }
            Err(error) if error.is_fatal() => {
                self.ctx.invalidate();
                self.ctx.cs = MachineState::Aborted;
                Err(error)
            }
            Err(error) => {
                let result = self.errors.handle_error(&mut self.ctx, error);
                self.recover(section, b'\n', result)
            }
        }
    }

    fn newline(&mut self, next: MachineState) {
        self.tokens.handle_newline(&self.ctx);
        self.ctx.n_lines += 1;
        self.ctx.n_columns = 1;
        self.ctx.cs = next;
    }

    fn fileformat_error(&mut self, c: u8) -> Result<(), ParseError> {
        let message = format!(
            "{}: unexpected {}, expected `##fileformat=VCFv<major>.<minor>'",
            Section::Fileformat.default_message(),
            c.describe()
        );
        self.error_at(Section::Fileformat, c, &message)
    }

    fn header_column_error(&mut self, c: u8, matched: usize) -> Result<(), ParseError> {
        let expected = if HEADER_COLUMNS[matched] == b'\t' {
            String::from("tab")
        } else {
            let index = HEADER_COLUMNS[..matched]
                .iter()
                .filter(|&&b| b == b'\t')
                .count();
            format!("column {}", Column::from_index(index + 1).name())
        };
        let message = format!(
            "{}: unexpected {}, expected {}",
            Section::Header.default_message(),
            c.describe(),
            expected
        );
        self.error_at(Section::Header, c, &message)
    }

    fn body_column_error(&mut self, c: u8) -> Result<(), ParseError> {
        let column = Column::from_index(self.ctx.n_columns);
        let message = format!(
            "{}: unexpected {} in {} column",
            Section::Body.default_message(),
            c.describe(),
            column.name()
        );
        self.error_at(Section::Body, c, &message)
    }

    fn unexpected(&mut self, section: Section, c: u8, place: &str) -> Result<(), ParseError> {
        let message = format!(
            "{}: unexpected {} {}",
            section.default_message(),
            c.describe(),
            place
        );
        self.error_at(section, c, &message)
    }

    /// Reports a grammar error found at byte `c` and resynchronizes.
    fn error_at(&mut self, section: Section, c: u8, message: &str) -> Result<(), ParseError> {
        let result = self.section_error(section, message);
        self.recover(section, c, result)
    }

    fn section_error(&mut self, section: Section, message: &str) -> Result<(), ParseError> {
        let message = Some(message);
        match section {
            Section::Fileformat => self
                .errors
                .handle_fileformat_section_error(&mut self.ctx, message),
            Section::Meta => self.errors.handle_meta_section_error(&mut self.ctx, message),
            Section::Header => self
                .errors
                .handle_header_section_error(&mut self.ctx, message),
            Section::Body => self.errors.handle_body_section_error(&mut self.ctx, message),
        }
    }

    /// Moves past a reported error: the rest of the line is skipped. An
    /// error the policy refused to absorb aborts the session.
    fn recover(
        &mut self,
        section: Section,
        c: u8,
        result: Result<(), ParseError>,
    ) -> Result<(), ParseError> {
        if section == Section::Header {
            self.ctx.n_samples = None;
        }
        match result {
            Ok(()) if c == b'\n' => {
                self.newline(MachineState::resume(section));
                Ok(())
            }
            Ok(()) => {
                self.ctx.cs = MachineState::SkipLine(section);
                Ok(())
            }
            Err(error) => {
                self.ctx.invalidate();
                self.ctx.cs = MachineState::Aborted;
                Err(error)
            }
        }
    }

    /// Leaves the machine in `next`, or aborted if the policy refused the
    /// error.
    fn settle(
        &mut self,
        next: MachineState,
        result: Result<(), ParseError>,
    ) -> Result<(), ParseError> {
        match result {
            Ok(()) => {
                self.ctx.cs = next;
                Ok(())
            }
            Err(error) => {
                self.ctx.cs = MachineState::Aborted;
                Err(error)
            }
        }
    }

    fn begin_token(&mut self) {
        self.tokens.handle_token_begin(&self.ctx);
    }

    fn push_char(&mut self, c: u8) {
        self.tokens.handle_token_char(&self.ctx, c);
    }

    fn end_token(&mut self) {
        self.tokens.handle_token_end(&self.ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FullValidator;
    use crate::source::Source;

    #[test]
    fn test_state_survives_chunks() {
        let mut source = Source::new();
        let mut records = vec![];
        let mut parser = FullValidator::new(&mut source, &mut records);
        parser.feed("##fileformat=VCF").unwrap();
        assert_eq!(parser.ctx.cs, MachineState::FileformatMagic(3));
        parser.feed("v4.2\n##source=abc").unwrap();
        assert_eq!(parser.ctx.cs, MachineState::MetaValue);
        assert_eq!(parser.token_policy().current_token(), Some(&b"abc"[..]));
        parser.feed("def\n#CHROM\tPOS").unwrap();
        assert_eq!(parser.ctx.cs, MachineState::HeaderFixed(9));
        assert_eq!(parser.ctx.n_columns, 2);
        assert_eq!(parser.ctx.n_lines, 2);
        assert_eq!(parser.ctx.cs.section(), Section::Header);
        drop(parser);
        assert_eq!(source.version(), "VCFv4.2");
        assert_eq!(source.meta()[0].id(), Some("source"));
    }

    #[test]
    fn test_column_rules() {
        assert_eq!(Column::from_index(1), Column::Chrom);
        assert_eq!(Column::from_index(9), Column::Format);
        assert_eq!(Column::from_index(12), Column::Samples);
        assert!(!Column::Chrom.accepts(b':'));
        assert!(!Column::Pos.accepts(b'-'));
        assert!(Column::Ref.accepts(b'n'));
        assert!(!Column::Ref.accepts(b'X'));
        assert!(!Column::Alt.accepts(b','));
        assert!(Column::Info.accepts(b' '));
        assert!(!Column::Format.accepts(b':'));
        assert!(Column::Samples.accepts(b':'));
        assert!(!Column::Samples.accepts(b'\t'));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "column indices start at 1")]
    fn test_column_index_zero() {
        Column::from_index(0);
    }

    #[test]
    fn test_skip_line_resumes_by_section() {
        let mut source = Source::new();
        let mut records = vec![];
        let mut parser = FullValidator::new(&mut source, &mut records);
        parser.feed("##fileformat=VCFv4.2\n##x=<y>").unwrap();
        assert_eq!(parser.ctx.cs, MachineState::SkipLine(Section::Meta));
        parser.feed("\n").unwrap();
        assert_eq!(parser.ctx.cs, MachineState::MetaLineStart);
        parser.feed("#CHROM\tPOS\n").unwrap();
        assert_eq!(parser.ctx.cs, MachineState::BodyLineStart);
        assert_eq!(parser.ctx.n_samples, None);
        assert_eq!(parser.errors().len(), 2);
    }
}
