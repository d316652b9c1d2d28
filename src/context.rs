use crate::lexing::MachineState;
use crate::parser_diagnostics::Position;
use crate::source::{MetaEntry, Record, Source};

/// Progress of one parse session, handed to every callback.
///
/// The output sinks are borrowed from the caller for the whole session and
/// are only ever appended to.
#[derive(Debug)]
pub struct ParsingContext<'a> {
    pub(crate) n_lines: usize,
    pub(crate) n_columns: usize,
    pub(crate) n_batches: usize,
    pub(crate) cs: MachineState,
    pub(crate) is_valid: bool,
    pub(crate) n_samples: Option<usize>,
    source: &'a mut Source,
    records: &'a mut Vec<Record>,
}

impl<'a> ParsingContext<'a> {
    pub fn new(source: &'a mut Source, records: &'a mut Vec<Record>) -> Self {
        ParsingContext {
            n_lines: 0,
            n_columns: 1,
            n_batches: 0,
            cs: MachineState::START,
            is_valid: true,
            n_samples: None,
            source,
            records,
        }
    }

    /// Completed lines so far.
    pub fn n_lines(&self) -> usize {
        self.n_lines
    }

    /// 1-based index of the column being scanned.
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    pub fn n_batches(&self) -> usize {
        self.n_batches
    }

    pub fn state(&self) -> MachineState {
        self.cs
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub(crate) fn invalidate(&mut self) {
        self.is_valid = false;
    }

    /// Number of samples declared by the header, once it has been read.
    pub fn n_samples(&self) -> Option<usize> {
        self.n_samples
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.n_lines + 1,
            column: self.n_columns,
        }
    }

    pub fn source(&self) -> &Source {
        self.source
    }

    pub fn records(&self) -> &[Record] {
        self.records
    }

    pub fn set_version(&mut self, version: String) {
        self.source.set_version(version);
    }

    pub fn add_meta(&mut self, entry: MetaEntry) {
        self.source.add_meta(entry);
    }

    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn samples(&self) -> &[String] {
        self.source.samples()
    }

    pub fn set_samples(&mut self, samples: Vec<String>) {
        self.source.set_samples(samples);
    }
}
