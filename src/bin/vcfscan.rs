use clap::{ArgEnum, Parser as ClapParser};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use vcfscan::error_policy::ErrorPolicy;
use vcfscan::token_policy::TokenPolicy;
use vcfscan::{FullValidator, ParseError, Parser, QuickValidator, Reader, Record, Source};

#[derive(Debug, Error)]
enum CommandError {
    #[error("I/O error")]
    Io(
        #[from]
        #[source]
        std::io::Error,
    ),
    #[error("JSON output error")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    #[error("Detected one or more errors")]
    HasError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum Mode {
    /// Syntax only
    Quick,
    /// Syntax and structure, reporting every defect
    Full,
    /// Trusted input, stop at the first defect
    Read,
}

#[derive(Debug, ClapParser)]
#[clap(about = "Validate and read VCF files")]
struct Cli {
    #[clap(short, long, arg_enum, default_value = "full")]
    mode: Mode,
    /// Bytes read from the file per parser call
    #[clap(long, default_value = "65536")]
    chunk_size: usize,
    /// Print the parsed file as JSON
    #[clap(long)]
    json: bool,
    #[clap(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    source: &'a Source,
    records: &'a [Record],
}

fn main() -> Result<(), CommandError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let chunk_size = cli.chunk_size.max(1);
    let mut has_error = false;
    for file in &cli.files {
        let mut source = Source::new();
        let mut records = Vec::new();
        let valid = match cli.mode {
            Mode::Quick => {
                let mut parser = QuickValidator::new(&mut source, &mut records);
                run(file, &mut parser, chunk_size)?
            }
            Mode::Full => {
                let mut parser = FullValidator::new(&mut source, &mut records);
                run(file, &mut parser, chunk_size)?
            }
            Mode::Read => {
                let mut parser = Reader::new(&mut source, &mut records);
                run(file, &mut parser, chunk_size)?
            }
        };
        info!(file = %file.display(), valid, records = records.len(), "done");
        has_error |= !valid;
        if cli.json && cli.mode != Mode::Quick {
            let output = Output {
                source: &source,
                records: &records,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    if has_error {
        return Err(CommandError::HasError);
    }
    Ok(())
}

/// Streams `path` through `parser` and prints its diagnostics. Returns
/// whether the file is valid.
fn run<T, E>(
    path: &Path,
    parser: &mut Parser<'_, T, E>,
    chunk_size: usize,
) -> Result<bool, CommandError>
where
    T: TokenPolicy,
    E: ErrorPolicy,
{
    let mut file = File::open(path)?;
    let mut buf = vec![0; chunk_size];
    let result = loop {
        let len = file.read(&mut buf)?;
        if len == 0 {
            break parser.finish();
        }
        if let Err(e) = parser.feed(&buf[..len]) {
            break Err(e);
        }
    };
    for error in parser.errors() {
        report(path, error);
    }
    if let Err(error) = result {
        report(path, &error);
    }
    Ok(parser.is_valid())
}

fn report(path: &Path, error: &ParseError) {
    let position = error.position();
    eprintln!(
        "{}:{}:{}: {}",
        path.display(),
        position.line,
        position.column,
        error
    );
}
