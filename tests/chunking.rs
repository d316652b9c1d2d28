use proptest::prelude::*;
use vcfscan::error_policy::ErrorPolicy;
use vcfscan::lexing::MachineState;
use vcfscan::token_policy::TokenPolicy;
use vcfscan::{FullValidator, ParseError, Parser, QuickValidator, Reader, Record, Section, Source};

const VALID: &str = "\
##fileformat=VCFv4.2
##fileDate=20090805
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total \\\"read\\\" depth\">
##FILTER=<ID=q10,Description=\"Quality below 10\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2
20\t14370\trs6054257\tG\tA\t29\tPASS\tDP=14;H2\tGT:GQ\t0|0:48\t1|0:48
20\t17330\t.\tT\tA\t3\tq10\tDP=11\tGT:GQ\t0|0:49\t0|1:3
20\t1110696\trs6040355\tA\tG,T\t67\tPASS\tAA=T;DB\tGT\t1|2\t2|1
";

const MALFORMED: &[u8] = b"\
##fileformat=VCFv4.2
##broken=<ID=x,>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1
1\tabc\t.\tA\tT\t.\tPASS\t.\tGT\t0/1
1\t200\t.\tA\tT\t.\tPASS\t.\tGT
1\t300\t.\tA\tT\t.\tPASS\tDP=\xFF\tGT\t0/1
";

type Outcome = (Source, Vec<Record>, Vec<ParseError>, bool);

/// Feeds `input` in pieces of the given sizes; whatever remains goes in one
/// last chunk.
fn feed_split<T, E>(parser: &mut Parser<'_, T, E>, input: &[u8], sizes: &[usize])
where
    T: TokenPolicy,
    E: ErrorPolicy,
{
    let mut rest = input;
    for &size in sizes {
        let (chunk, tail) = rest.split_at(size.min(rest.len()));
        parser.feed(chunk).unwrap();
        rest = tail;
    }
    parser.feed(rest).unwrap();
    parser.finish().unwrap();
}

fn full(input: &[u8], sizes: &[usize]) -> Outcome {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = FullValidator::new(&mut source, &mut records);
    feed_split(&mut parser, input, sizes);
    let errors = parser.errors().to_vec();
    let valid = parser.is_valid();
    drop(parser);
    (source, records, errors, valid)
}

fn quick(input: &[u8], sizes: &[usize]) -> Outcome {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = QuickValidator::new(&mut source, &mut records);
    feed_split(&mut parser, input, sizes);
    assert_eq!(parser.token_policy().current_token(), None);
    let errors = parser.errors().to_vec();
    let valid = parser.is_valid();
    drop(parser);
    (source, records, errors, valid)
}

proptest! {
    #[test]
    fn test_chunking_does_not_change_valid_output(
        sizes in prop::collection::vec(0usize..48, 0..40)
    ) {
        let expected = full(VALID.as_bytes(), &[]);
        prop_assert!(expected.3);
        prop_assert_eq!(full(VALID.as_bytes(), &sizes), expected);
    }

    #[test]
    fn test_chunking_does_not_change_errors(
        sizes in prop::collection::vec(0usize..48, 0..40)
    ) {
        let expected = full(MALFORMED, &[]);
        prop_assert!(!expected.3);
        prop_assert_eq!(full(MALFORMED, &sizes), expected);
    }

    #[test]
    fn test_discard_materializes_nothing(
        sizes in prop::collection::vec(1usize..16, 0..80)
    ) {
        for input in [VALID.as_bytes(), MALFORMED] {
            let (source, records, errors, valid) = quick(input, &sizes);
            let (_, _, full_errors, full_valid) = full(input, &[]);
            prop_assert_eq!(source, Source::new());
            prop_assert!(records.is_empty());
            prop_assert_eq!(valid, full_valid);
            // Encoding and shape errors need the tokens.
            let syntax_errors = full_errors
                .into_iter()
                .filter(|e| matches!(e, ParseError::Syntax { .. }))
                .collect::<Vec<_>>();
            prop_assert_eq!(errors, syntax_errors);
        }
    }
}

#[test]
fn test_byte_at_a_time() {
    let sizes = vec![1; VALID.len()];
    let (source, records, errors, valid) = full(VALID.as_bytes(), &sizes);
    assert!(valid);
    assert!(errors.is_empty());
    assert_eq!(source.version(), "VCFv4.2");
    assert_eq!(source.samples(), &["S1", "S2"]);
    assert_eq!(
        source.meta()[1].field("Description"),
        Some("\"Total \\\"read\\\" depth\"")
    );
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].alternates, vec!["G", "T"]);
    assert_eq!(records[2].info.get("DB"), Some(&None));
}

#[test]
fn test_malformed_errors() {
    let (_, records, errors, valid) = full(MALFORMED, &[]);
    assert!(!valid);
    let summary = errors
        .iter()
        .map(|e| (e.section(), e.position().line, e.position().column))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            (Section::Meta, 2, 1),
            (Section::Body, 4, 2),
            (Section::Body, 5, 9),
            (Section::Body, 6, 10),
        ]
    );
    assert!(matches!(errors[3], ParseError::Encoding { .. }));
    assert!(records.is_empty());
}

#[test]
fn test_quality_defaults_to_zero() {
    let input = VALID.replace("\t29\t", "\t.\t");
    let (_, records, errors, valid) = full(input.as_bytes(), &[]);
    assert!(valid);
    assert!(errors.is_empty());
    assert_eq!(records[0].quality, 0.0);
    assert_eq!(records[1].quality, 3.0);
}

#[test]
fn test_non_finite_quality_defaults_to_zero() {
    let input = VALID.replace("\t29\t", "\tnan\t").replace("\t3\t", "\tinf\t");
    let (_, records, errors, valid) = full(input.as_bytes(), &[]);
    assert!(valid);
    assert!(errors.is_empty());
    assert_eq!(records[0].quality, 0.0);
    assert_eq!(records[1].quality, 0.0);
    assert_eq!(records[2].quality, 67.0);
}

#[test]
fn test_empty_chunk_changes_nothing() {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = QuickValidator::new(&mut source, &mut records);
    parser.feed("").unwrap();
    assert!(parser.is_valid());
    assert!(parser.errors().is_empty());
    assert_eq!(parser.context().state(), MachineState::START);
    assert_eq!(parser.context().n_lines(), 0);

    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = Reader::new(&mut source, &mut records);
    parser.feed("").unwrap();
    parser.feed(VALID).unwrap();
    parser.feed("").unwrap();
    assert_eq!(parser.context().state(), MachineState::BodyLineStart);
    parser.finish().unwrap();
    assert!(parser.is_valid());
    assert_eq!(parser.context().n_batches(), 3);
    drop(parser);
    assert_eq!(records.len(), 3);
}

#[test]
fn test_invalid_position_report_and_abort() {
    let input = VALID.replace("17330", "abc");

    let (_, records, errors, valid) = full(input.as_bytes(), &[]);
    assert!(!valid);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Error in body section: unexpected `a' in POS column"
    );
    assert_eq!(records.len(), 2);

    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = Reader::new(&mut source, &mut records);
    let error = parser.feed(&input).unwrap_err();
    assert_eq!(error.section(), Section::Body);
    assert_eq!(error.position().line, 7);
    assert!(!parser.is_valid());
    assert_eq!(parser.context().state(), MachineState::Aborted);
    parser.feed("more input").unwrap();
    parser.finish().unwrap();
    drop(parser);
    assert_eq!(records.len(), 1);
}

#[test]
fn test_position_overflow_is_fatal() {
    let input = VALID.replace("17330", "99999999999999999999999");
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = FullValidator::new(&mut source, &mut records);
    let error = parser.feed(&input).unwrap_err();
    assert!(error.is_fatal());
    assert_eq!(error.position().line, 7);
    assert!(parser.errors().is_empty());
    assert!(!parser.is_valid());
    parser.finish().unwrap();
    assert_eq!(parser.context().state(), MachineState::Aborted);

    assert!(vcfscan::validate(input.as_bytes()).is_err());
}

#[test]
fn test_finish_is_idempotent() {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = FullValidator::new(&mut source, &mut records);
    parser.feed(VALID).unwrap();
    parser.finish().unwrap();
    parser.finish().unwrap();
    assert!(parser.is_valid());
    assert_eq!(parser.context().state(), MachineState::Finished);
    assert_eq!(parser.context().n_batches(), 1);
    drop(parser);
    assert_eq!(records.len(), 3);
}

#[test]
fn test_input_after_finish() {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = FullValidator::new(&mut source, &mut records);
    parser.feed(VALID).unwrap();
    parser.finish().unwrap();
    parser.feed("20\t1\t.\tA\tT\t.\t.\t.\tGT\t0\t0\n").unwrap();
    assert!(!parser.is_valid());
    assert_eq!(
        parser.errors()[0].to_string(),
        "Error in body section: input after end of stream"
    );
    drop(parser);
    assert_eq!(records.len(), 3);
}

#[test]
fn test_empty_input() {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = QuickValidator::new(&mut source, &mut records);
    parser.finish().unwrap();
    assert!(!parser.is_valid());
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(parser.errors()[0].section(), Section::Fileformat);

    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = Reader::new(&mut source, &mut records);
    let error = parser.finish().unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error in file format section: unexpected end of input"
    );
}
