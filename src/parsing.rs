//! One-shot entry points over a complete in-memory file.

use crate::error_policy::ReportErrors;
use crate::parser::{FullValidator, Parser, QuickValidator, Reader};
use crate::parser_diagnostics::ParseError;
use crate::source::{Record, Source};
use crate::token_policy::TokenPolicy;

/// Parses the whole input, collecting every defect.
///
/// The only error returned through `Err` is a fatal one (an unrepresentable
/// POS); everything else ends up in the error list.
pub fn validate(input: &[u8]) -> Result<(Source, Vec<Record>, Vec<ParseError>), ParseError> {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = FullValidator::new(&mut source, &mut records);
    parser.feed(input)?;
    parser.finish()?;
    let (_, errors) = parser.into_policies();
    Ok((source, records, errors.into_errors()))
}

/// Syntax check without materializing anything.
pub fn check(input: &[u8]) -> Vec<ParseError> {
    let mut source = Source::new();
    let mut records = Vec::new();
    let parser = QuickValidator::new(&mut source, &mut records);
    report_all(parser, input)
}

/// Runs a reporting parser over the whole input. A fatal error bypasses the
/// error policy, so it is appended after the recorded ones.
fn report_all<T: TokenPolicy>(
    mut parser: Parser<'_, T, ReportErrors>,
    input: &[u8],
) -> Vec<ParseError> {
    let result = parser.feed(input).and_then(|()| parser.finish());
    let (_, errors) = parser.into_policies();
    let mut errors = errors.into_errors();
    if let Err(error) = result {
        errors.push(error);
    }
    errors
}

/// Reads input that is expected to be well formed. Stops at the first
/// defect.
pub fn read(input: &[u8]) -> Result<(Source, Vec<Record>), ParseError> {
    let mut source = Source::new();
    let mut records = Vec::new();
    let mut parser = Reader::new(&mut source, &mut records);
    parser.feed(input)?;
    parser.finish()?;
    Ok((source, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_diagnostics::Section;
    use crate::source::MetaEntry;

    const SAMPLE: &str = "\
##fileformat=VCFv4.2
##fileDate=20090805
##INFO=<ID=DP,Number=1,Type=Integer>
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2
20\t14370\trs6054257\tG\tA\t29\tPASS\tDP=14;H2\tGT:GQ\t0|0:48\t1|0:48
20\t17330\t.\tT\tA\t3\tq10\tDP=11\tGT:GQ\t0|0:49\t0|1:3
";

    #[test]
    fn test_read() {
        let (source, records) = read(SAMPLE.as_bytes()).unwrap();
        assert_eq!(source.version(), "VCFv4.2");
        assert_eq!(source.samples(), &["S1", "S2"]);
        assert_eq!(
            source.meta()[1],
            MetaEntry::Structured {
                id: String::from("INFO"),
                fields: vec![
                    (String::from("ID"), String::from("DP")),
                    (String::from("Number"), String::from("1")),
                    (String::from("Type"), String::from("Integer")),
                ],
            }
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quality, 29.0);
        assert_eq!(records[1].ids, vec!["."]);
        assert_eq!(records[1].samples, vec!["0|0:49", "0|1:3"]);
    }

    #[test]
    fn test_validate_and_check_agree() {
        let input = SAMPLE.replace("17330", "abc");
        let (_, records, errors) = validate(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].section(), Section::Body);
        assert_eq!(check(input.as_bytes()), errors);
    }

    #[test]
    fn test_report_all_keeps_fatal_error() {
        let input = SAMPLE.replace("17330", "99999999999999999999999");
        let mut source = Source::new();
        let mut records = Vec::new();
        let parser = FullValidator::new(&mut source, &mut records);
        let errors = report_all(parser, input.as_bytes());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_fatal());
        assert_eq!(errors[0].position().line, 6);
    }

    #[test]
    fn test_read_stops_at_first_error() {
        let input = SAMPLE.replace("17330", "abc");
        let error = read(input.as_bytes()).unwrap_err();
        assert_eq!(error.section(), Section::Body);
        assert_eq!(error.position().line, 6);
    }
}
