use super::*;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[test]
fn test_parse_line_read_and_write() {
    assert_eq!(
        parse_line(1, "42,R").unwrap(),
        Some(TraceRecord::read(42))
    );
    assert_eq!(
        parse_line(2, "7,w").unwrap(),
        Some(TraceRecord::write(7))
    );
    assert_eq!(
        parse_line(3, "  9 , r  ").unwrap(),
        Some(TraceRecord::read(9))
    );
}

#[test]
fn test_parse_line_blank() {
    assert_eq!(parse_line(1, "").unwrap(), None);
    assert_eq!(parse_line(1, "   ").unwrap(), None);
}

#[test]
fn test_parse_line_extra_fields_ignored() {
    assert_eq!(
        parse_line(1, "100,W,4096").unwrap(),
        Some(TraceRecord::write(100))
    );
}

#[test]
fn test_parse_line_invalid_address() {
    let err = parse_line(5, "abc,R").unwrap_err();
    assert!(matches!(err, TraceError::InvalidAddress { line: 5, .. }));

    let err = parse_line(6, "-3,R").unwrap_err();
    assert!(matches!(err, TraceError::InvalidAddress { line: 6, .. }));
}

#[test]
fn test_parse_line_invalid_op_and_missing_field() {
    let err = parse_line(2, "1,X").unwrap_err();
    assert!(matches!(err, TraceError::InvalidOp { line: 2, .. }));

    let err = parse_line(3, "1").unwrap_err();
    assert!(matches!(err, TraceError::MissingField { line: 3 }));
    assert_eq!(err.to_string(), "Expected 'address,op' on line 3");
}

#[test]
fn test_reader_skips_blank_lines_and_counts() {
    let input = "1,R\n\n2,W\n3,r\n";
    let mut reader = TraceReader::new(Cursor::new(input));
    let records: Vec<_> = reader.by_ref().collect::<TraceResult<_>>().unwrap();
    assert_eq!(
        records,
        vec![
            TraceRecord::read(1),
            TraceRecord::write(2),
            TraceRecord::read(3)
        ]
    );
    assert_eq!(reader.line_no(), 4);
}

#[test]
fn test_reader_reports_bad_line_number() {
    let input = "1,R\n2,R\nnope,R\n4,R\n";
    let result: TraceResult<Vec<_>> = TraceReader::new(Cursor::new(input)).collect();
    match result {
        Err(TraceError::InvalidAddress { line, value }) => {
            assert_eq!(line, 3);
            assert_eq!(value, "nope");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_load_trace_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "10,R").unwrap();
    writeln!(file, "11,W").unwrap();
    writeln!(file, "10,R").unwrap();
    file.flush().unwrap();

    let records = load_trace(file.path()).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1], TraceRecord::write(11));
}

#[test]
fn test_load_trace_missing_file() {
    let err = load_trace("/nonexistent/trace.csv").unwrap_err();
    assert!(matches!(err, TraceError::IoError(_)));
}
