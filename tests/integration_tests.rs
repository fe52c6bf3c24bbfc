use csvloader::{
    from_path, from_reader, from_slice, from_str, from_str_with_dialect, row, Dialect, Error,
    ErrorKind, MalformedRowPolicy, RaggedRowPolicy, Reader, Row, Terminator, Value,
};
use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn headerless() -> Dialect {
    Dialect::new().with_header(false)
}

#[test]
fn test_simple_table() {
    let dataset = from_str("id,name,score,active\n1,Alice,9.5,true\n2,Bob,,FALSE\n").unwrap();

    let header = dataset.header().unwrap();
    assert_eq!(header.names(), &["id", "name", "score", "active"]);
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.rows()[0], row![1, "Alice", 9.5, true]);
    assert_eq!(dataset.rows()[1], row![2, "Bob", null, false]);
}

#[test]
fn test_doubled_quote() {
    let dataset = from_str_with_dialect("\"a\"\"b\"\n", headerless()).unwrap();
    assert_eq!(dataset.rows()[0][0], Value::from("a\"b"));
}

#[test]
fn test_quoted_empty_is_not_null() {
    let dataset = from_str_with_dialect("\"\",\n", headerless()).unwrap();
    let row = &dataset.rows()[0];
    assert_eq!(row[0], Value::String(String::new()));
    assert_eq!(row[1], Value::Null);
}

#[test]
fn test_quoted_fields_keep_delimiters_and_newlines() {
    let input = "name,notes\n\"Smith, Jo\",\"line one\r\nline two\"\nX,\"a\nb\"\n";
    let dataset = from_str(input).unwrap();
    assert_eq!(dataset.rows()[0], row!["Smith, Jo", "line one\r\nline two"]);
    assert_eq!(dataset.rows()[1], row!["X", "a\nb"]);
}

#[test]
fn test_numeric_inference() {
    let dataset =
        from_str_with_dialect("007,0,3.14,99999999999999999999,-12,1e5,.5,1.\n", headerless())
            .unwrap();
    let row = &dataset.rows()[0];

    assert_eq!(row[0], Value::from("007"));
    assert_eq!(row[1], Value::Integer(0));
    assert!(row[2].is_float());
    assert_eq!(row[2].to_string(), "3.14");

    match &row[3] {
        Value::Float(f) => {
            assert!(f.is_inexact());
            assert_eq!(f.value(), 1e20);
        }
        other => panic!("Expected inexact float, got {:?}", other),
    }

    assert_eq!(row[4], Value::Integer(-12));
    assert_eq!(row[5].as_f64(), Some(100000.0));
    assert_eq!(row[6].as_f64(), Some(0.5));
    assert_eq!(row[7].as_f64(), Some(1.0));
}

#[test]
fn test_integer_boundaries() {
    let input = format!("{},{},9223372036854775808\n", i64::MAX, i64::MIN);
    let dataset = from_str_with_dialect(&input, headerless()).unwrap();
    let row = &dataset.rows()[0];
    assert_eq!(row[0], Value::Integer(i64::MAX));
    assert_eq!(row[1], Value::Integer(i64::MIN));
    assert!(row[2].is_float());
}

#[test]
fn test_float_overflow_is_flagged() {
    let dataset = from_str_with_dialect("1e400,-1e400,1e-400\n", headerless()).unwrap();
    let row = &dataset.rows()[0];
    let flags: Vec<_> = row
        .iter()
        .map(|v| match v {
            Value::Float(f) => (f.value(), f.is_inexact()),
            other => panic!("Expected float, got {:?}", other),
        })
        .collect();
    assert_eq!(
        flags,
        vec![(f64::INFINITY, true), (f64::NEG_INFINITY, true), (0.0, false)]
    );
}

#[test]
fn test_strings_that_look_almost_numeric() {
    let dataset =
        from_str_with_dialect("inf,NaN,0x1F,1e,+-1,1_000,--,\"42\"\n", headerless()).unwrap();
    for value in dataset.rows()[0].iter() {
        assert!(value.is_string(), "{:?} should be a string", value);
    }
}

#[test]
fn test_ragged_row_error() {
    let err = from_str("a,b,c\n1,2\n").unwrap_err();
    match &err {
        Error::RaggedRow {
            position,
            expected,
            found,
        } => {
            assert_eq!(position.line, 2);
            assert_eq!((*expected, *found), (3, 2));
        }
        other => panic!("Expected ragged row, got {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Ragged row at line 2: expected 3 fields, found 2"
    );
    assert_eq!(err.byte_offset(), Some(6));
}

#[test]
fn test_ragged_row_pad() {
    let dialect = Dialect::new().with_ragged_rows(RaggedRowPolicy::Pad);
    let dataset = from_str_with_dialect("a,b,c\n1,2\n", dialect).unwrap();
    assert_eq!(dataset.rows()[0], row![1, 2, null]);
}

#[test]
fn test_ragged_row_truncate() {
    let dialect = Dialect::new().with_ragged_rows(RaggedRowPolicy::Truncate);
    let dataset = from_str_with_dialect("a,b\n1,2,3,4\n5,6\n", dialect).unwrap();
    assert_eq!(dataset.rows(), &[row![1, 2], row![5, 6]]);
}

#[test]
fn test_invalid_quoting_position() {
    let err = from_str("a,b\n1,\"2\"x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQuoting);
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.column(), Some(2));
    assert_eq!(err.byte_offset(), Some(9));
    assert!(err.to_string().contains("'x'"));
}

#[test]
fn test_line_numbers_count_quoted_newlines() {
    let err = from_str("a,b\n\"x\ny\",1\n2,\"z\"q\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidQuoting);
    assert_eq!(err.line(), Some(4));
}

#[test]
fn test_unterminated_quote() {
    let err = from_str("a,b\n1,\"never closed\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnterminatedQuote);
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.column(), Some(2));
}

#[test]
fn test_encoding_error() {
    let err = from_slice(b"a,b\n1,caf\xE9\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(err.line(), Some(2));
    assert_eq!(err.column(), Some(2));
    assert_eq!(err.byte_offset(), Some(9));
}

#[test]
fn test_encoding_error_offset_after_dropped_bytes() {
    let err = from_slice(b"a,b\n1,\"x\"\"\xFF\"\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(err.byte_offset(), Some(10));

    let dialect = Dialect::new().with_header(false).with_trim(true);
    let err = csvloader::from_slice_with_dialect(b"1,  \xFF\n", dialect).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert_eq!(err.byte_offset(), Some(4));
}

#[test]
fn test_bom_and_crlf() {
    let dataset = from_slice(b"\xEF\xBB\xBFid,v\r\n1,x\r\n2,y\r\n").unwrap();
    assert_eq!(dataset.header().unwrap().get(0), Some("id"));
    assert_eq!(dataset.rows(), &[row![1, "x"], row![2, "y"]]);
}

#[test]
fn test_mixed_line_endings_and_blank_lines() {
    let dataset = from_str("a\r1\n\n2\r\n\r\n3").unwrap();
    assert_eq!(dataset.rows(), &[row![1], row![null], row![2], row![null], row![3]]);
}

#[test]
fn test_blank_line_is_a_null_row() {
    let dataset = from_str("a\n1\n\n3\n").unwrap();
    assert_eq!(dataset.rows(), &[row![1], row![null], row![3]]);

    let dataset = from_str("a\n1\n\n").unwrap();
    assert_eq!(dataset.rows(), &[row![1], row![null]]);
}

#[test]
fn test_blank_line_in_wide_table_is_ragged() {
    let err = from_str("a,b\n1,2\n\n3,4\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RaggedRow);
    assert_eq!(err.line(), Some(3));

    let dialect = Dialect::new().with_ragged_rows(RaggedRowPolicy::Pad);
    let dataset = from_str_with_dialect("a,b\n1,2\n\n3,4\n", dialect).unwrap();
    assert_eq!(dataset.rows(), &[row![1, 2], row![null, null], row![3, 4]]);
}

#[test]
fn test_empty_inputs() {
    let dataset = from_str("").unwrap();
    assert!(dataset.header().is_none());
    assert!(dataset.is_empty());

    let dataset = from_slice(b"\xEF\xBB\xBF").unwrap();
    assert!(dataset.header().is_none());

    let dataset = from_str("only,header\n").unwrap();
    assert_eq!(dataset.header().unwrap().len(), 2);
    assert!(dataset.is_empty());
}

#[test]
fn test_custom_dialect() {
    let dialect = Dialect::new()
        .with_delimiter(';')
        .with_quote('\'')
        .with_escape(Some('\\'))
        .with_boolean_literals([("yes", "no"), ("on", "off")]);
    let dataset = from_str_with_dialect("k;v\n'it\\'s';YES\n'a;b';off\n", dialect).unwrap();
    assert_eq!(dataset.rows(), &[row!["it's", true], row!["a;b", false]]);
}

#[test]
fn test_custom_terminator() {
    let dialect = headerless().with_terminator(Terminator::Custom('|'));
    let dataset = from_str_with_dialect("1,a\nb|2,c|", dialect).unwrap();
    assert_eq!(dataset.rows(), &[row![1, "a\nb"], row![2, "c"]]);
}

#[test]
fn test_trim() {
    let dialect = headerless().with_trim(true);
    let dataset = from_str_with_dialect("  1 ,\t\"x y\"  , true \n", dialect).unwrap();
    assert_eq!(dataset.rows()[0], row![1, "x y", true]);
}

#[test]
fn test_type_inference_disabled() {
    let dialect = headerless().with_type_inference(false);
    let dataset = from_str_with_dialect("1,true,,2.5\n", dialect).unwrap();
    assert_eq!(dataset.rows()[0], row!["1", "true", null, "2.5"]);
}

#[test]
fn test_skip_malformed_rows() {
    let dialect = Dialect::new().with_malformed_rows(MalformedRowPolicy::Skip);
    let input: &[u8] = b"a,b\n1,ok\n2,\"bad\"x\n3,\xFF\n4,fine\n";
    let dataset = csvloader::from_slice_with_dialect(input, dialect).unwrap();
    assert_eq!(dataset.rows(), &[row![1, "ok"], row![4, "fine"]]);
}

#[test]
fn test_rows_before_error_are_kept() {
    let mut reader = Reader::new(&b"a\n1\n2\n\"3\n"[..], Dialect::default()).unwrap();
    let mut seen = Vec::new();
    let mut failure = None;
    for row in reader.rows() {
        match row {
            Ok(row) => seen.push(row),
            Err(e) => failure = Some(e),
        }
    }
    assert_eq!(seen, vec![row![1], row![2]]);
    assert_eq!(failure.unwrap().kind(), ErrorKind::UnterminatedQuote);
}

// Hands out `data` in small pieces, then fails.
struct FailingReader {
    data: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = buf.len().min(4);
        match self.data.read(&mut buf[..limit])? {
            0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_io_error_carries_offset() {
    let source = FailingReader {
        data: Cursor::new(b"a,b\n1,2\n3,4".to_vec()),
    };
    let mut reader = Reader::new(source, Dialect::default()).unwrap();
    assert_eq!(reader.read_row().unwrap(), Some(row![1, 2]));

    let err = reader.read_row().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.byte_offset(), Some(11));
    match err {
        Error::Io { source_kind, .. } => assert_eq!(source_kind, io::ErrorKind::BrokenPipe),
        other => panic!("Expected IO error, got {:?}", other),
    }
    assert_eq!(reader.read_row().unwrap(), None);
}

// Sets its flag when dropped.
struct DropTracker {
    inner: Cursor<Vec<u8>>,
    dropped: Arc<AtomicBool>,
}

impl Read for DropTracker {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for DropTracker {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

fn big_input(rows: usize) -> Vec<u8> {
    let mut out = b"n,square\n".to_vec();
    for i in 0..rows {
        out.extend_from_slice(format!("{},{}\n", i, i * i).as_bytes());
    }
    out
}

#[test]
fn test_cancellation_releases_reader() {
    let dropped = Arc::new(AtomicBool::new(false));
    let tracker = DropTracker {
        inner: Cursor::new(big_input(100_000)),
        dropped: Arc::clone(&dropped),
    };
    let dialect = Dialect::new().with_buffer_capacity(1024);

    let mut rows = Reader::new(tracker, dialect).unwrap().into_rows();
    let first: Vec<Row> = rows.by_ref().take(3).map(|r| r.unwrap()).collect();
    assert_eq!(first[2], row![2, 4]);
    assert!(!dropped.load(Ordering::SeqCst));

    drop(rows);
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn test_into_inner_hands_back_the_handle() {
    let dropped = Arc::new(AtomicBool::new(false));
    let tracker = DropTracker {
        inner: Cursor::new(big_input(10_000)),
        dropped: Arc::clone(&dropped),
    };
    let mut reader = Reader::new(tracker, Dialect::new().with_buffer_capacity(256)).unwrap();
    reader.read_row().unwrap();

    let tracker = reader.into_inner();
    assert!(!dropped.load(Ordering::SeqCst));
    // The handle is still usable and has not been read to the end.
    assert!(tracker.inner.position() < tracker.inner.get_ref().len() as u64);
    drop(tracker);
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn test_small_buffers_match_large_buffers() {
    let input = "a,b,c\n\"x,\"\"y\"\"\r\nz\",2,\r\n3.5,\"\",true\n";
    let expected = from_str(input).unwrap();
    for capacity in [4, 5, 7, 16] {
        let dialect = Dialect::new().with_buffer_capacity(capacity);
        let dataset = csvloader::from_reader_with_dialect(input.as_bytes(), dialect).unwrap();
        assert_eq!(dataset, expected, "buffer capacity {}", capacity);
    }
}

#[test]
fn test_parses_on_separate_threads() {
    fn assert_send<T: Send>() {}
    assert_send::<Reader<Cursor<Vec<u8>>>>();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            thread::spawn(move || {
                let input = big_input(1_000 + t);
                from_reader(Cursor::new(input)).unwrap()
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        let dataset = handle.join().unwrap();
        assert_eq!(dataset.len(), 1_000 + t);
        let last = (1_000 + t - 1) as i64;
        assert_eq!(dataset.rows().last().unwrap(), &row![last, last * last]);
    }
}

#[test]
fn test_from_path() {
    let path = std::env::temp_dir().join(format!("csvloader-test-{}.csv", std::process::id()));
    std::fs::write(&path, "city,pop\nOslo,709037\n").unwrap();

    let dataset = from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(dataset.rows()[0], row!["Oslo", 709037]);
    let pops: Vec<_> = dataset.column("pop").unwrap().collect();
    assert_eq!(pops, vec![&Value::Integer(709037)]);
}

#[test]
fn test_json_output_contract() {
    let dataset = from_str("a,b\n1,x\n,2.5\ntrue,\"\"\n").unwrap();
    let json = serde_json::to_string(&dataset).unwrap();
    assert_eq!(
        json,
        r#"{"header":["a","b"],"rows":[[1,"x"],[null,2.5],[true,""]]}"#
    );
}

#[test]
fn test_dialect_from_json() {
    let dialect: Dialect = serde_json::from_str(
        r#"{"delimiter": ";", "ragged_rows": "pad", "malformed_rows": "skip", "header": false}"#,
    )
    .unwrap();
    let dataset = from_str_with_dialect("1;2\n3\n", dialect).unwrap();
    assert_eq!(dataset.rows(), &[row![1, 2], row![3, null]]);
}

#[test]
fn test_records_by_name() {
    let dataset = from_str("id,name,id\n1,Ann,9\n").unwrap();
    let record = dataset.records().unwrap().next().unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(record["id"], &Value::Integer(1));
    assert_eq!(record["name"].as_str(), Some("Ann"));
}
