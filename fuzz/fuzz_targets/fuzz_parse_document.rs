#![no_main]
use crude_csv::decode::{parse_document, parse_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let rows = parse_document(s);
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| !r.is_empty()));
        assert!(!parse_line(s).is_empty());
    }
});
