//! Fuzz target for single record-line parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagsplit::data::io_records::fuzz_parse_record_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_record_line(line);
});
