#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Unparseable dates are None, never a panic.
        let _ = tributa::core::parse_record_date(s);
    }
});
