#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = tributa::core::normalize_tax_id(s);
        if let Ok(valid) = tributa::core::validate_tax_id(s) {
            assert_eq!(valid, normalized);
            assert!(tributa::core::looks_like_tax_id(&valid));
        }
    }
});
