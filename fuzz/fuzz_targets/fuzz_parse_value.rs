#![no_main]

use libfuzzer_sys::fuzz_target;
use station_agg::{parse_tenths, parse_tenths_strict};

fuzz_target!(|data: &[u8]| {
    let lenient = parse_tenths(data);
    if let Ok(strict) = parse_tenths_strict(data) {
        // Anything strict accepts, lenient decodes to the same value.
        assert_eq!(strict, lenient, "input {:?}", String::from_utf8_lossy(data));
    }
});
