//! Decimal decoding agrees with the integer-tenths model.

use proptest::prelude::*;

use station_agg::synth::format_tenths;
use station_agg::{parse_tenths, parse_tenths_strict};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn formatted_tenths_decode_exactly(tenths in -1_000_000i64..=1_000_000) {
        let mut field = Vec::new();
        format_tenths(tenths, &mut field);
        prop_assert_eq!(parse_tenths(&field), tenths);
        prop_assert_eq!(parse_tenths_strict(&field), Ok(tenths));
    }

    #[test]
    fn lenient_agrees_with_strict_whenever_strict_accepts(field in prop::collection::vec(
        prop_oneof![Just(b'-'), Just(b'.'), Just(b'\r'), b'0'..=b'9', any::<u8>()],
        0..12,
    )) {
        let lenient = parse_tenths(&field);
        if let Ok(strict) = parse_tenths_strict(&field) {
            prop_assert_eq!(strict, lenient);
        }
    }

    #[test]
    fn extra_fraction_digits_truncate(whole in 0i64..1000, frac in 0u32..1000) {
        let field = format!("{whole}.{frac:03}");
        let expected = whole * 10 + (frac / 100) as i64;
        prop_assert_eq!(parse_tenths(field.as_bytes()), expected);
        prop_assert!(parse_tenths_strict(field.as_bytes()).is_err());
    }
}
