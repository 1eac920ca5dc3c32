//! Numbered-name parsing and formatting

use onion_layers::name::{sanitize, NumberedName};
use proptest::prelude::*;

fn stem() -> impl Strategy<Value = String> {
    "[a-z_ -]{0,8}"
}

/// Stem plus digit run parses and formats back to the same text
#[test]
fn test_numbered_name_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(stem(), "[0-9]{1,6}"), |(stem, digits)| {
            let raw = format!("{}{}", stem, digits);
            let parsed = NumberedName::parse(&raw);

            prop_assert_eq!(&parsed.stem, &stem);
            prop_assert_eq!(parsed.width, Some(digits.len()));
            prop_assert_eq!(parsed.format(), raw);

            Ok(())
        })
        .unwrap();
}

/// The mask suffix is recognised and never re-emitted
#[test]
fn test_mask_suffix_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(stem(), "[0-9]{1,4}"), |(stem, digits)| {
            let plain = format!("{}{}", stem, digits);
            let masked = NumberedName::parse(&format!("{} mask", plain));

            prop_assert!(masked.is_mask);
            prop_assert_eq!(masked.format(), plain.clone());
            prop_assert_eq!(sanitize(&format!("{} mask", plain)), stem);

            Ok(())
        })
        .unwrap();
}

proptest! {
    /// Renumbering keeps the stem and uses the width as a minimum
    #[test]
    fn test_width_is_a_minimum(stem in stem(), width in 1usize..5, number in 0u64..100_000) {
        let base = NumberedName::parse(&format!("{}{:0w$}", stem, 1, w = width));
        let renamed = base.with_number(number).format();
        let reparsed = NumberedName::parse(&renamed);

        prop_assert_eq!(reparsed.stem, stem);
        prop_assert_eq!(reparsed.number, Some(number));
        prop_assert!(reparsed.width.unwrap_or(0) >= width);
        prop_assert_eq!(
            reparsed.width,
            Some(width.max(number.to_string().len()))
        );
    }
}
