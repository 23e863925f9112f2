//! Hanja (CJK ideograph) classification.

use std::ops::RangeInclusive;

/// Code point ranges treated as Hanja: the CJK Unified Ideographs block and
/// extensions A through E.
pub const HANJA_RANGES: [RangeInclusive<u32>; 6] = [
    0x4E00..=0x9FFF,
    0x3400..=0x4DBF,
    0x20000..=0x2A6DF,
    0x2A700..=0x2B73F,
    0x2B740..=0x2B81F,
    0x2B820..=0x2CEAF,
];

/// Returns whether `c` is a Hanja character.
pub fn is_hanja(c: char) -> bool {
    let code = u32::from(c);
    HANJA_RANGES.iter().any(|range| range.contains(&code))
}

/// Keeps only the Hanja characters of `text`, in order.
pub fn hanja_chars(text: &str) -> Vec<char> {
    text.chars().filter(|c| is_hanja(*c)).collect()
}
