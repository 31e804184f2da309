//! Natural-order comparison for pin and function identifiers.
//!
//! Identifiers are split into alternating runs of non-digits and digits.
//! Text runs compare lexicographically, digit runs compare by magnitude,
//! so `PTA2` sorts before `PTA10` and `FTM0_CH2` before `FTM0_CH10`.

use std::cmp::Ordering;

/// Compare two identifiers in natural order.
///
/// This is a strict total order: identifiers that only differ in leading
/// zeros of a digit run fall back to plain string comparison.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    segment_cmp(a, b).then_with(|| a.cmp(b))
}

/// Sort a slice of identifiers in natural order.
pub fn sort_natural<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

fn segment_cmp(a: &str, b: &str) -> Ordering {
    if a.is_empty() && b.is_empty() {
        return Ordering::Equal;
    }
    let (text_a, digits_a, rest_a) = split_segment(a);
    let (text_b, digits_b, rest_b) = split_segment(b);

    text_a
        .cmp(text_b)
        .then_with(|| digits_cmp(digits_a, digits_b))
        .then_with(|| segment_cmp(rest_a, rest_b))
}

/// Split `s` into (leading non-digits, following digits, remainder).
fn split_segment(s: &str) -> (&str, &str, &str) {
    let text_end = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
    let (text, tail) = s.split_at(text_end);
    let digits_end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    let (digits, rest) = tail.split_at(digits_end);
    (text, digits, rest)
}

/// Compare two digit runs by numeric magnitude.
///
/// An empty run counts as -1 and so sorts before any number. Magnitudes are
/// compared without parsing, so arbitrarily long runs cannot overflow.
fn digits_cmp(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
    }
}
