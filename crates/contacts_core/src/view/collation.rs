//! Locale-aware name ordering.
//!
//! Names compare first on a folded key: canonical decomposition with combining
//! marks stripped, letters without a decomposition (`Ł`, `Ø`, `Đ`, `Æ`, ...)
//! mapped to their base letters, then lowercased. So `Ágata` sorts next to
//! `agata` and `Łukasz` between `Lena` and `Marek`. Ties fall back to the
//! lowercase form and then to the raw string, which keeps the order total.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Returns the primary collation key for `value`.
pub fn fold_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for ch in value.nfd().filter(|ch| !is_combining_mark(*ch)) {
        match base_letters(ch) {
            Some(base) => key.push_str(base),
            None => key.extend(ch.to_lowercase()),
        }
    }
    key
}

/// Latin letters that carry a stroke or ligature instead of a combining mark.
fn base_letters(ch: char) -> Option<&'static str> {
    let base = match ch {
        'Ł' | 'ł' => "l",
        'Ø' | 'ø' => "o",
        'Đ' | 'đ' | 'Ð' | 'ð' => "d",
        'Ħ' | 'ħ' => "h",
        'Ŧ' | 'ŧ' => "t",
        'Ŀ' | 'ŀ' => "l",
        'ı' => "i",
        'ſ' => "s",
        'Æ' | 'æ' => "ae",
        'Œ' | 'œ' => "oe",
        'ß' | 'ẞ' => "ss",
        'Þ' | 'þ' => "th",
        _ => return None,
    };
    Some(base)
}

/// Compares two names in ascending display order.
pub fn compare_names(left: &str, right: &str) -> Ordering {
    fold_key(left)
        .cmp(&fold_key(right))
        .then_with(|| left.to_lowercase().cmp(&right.to_lowercase()))
        .then_with(|| left.cmp(right))
}
