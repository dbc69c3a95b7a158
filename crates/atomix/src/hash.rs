//! Class name hashing and selector escaping.
//!
//! - [`to_hash`]: stable short identifier for a string (djb2 variant, base 52)
//! - [`esc`]: escapes an identifier for use after `.` in a class selector
//! - [`hash_fn`]: composes canonical conditions and a class token into the
//!   final escaped selector name

use crate::conditions::Conditions;
use crate::utility::Utility;

fn to_char(code: u32) -> char {
    let offset = if code > 25 { 39 } else { 97 };
    char::from((code + offset) as u8)
}

fn to_name(code: u32) -> String {
    let mut name = Vec::new();
    let mut x = code;
    while x > 52 {
        name.push(to_char(x % 52));
        x /= 52;
    }
    name.push(to_char(x % 52));
    name.iter().rev().collect()
}

/// Hashes `value` into a short `[a-zA-Z]+` identifier.
///
/// The hash runs over UTF-16 code units from the end of the string, so the
/// output is a pure function of the input and stable across runs and
/// platforms.
pub fn to_hash(value: &str) -> String {
    let units: Vec<u16> = value.encode_utf16().collect();
    let mut h: i32 = 5381;
    for &unit in units.iter().rev() {
        h = h.wrapping_mul(33) ^ i32::from(unit);
    }
    to_name(h as u32)
}

/// Escapes `ident` so it can be used as a class name in a selector.
pub fn esc(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 8);

    for (idx, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit() && (idx == 0 || (idx == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            _ if leading_digit => out.push_str(&format!("\\{:x} ", c as u32)),
            '-' if chars.len() == 1 => out.push_str("\\-"),
            c if !c.is_ascii() || c.is_ascii_alphanumeric() || c == '-' || c == '_' => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Derives the escaped selector name for a class token under `conditions`.
///
/// In hash mode the canonical conditions and the token are joined with `:`
/// and hashed; otherwise the readable `cond:cond:token` form is used.
pub fn hash_fn(
    conditions: &Conditions,
    utility: &Utility,
    hash: bool,
    paths: &[String],
    class_name: &str,
) -> String {
    let mut conds = conditions.finalize(paths);
    let result = if hash {
        conds.push(class_name.to_string());
        utility.format_class_name(&to_hash(&conds.join(":")))
    } else {
        conds.push(utility.format_class_name(class_name));
        conds.join(":")
    };
    esc(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable() {
        assert_eq!(to_hash("color_red"), to_hash("color_red"));
        assert_ne!(to_hash("color_red"), to_hash("color_blue"));
        assert_ne!(to_hash("hover:color_red"), to_hash("color_red"));
    }

    #[test]
    fn hash_uses_only_letters() {
        for input in ["", "a", "md:hover:padding_4", "émoji ✨"] {
            let hash = to_hash(input);
            assert!(!hash.is_empty());
            assert!(hash.chars().all(|c| c.is_ascii_alphabetic()), "{hash}");
        }
    }

    #[test]
    fn hash_of_empty_string_is_seed() {
        // 5381 = (1 * 52 + 51) * 52 + 25
        assert_eq!(to_hash(""), "bZz");
    }

    #[test]
    fn escapes_selector_syntax() {
        assert_eq!(esc("hover:color_red"), "hover\\:color_red");
        assert_eq!(esc("w_1/2"), "w_1\\/2");
        assert_eq!(esc("p_0.5"), "p_0\\.5");
        assert_eq!(esc("[&>p]:m_0"), "\\[\\&\\>p\\]\\:m_0");
    }

    #[test]
    fn escapes_leading_digits() {
        assert_eq!(esc("2xl:p_4"), "\\32 xl\\:p_4");
        assert_eq!(esc("-1"), "-\\31 ");
        assert_eq!(esc("-"), "\\-");
    }
}
