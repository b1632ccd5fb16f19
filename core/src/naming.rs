//! Conversion between identifier-style names (`BirthDate`) and the wire's
//! snake_case field names (`birth_date`).
//!
//! The two functions are not exact inverses. `to_wire_name` is applied
//! literally, so `IPv4` becomes `i_pv_4`, and `to_identifier` cannot recover
//! the original casing. What holds is stability: passing a wire name through
//! `to_identifier` and back yields the same wire name.

/// Convert a CamelCase identifier to its snake_case wire name.
///
/// A `_` is inserted before every uppercase character after the first, and
/// before a digit that does not follow another digit. The result is
/// lowercased.
pub fn to_wire_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut chars = identifier.chars();
    let Some(first) = chars.next() else {
        return out;
    };
    out.extend(first.to_lowercase());

    let mut prev = first;
    for c in chars {
        if c.is_uppercase() || (c.is_numeric() && !prev.is_numeric()) {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        prev = c;
    }
    out
}

/// Convert a snake_case or dotted wire token to an identifier.
///
/// Each `.` or `_` is dropped and the character after it is uppercased. The
/// first character is uppercased, or lowercased when `parameter_style` is set
/// (`on_page` gives `OnPage`, or `onPage` in parameter style). A separator
/// at the very end has nothing to capitalize and is kept as is.
pub fn to_identifier(token: &str, parameter_style: bool) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return out;
    };
    if parameter_style {
        out.extend(first.to_lowercase());
    } else {
        out.extend(first.to_uppercase());
    }

    while let Some(c) = chars.next() {
        if is_separator(c) {
            match chars.next() {
                // The follower is copied even when it is itself a separator.
                Some(next) => out.extend(next.to_uppercase()),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '_'
}
