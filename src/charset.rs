//! Unicode character classes from the [KDL v2
//! spec](https://github.com/kdl-org/kdl/blob/main/SPEC.md), shared by the
//! tokenizer, the value decoder, and the encoder.

/// `unicode-space := <See Table>`
pub(crate) fn is_unicode_space(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000B}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// `newline := <See Table>`
///
/// CRLF is handled by callers as a single line break; this predicate
/// classifies the individual code points.
pub(crate) fn is_newline(c: char) -> bool {
    matches!(
        c,
        '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// `equals-sign := See Table ([Equals Sign](https://github.com/kdl-org/kdl/blob/main/SPEC.md#equals-sign))`
pub(crate) fn is_equals_sign(c: char) -> bool {
    matches!(c, '=' | '\u{FE66}' | '\u{FF1D}' | '\u{1F7F0}')
}

/// Zero-width no-break space, only permitted as the very first code point
/// of a document.
pub(crate) fn is_bom(c: char) -> bool {
    c == '\u{FEFF}'
}

/// The unicode "direction control" characters.
pub(crate) fn is_direction_control(c: char) -> bool {
    matches!(
        c,
        '\u{200E}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}

/// `disallowed-literal-code-points := See Table (Disallowed Literal Code
/// Points)`
///
/// Surrogates can never reach us through `char`, so the live half of this
/// class is the direction controls plus the raw control characters.
pub(crate) fn is_disallowed(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{0008}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
        || is_direction_control(c)
}

pub(crate) fn is_sign(c: char) -> bool {
    matches!(c, '+' | '-')
}

pub(crate) fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// `identifier-char := unicode - unicode-space - newline - [\\/(){};\[\]"#] -
/// disallowed-literal-code-points - equals-sign`
pub(crate) fn is_identifier_forbidden(c: char) -> bool {
    (c as u32) < 0x20
        || is_disallowed(c)
        || is_unicode_space(c)
        || is_newline(c)
        || is_equals_sign(c)
        || is_bom(c)
        || matches!(
            c,
            '(' | ')' | '{' | '}' | '[' | ']' | '/' | '\\' | '"' | '#' | ';'
        )
}

/// Strings that collide with keyword literals when written bare.
pub(crate) const RESERVED_IDENTS: [&str; 6] = ["true", "false", "null", "inf", "-inf", "nan"];

/// Whether `s` may be written as a bare identifier: non-empty, no forbidden
/// code points, not shaped like a number, and not a reserved literal.
pub(crate) fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && !needs_quoting(s) && !RESERVED_IDENTS.contains(&s)
}

/// Whether `s` must be rendered as a quoted string rather than a bare
/// identifier. Number-shaped strings need quotes so they don't decode as
/// numbers on the way back in.
pub(crate) fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(is_identifier_forbidden) || is_number_shaped(s)
}

/// Whether a term lexeme is shaped like the start of a number: a leading
/// digit, or a sign/dot leading into a digit (`-1`, `.5`, `+.5`). Such a
/// lexeme must parse as a number and can never be a bare identifier.
pub(crate) fn is_number_shaped(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if is_digit(first) {
        return true;
    }
    let second = chars.next();
    if is_sign(first) || first == '.' {
        match second {
            Some(c) if is_digit(c) => return true,
            Some('.') if is_sign(first) => {
                return s.chars().nth(2).map(is_digit) == Some(true);
            }
            _ => {}
        }
    }
    false
}
