//! Literal boundary matching.
//!
//! Every function here looks at the text starting at the current scanner
//! position and returns the byte length of the literal found there, without
//! consuming anything. The scanner decides what to do with the length.
//!
//! ## Numeric Literals
//!
//! Subforms are attempted most specific first:
//!
//! | Form | Example | Kind |
//! |------|---------|------|
//! | `0x` hex | `0xFF`, `0xFFn` | `Hex` |
//! | `0o` / legacy octal | `0o17`, `017` | `Octal` |
//! | `0b` binary | `0b101` | `Binary` |
//! | exponent | `1e10` | `Exponent` |
//! | fraction | `1_000.5e-3` | `Float` |
//! | digits | `42`, `10n` | `Integer` / `BigInt` |
//!
//! `_` separators are allowed between digit groups, never leading or
//! trailing.
//!
//! ## Regular Expressions
//!
//! `/body/flags` counts as a regex only when the next non-blank character
//! is one of `. ; , ) ] }`, a line break, or the end of input. Anything else
//! falls back to the division operator.

use super::NumberKind;

/// Length of `d+(_+d+)*` at the start of `s` for the given digit class.
pub fn digit_run(s: &str, is_digit: impl Fn(u8) -> bool) -> usize {
    let bytes = s.as_bytes();
    let mut len = 0;
    while bytes.get(len).is_some_and(|b| is_digit(*b)) {
        len += 1;
    }
    if len == 0 {
        return 0;
    }
    loop {
        let mut probe = len;
        while bytes.get(probe) == Some(&b'_') {
            probe += 1;
        }
        if probe == len {
            return len;
        }
        let group_start = probe;
        while bytes.get(probe).is_some_and(|b| is_digit(*b)) {
            probe += 1;
        }
        if probe == group_start {
            return len;
        }
        len = probe;
    }
}

fn with_bigint_suffix(s: &str, len: usize) -> usize {
    if s.as_bytes().get(len) == Some(&b'n') {
        len + 1
    } else {
        len
    }
}

fn is_octal(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

fn is_binary(b: u8) -> bool {
    b == b'0' || b == b'1'
}

/// Matches a numeric literal starting with an ASCII digit.
pub fn match_number(s: &str) -> Option<(NumberKind, usize)> {
    let bytes = s.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }

    if bytes[0] == b'0' {
        let prefixed = match bytes.get(1) {
            Some(b'x' | b'X') => Some((NumberKind::Hex, 2, digit_run(&s[2..], |b| b.is_ascii_hexdigit()))),
            Some(b'o' | b'O') => Some((NumberKind::Octal, 2, digit_run(&s[2..], is_octal))),
            Some(b'b' | b'B') => Some((NumberKind::Binary, 2, digit_run(&s[2..], is_binary))),
            Some(b'0'..=b'7') => Some((NumberKind::Octal, 1, digit_run(&s[1..], is_octal))),
            _ => None,
        };
        if let Some((kind, prefix, run)) = prefixed {
            if run > 0 {
                return Some((kind, with_bigint_suffix(s, prefix + run)));
            }
        }
    }

    let int = digit_run(s, |b| b.is_ascii_digit());

    if let Some(exp) = match_exponent(&s[int..]) {
        return Some((NumberKind::Exponent, int + exp));
    }

    if bytes.get(int) == Some(&b'.') {
        let fraction = digit_run(&s[int + 1..], |b| b.is_ascii_digit());
        if fraction > 0 {
            let end = int + 1 + fraction;
            let exp = match_exponent(&s[end..]).unwrap_or(0);
            return Some((NumberKind::Float, end + exp));
        }
    }

    if bytes.get(int) == Some(&b'n') {
        return Some((NumberKind::BigInt, int + 1));
    }
    Some((NumberKind::Integer, int))
}

fn match_exponent(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return None;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    let run = digit_run(&s[1 + sign..], |b| b.is_ascii_digit());
    (run > 0).then_some(1 + sign + run)
}

/// Matches a quoted string; `None` when the closing quote is missing.
pub fn match_string(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let (_, quote) = chars.next()?;
    while let Some((pos, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '\n' | '\r' => return None,
            _ if ch == quote => return Some(pos + 1),
            _ => {}
        }
    }
    None
}

/// Matches `/body/flags` followed by a plausible terminator.
pub fn match_regexp(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().skip(1);
    let mut body = 0;
    let close = loop {
        let (pos, ch) = chars.next()?;
        match ch {
            '\\' => match chars.next() {
                Some((_, '\n' | '\r')) | None => return None,
                Some(_) => body += 1,
            },
            '\n' | '\r' => return None,
            '/' => break pos,
            _ => body += 1,
        }
    };
    if body == 0 {
        return None;
    }

    let mut end = close + 1;
    let bytes = s.as_bytes();
    while bytes
        .get(end)
        .is_some_and(|b| matches!(b, b'g' | b'i' | b'm' | b's' | b'u' | b'y'))
    {
        end += 1;
    }

    let mut after = end;
    while matches!(bytes.get(after), Some(b' ' | b'\t')) {
        after += 1;
    }
    match bytes.get(after) {
        None | Some(b'.' | b';' | b',' | b')' | b']' | b'}' | b'\n' | b'\r') => Some(end),
        _ => None,
    }
}
