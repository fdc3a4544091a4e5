//! Go string literal quoting helpers

/// Unquote a Go string literal: raw (`` `...` ``) or interpreted (`"..."`).
///
/// Raw literals drop carriage returns, as the Go compiler does.
pub fn unquote(literal: &str) -> Option<String> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        let body = &literal[1..literal.len() - 1];
        if body.contains('`') {
            return None;
        }
        return Some(body.replace('\r', ""));
    }

    if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') {
        return unescape(&literal[1..literal.len() - 1]);
    }

    None
}

/// Decode the escape sequences of an interpreted string body.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut bytes: Vec<u8> = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let esc = chars.next()?;
                match esc {
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0c}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\u{0b}'),
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'x' => {
                        let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                        let byte = u8::from_str_radix(&hex, 16).ok().filter(|_| hex.len() == 2)?;
                        push_byte(&mut out, &mut bytes, byte)?;
                        continue;
                    }
                    'u' | 'U' => {
                        let width = if esc == 'u' { 4 } else { 8 };
                        let hex: String = (0..width).filter_map(|_| chars.next()).collect();
                        if hex.len() != width {
                            return None;
                        }
                        let code = u32::from_str_radix(&hex, 16).ok()?;
                        out.push(char::from_u32(code)?);
                    }
                    '0'..='7' => {
                        let mut oct = String::from(esc);
                        for _ in 0..2 {
                            oct.push(chars.next()?);
                        }
                        let value = u32::from_str_radix(&oct, 8).ok()?;
                        let byte = u8::try_from(value).ok()?;
                        push_byte(&mut out, &mut bytes, byte)?;
                        continue;
                    }
                    _ => return None,
                }
                flush_bytes(&mut out, &mut bytes)?;
            }
            other => {
                flush_bytes(&mut out, &mut bytes)?;
                out.push(other);
            }
        }
    }

    flush_bytes(&mut out, &mut bytes)?;
    Some(out)
}

fn push_byte(out: &mut String, pending: &mut Vec<u8>, byte: u8) -> Option<()> {
    pending.push(byte);
    // Complete sequences are flushed eagerly so mixed escapes still decode.
    if let Ok(s) = std::str::from_utf8(pending) {
        out.push_str(s);
        pending.clear();
    }
    Some(())
}

fn flush_bytes(out: &mut String, pending: &mut Vec<u8>) -> Option<()> {
    if pending.is_empty() {
        return Some(());
    }
    let s = std::str::from_utf8(pending).ok()?;
    out.push_str(s);
    pending.clear();
    Some(())
}

/// Format characters (Unicode category Cf)
const FORMAT_CHARS: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
];

/// Go's notion of a printable rune: no controls, no format or private-use
/// characters, no noncharacters, and no spacing other than U+0020.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    let cp = c as u32;
    let private_use = (0xE000..=0xF8FF).contains(&cp) || cp >= 0xF0000;
    let noncharacter = (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE;
    let format = FORMAT_CHARS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&cp));
    !(private_use || noncharacter || format)
}

/// Quote a string the way Go's `%q` verb does.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push('"');
    out
}
