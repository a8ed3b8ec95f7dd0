//! Canonical text rendering used as block hash input.
//!
//! Block hashes are taken over a string built from the block fields. The
//! rendering follows Python's `str()`/`repr()` conventions for floats, strings
//! and dicts, so chains hash identically to the ledger format this crate
//! interoperates with.

/// Renders a float the way Python's `repr(float)` does: shortest round-trip
/// digits, always a decimal point or exponent, exponent form outside
/// `[1e-4, 1e16)`.
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        let rendered = format!("{}", value);
        if rendered.contains('.') {
            rendered
        } else {
            format!("{}.0", rendered)
        }
    } else {
        // Rust gives "1.5e-7"; Python wants "1.5e-07".
        let rendered = format!("{:e}", value);
        match rendered.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => rendered,
        }
    }
}

/// Renders a string literal the way Python's `repr(str)` does for code points
/// up to U+00FF. Admission only lets ASCII party names into blocks, so wider
/// characters never reach a block hash; they are copied through unescaped.
pub fn render_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_latin1_unprintable(c) => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// C0/C1 controls, DEL, no-break space and soft hyphen: the Latin-1 code
/// points Python's `repr` prints as `\xNN`.
fn is_latin1_unprintable(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1f | 0x7f..=0xa0 | 0xad)
}
