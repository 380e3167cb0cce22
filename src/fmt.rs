use bigdecimal::BigDecimal;
use num_bigint::Sign;

use crate::{
    charset,
    entry::{survivor_mask, KdlEntry},
    error::KdlErrorKind,
    value::{KdlIntegerFormat, KdlScalar, KdlValue},
    KdlDocument, KdlNode,
};

/// Options controlling [`encode`](crate::encode) output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// When set, overrides the radix of every integer on output.
    pub integer_format: Option<KdlIntegerFormat>,
}

impl EncodeOptions {
    /// Options that force all integers into the given radix.
    pub fn with_integer_format(format: KdlIntegerFormat) -> Self {
        Self {
            integer_format: Some(format),
        }
    }
}

/// Each top-level node is followed by a newline; the empty document is a
/// lone newline.
pub(crate) fn write_document(
    out: &mut String,
    doc: &KdlDocument,
    opts: &EncodeOptions,
    checked: bool,
) -> Result<(), KdlErrorKind> {
    if doc.nodes().is_empty() {
        out.push('\n');
        return Ok(());
    }
    for node in doc.nodes() {
        write_node(out, node, 0, opts, checked)?;
        out.push('\n');
    }
    Ok(())
}

pub(crate) fn write_node(
    out: &mut String,
    node: &KdlNode,
    indent: usize,
    opts: &EncodeOptions,
    checked: bool,
) -> Result<(), KdlErrorKind> {
    for _ in 0..indent {
        out.push(' ');
    }
    if let Some(annotation) = node.annotations().first() {
        write_annotation(out, annotation);
    }
    write_name(out, node.name());
    let mask = survivor_mask(node.entries());
    for (entry, keep) in node.entries().iter().zip(mask) {
        if !keep {
            continue;
        }
        out.push(' ');
        write_entry(out, entry, opts, checked)?;
    }
    if let Some(children) = node.children() {
        if !children.is_empty() {
            out.push_str(" {\n");
            for child in children {
                write_node(out, child, indent + 4, opts, checked)?;
                out.push('\n');
            }
            for _ in 0..indent {
                out.push(' ');
            }
            out.push('}');
        }
    }
    Ok(())
}

pub(crate) fn write_entry(
    out: &mut String,
    entry: &KdlEntry,
    opts: &EncodeOptions,
    checked: bool,
) -> Result<(), KdlErrorKind> {
    match entry {
        KdlEntry::Arg(value) => write_value(out, value, opts, checked),
        KdlEntry::Prop { key, value } => {
            write_value(out, key, opts, checked)?;
            out.push('=');
            write_value(out, value, opts, checked)
        }
    }
}

pub(crate) fn write_value(
    out: &mut String,
    value: &KdlValue,
    opts: &EncodeOptions,
    checked: bool,
) -> Result<(), KdlErrorKind> {
    if let Some(annotation) = value.annotations().first() {
        write_annotation(out, annotation);
    }
    match value.scalar() {
        KdlScalar::Null => out.push_str("#null"),
        KdlScalar::Bool(true) => out.push_str("#true"),
        KdlScalar::Bool(false) => out.push_str("#false"),
        KdlScalar::Nan => out.push_str("#nan"),
        KdlScalar::Infinity { negative: false } => out.push_str("#inf"),
        KdlScalar::Infinity { negative: true } => out.push_str("#-inf"),
        KdlScalar::Keyword(name) => {
            if checked && charset::needs_quoting(name) {
                return Err(KdlErrorKind::InvalidKeyword);
            }
            out.push('#');
            out.push_str(name);
        }
        KdlScalar::String(s) => {
            if charset::is_valid_identifier(s) {
                out.push_str(s);
            } else {
                write_quoted(out, s);
            }
        }
        KdlScalar::Ident(s) => out.push_str(s),
        KdlScalar::Integer(n) => {
            let format = opts.integer_format.unwrap_or(value.format());
            if n.sign() == Sign::Minus {
                out.push('-');
            }
            let magnitude = n.magnitude();
            match format {
                KdlIntegerFormat::Bin => {
                    out.push_str("0b");
                    out.push_str(&magnitude.to_str_radix(2));
                }
                KdlIntegerFormat::Oct => {
                    out.push_str("0o");
                    out.push_str(&magnitude.to_str_radix(8));
                }
                KdlIntegerFormat::Hex => {
                    out.push_str("0x");
                    out.push_str(&magnitude.to_str_radix(16));
                }
                KdlIntegerFormat::Dec | KdlIntegerFormat::Plain => {
                    out.push_str(&magnitude.to_str_radix(10));
                }
            }
        }
        KdlScalar::Float(d) => write_float(out, d),
    }
    Ok(())
}

fn write_name(out: &mut String, name: &str) {
    if charset::is_valid_identifier(name) {
        out.push_str(name);
    } else {
        write_quoted(out, name);
    }
}

fn write_annotation(out: &mut String, annotation: &str) {
    out.push('(');
    if charset::is_valid_identifier(annotation) {
        out.push_str(annotation);
    } else {
        write_quoted(out, annotation);
    }
    out.push(')');
}

/// The dquote escape table; everything else unprintable falls back to a
/// hex-uppercase `\u{...}` escape.
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{000B}' => out.push_str("\\v"),
            c if (c as u32) < 0x20
                || charset::is_newline(c)
                || charset::is_bom(c)
                || charset::is_disallowed(c) =>
            {
                out.push_str(&format!("\\u{{{:X}}}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Canonical decimal rendering: plain notation while the exponent is
/// non-positive and the adjusted exponent stays above -6, scientific
/// notation with an uppercase `E` otherwise.
fn write_float(out: &mut String, d: &BigDecimal) {
    let (coeff, scale) = d.as_bigint_and_exponent();
    let exponent = -scale;
    if coeff.sign() == Sign::Minus {
        out.push('-');
    }
    let digits = coeff.magnitude().to_string();
    let adjusted = exponent + digits.len() as i64 - 1;
    if exponent <= 0 && adjusted >= -6 {
        if exponent == 0 {
            out.push_str(&digits);
        } else {
            let point = digits.len() as i64 + exponent;
            if point > 0 {
                out.push_str(&digits[..point as usize]);
                out.push('.');
                out.push_str(&digits[point as usize..]);
            } else {
                out.push_str("0.");
                for _ in 0..-point {
                    out.push('0');
                }
                out.push_str(&digits);
            }
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('E');
        if adjusted >= 0 {
            out.push('+');
        }
        out.push_str(&adjusted.to_string());
    }
}

/// Encodes a document to canonical KDL v2 text.
///
/// The one check `Display` does not perform: a generic `#keyword` value
/// whose name cannot be written bare fails with
/// [`KdlErrorKind::InvalidKeyword`].
pub fn encode(
    doc: &KdlDocument,
    opts: &EncodeOptions,
) -> Result<String, crate::error::KdlParseFailure> {
    let mut out = String::new();
    write_document(&mut out, doc, opts, true).map_err(|kind| {
        crate::error::failure_from_kind("", kind, (0..0).into(), Some("while encoding"))
    })?;
    Ok(out)
}

/// Alias of [`encode`]; kept so both the checked and the
/// exception-flavored call sites of the original API share one signature.
pub fn encode_strict(
    doc: &KdlDocument,
    opts: &EncodeOptions,
) -> Result<String, crate::error::KdlParseFailure> {
    encode(doc, opts)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn float_str(s: &str) -> String {
        let mut out = String::new();
        write_float(&mut out, &BigDecimal::from_str(s).unwrap());
        out
    }

    #[test]
    fn plain_floats() {
        assert_eq!(float_str("1.5"), "1.5");
        assert_eq!(float_str("-1234.56"), "-1234.56");
        assert_eq!(float_str("0.0"), "0.0");
        assert_eq!(float_str("0.00001"), "0.00001");
    }

    #[test]
    fn scientific_floats() {
        assert_eq!(float_str("1.5E+3"), "1.5E+3");
        assert_eq!(float_str("1.23E-1000"), "1.23E-1000");
        assert_eq!(float_str("-2E10"), "-2E+10");
    }

    #[test]
    fn quoting() {
        let mut out = String::new();
        write_quoted(&mut out, "a\"b\\c\nd\u{0001}e");
        assert_eq!(out, r#""a\"b\\c\nd\u{1}e""#);
    }

    #[test]
    fn radix_override() {
        let mut node = KdlNode::new("n");
        node.push(255);
        let doc: KdlDocument = [node].into_iter().collect();
        let out = encode(&doc, &EncodeOptions::with_integer_format(KdlIntegerFormat::Hex))
            .unwrap();
        assert_eq!(out, "n 0xff\n");
    }

    #[test]
    fn invalid_keyword() {
        let mut node = KdlNode::new("n");
        node.push(KdlValue::keyword("not ok"));
        let doc: KdlDocument = [node].into_iter().collect();
        let err = encode(&doc, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), Some(&KdlErrorKind::InvalidKeyword));
        // Display still renders it.
        assert_eq!(doc.to_string(), "n #not ok\n");
    }
}
