use std::fmt::Display;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use winnow::{
    combinator::{opt, preceded},
    prelude::*,
    token::{one_of, take_while},
};

use crate::{
    charset,
    error::KdlErrorKind,
    fmt::{write_value, EncodeOptions},
    tokenizer::ScanError,
};

/// The radix a KDL integer was written in (and will be written back in).
///
/// `Plain` is reserved for non-integer values; integers always carry one of
/// the four radixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KdlIntegerFormat {
    /// Not an integer.
    #[default]
    Plain,
    /// `0b...`
    Bin,
    /// `0o...`
    Oct,
    /// Base 10, no prefix.
    Dec,
    /// `0x...`
    Hex,
}

/// The payload of a [`KdlValue`].
///
/// Bare identifiers and strings carry the same kind of payload and compare
/// equal when their text matches: the encoder writes a string bare
/// whenever the identifier rules allow it, and a bare lexeme decodes as an
/// identifier.
#[derive(Debug, Clone)]
pub enum KdlScalar {
    /// A quoted or raw [KDL String](https://github.com/kdl-org/kdl/blob/main/SPEC.md#string).
    String(String),
    /// A bare identifier used as a value.
    Ident(String),
    /// A `#name` atom outside the recognized keyword set.
    Keyword(String),
    /// A non-float [KDL Number](https://github.com/kdl-org/kdl/blob/main/SPEC.md#number),
    /// arbitrary precision.
    Integer(BigInt),
    /// A floating point [KDL Number](https://github.com/kdl-org/kdl/blob/main/SPEC.md#number),
    /// kept as an arbitrary-precision decimal.
    Float(BigDecimal),
    /// `#true` or `#false`.
    Bool(bool),
    /// `#null`.
    Null,
    /// `#inf` or `#-inf`.
    Infinity {
        /// `#-inf` when true.
        negative: bool,
    },
    /// `#nan`.
    Nan,
}

/// A single KDL value: a payload plus its integer radix and any type
/// annotations attached to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KdlValue {
    pub(crate) scalar: KdlScalar,
    pub(crate) format: KdlIntegerFormat,
    pub(crate) annotations: Vec<String>,
}

impl Default for KdlScalar {
    fn default() -> Self {
        KdlScalar::Null
    }
}

impl PartialEq for KdlScalar {
    fn eq(&self, other: &Self) -> bool {
        use KdlScalar::*;
        match (self, other) {
            (String(l) | Ident(l), String(r) | Ident(r)) => l == r,
            (Keyword(l), Keyword(r)) => l == r,
            (Integer(l), Integer(r)) => l == r,
            (Float(l), Float(r)) => l == r,
            (Bool(l), Bool(r)) => l == r,
            (Infinity { negative: l }, Infinity { negative: r }) => l == r,
            (Null, Null) | (Nan, Nan) => true,
            _ => false,
        }
    }
}

impl KdlValue {
    /// Creates a value from a payload, with the default radix for integers.
    pub fn new(scalar: KdlScalar) -> Self {
        let format = match &scalar {
            KdlScalar::Integer(_) => KdlIntegerFormat::Dec,
            _ => KdlIntegerFormat::Plain,
        };
        Self {
            scalar,
            format,
            annotations: Vec::new(),
        }
    }

    /// Creates an integer value with an explicit radix.
    pub fn integer(value: impl Into<BigInt>, format: KdlIntegerFormat) -> Self {
        let format = match format {
            KdlIntegerFormat::Plain => KdlIntegerFormat::Dec,
            other => other,
        };
        Self {
            scalar: KdlScalar::Integer(value.into()),
            format,
            annotations: Vec::new(),
        }
    }

    /// Creates a generic `#name` keyword value.
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(KdlScalar::Keyword(name.into()))
    }

    /// Creates a bare-identifier value.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(KdlScalar::Ident(name.into()))
    }

    /// Attaches a type annotation, builder style.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// The payload of this value.
    pub fn scalar(&self) -> &KdlScalar {
        &self.scalar
    }

    /// The radix this value was written in; `Plain` for non-integers.
    pub fn format(&self) -> KdlIntegerFormat {
        self.format
    }

    /// The type annotations attached to this value, in order.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// A mutable reference to the value's type annotations.
    pub fn annotations_mut(&mut self) -> &mut Vec<String> {
        &mut self.annotations
    }

    /// Changes the radix an integer value will be written back in. Has no
    /// effect on non-integers.
    pub fn set_format(&mut self, format: KdlIntegerFormat) {
        if matches!(self.scalar, KdlScalar::Integer(_)) && format != KdlIntegerFormat::Plain {
            self.format = format;
        }
    }

    /// Returns `true` if the payload is a string.
    pub fn is_string(&self) -> bool {
        matches!(self.scalar, KdlScalar::String(..))
    }

    /// Returns `true` if the payload is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self.scalar, KdlScalar::Integer(..))
    }

    /// Returns `true` if the payload is a float.
    pub fn is_float(&self) -> bool {
        matches!(self.scalar, KdlScalar::Float(..))
    }

    /// Returns `true` if the payload is a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self.scalar, KdlScalar::Bool(..))
    }

    /// Returns `true` if the payload is `#null`.
    pub fn is_null(&self) -> bool {
        matches!(self.scalar, KdlScalar::Null)
    }

    /// Returns `true` if the payload is a bare identifier.
    pub fn is_ident(&self) -> bool {
        matches!(self.scalar, KdlScalar::Ident(..))
    }

    /// Returns `Some(&str)` for string payloads.
    pub fn as_string(&self) -> Option<&str> {
        match &self.scalar {
            KdlScalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `Some(&str)` for bare-identifier payloads.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.scalar {
            KdlScalar::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `Some(&BigInt)` for integer payloads.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match &self.scalar {
            KdlScalar::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Returns `Some(&BigDecimal)` for float payloads.
    pub fn as_float(&self) -> Option<&BigDecimal> {
        match &self.scalar {
            KdlScalar::Float(d) => Some(d),
            _ => None,
        }
    }

    /// Returns `Some(bool)` for boolean payloads.
    pub fn as_bool(&self) -> Option<bool> {
        match self.scalar {
            KdlScalar::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl Display for KdlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        // Display is the unchecked rendering; `encode` is the surface that
        // refuses unwritable keywords.
        let _ = write_value(&mut out, self, &EncodeOptions::default(), false);
        write!(f, "{out}")
    }
}

impl From<i64> for KdlValue {
    fn from(value: i64) -> Self {
        KdlValue::integer(value, KdlIntegerFormat::Dec)
    }
}

impl From<BigInt> for KdlValue {
    fn from(value: BigInt) -> Self {
        KdlValue::integer(value, KdlIntegerFormat::Dec)
    }
}

impl From<BigDecimal> for KdlValue {
    fn from(value: BigDecimal) -> Self {
        KdlValue::new(KdlScalar::Float(value))
    }
}

impl From<f64> for KdlValue {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            KdlValue::new(KdlScalar::Nan)
        } else if value.is_infinite() {
            KdlValue::new(KdlScalar::Infinity {
                negative: value.is_sign_negative(),
            })
        } else {
            match BigDecimal::try_from(value) {
                Ok(d) => KdlValue::new(KdlScalar::Float(d)),
                Err(_) => KdlValue::new(KdlScalar::Nan),
            }
        }
    }
}

impl From<&str> for KdlValue {
    fn from(value: &str) -> Self {
        KdlValue::new(KdlScalar::String(value.to_string()))
    }
}

impl From<String> for KdlValue {
    fn from(value: String) -> Self {
        KdlValue::new(KdlScalar::String(value))
    }
}

impl From<bool> for KdlValue {
    fn from(value: bool) -> Self {
        KdlValue::new(KdlScalar::Bool(value))
    }
}

impl<T> From<Option<T>> for KdlValue
where
    T: Into<KdlValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => KdlValue::new(KdlScalar::Null),
        }
    }
}

/// Decodes a term lexeme into a typed value.
///
/// Keywords win first, then number-shaped lexemes must parse as one of the
/// four radixes or a decimal float, and everything else is a bare
/// identifier (validated against the identifier rules by the parser, which
/// knows whether the term names a node or stands as a value).
pub(crate) fn decode_term(lexeme: &str) -> Result<KdlValue, KdlErrorKind> {
    if lexeme.is_empty() {
        return Err(KdlErrorKind::NoTerm);
    }
    if let Some(name) = lexeme.strip_prefix('#') {
        let scalar = match name {
            "true" => KdlScalar::Bool(true),
            "false" => KdlScalar::Bool(false),
            "null" => KdlScalar::Null,
            "inf" => KdlScalar::Infinity { negative: false },
            "-inf" => KdlScalar::Infinity { negative: true },
            "nan" => KdlScalar::Nan,
            "" => return Err(KdlErrorKind::InvalidIdentifier),
            other => KdlScalar::Keyword(other.to_string()),
        };
        return Ok(KdlValue::new(scalar));
    }
    if charset::is_number_shaped(lexeme) {
        return decode_number(lexeme);
    }
    Ok(KdlValue::new(KdlScalar::Ident(lexeme.to_string())))
}

fn decode_number(lexeme: &str) -> Result<KdlValue, KdlErrorKind> {
    let (negative, digits) = match lexeme.strip_prefix(['+', '-']) {
        Some(rest) => (lexeme.starts_with('-'), rest),
        None => (false, lexeme),
    };
    if let Some(run) = digits.strip_prefix("0b") {
        return radix_integer(run, 2, negative, KdlIntegerFormat::Bin)
            .ok_or(KdlErrorKind::InvalidBinIntegerFormat);
    }
    if let Some(run) = digits.strip_prefix("0o") {
        return radix_integer(run, 8, negative, KdlIntegerFormat::Oct)
            .ok_or(KdlErrorKind::InvalidOctIntegerFormat);
    }
    if let Some(run) = digits.strip_prefix("0x") {
        return radix_integer(run, 16, negative, KdlIntegerFormat::Hex)
            .ok_or(KdlErrorKind::InvalidHexIntegerFormat);
    }
    if digits.contains(['.', 'e', 'E']) {
        return decode_float(lexeme).ok_or(KdlErrorKind::InvalidFloatFormat);
    }
    radix_integer(digits, 10, negative, KdlIntegerFormat::Dec)
        .ok_or(KdlErrorKind::InvalidDecIntegerFormat)
}

/// `integer := digit (digit | '_')*`, underscores stripped, sign applied
/// after parsing.
fn radix_integer(
    run: &str,
    radix: u32,
    negative: bool,
    format: KdlIntegerFormat,
) -> Option<KdlValue> {
    let mut chars = run.chars();
    if !chars.next()?.is_digit(radix) {
        return None;
    }
    if !run.chars().all(|c| c == '_' || c.is_digit(radix)) {
        return None;
    }
    let clean: String = run.chars().filter(|&c| c != '_').collect();
    let n = BigInt::parse_bytes(clean.as_bytes(), radix)?;
    Some(KdlValue::integer(if negative { -n } else { n }, format))
}

/// ```text
/// decimal := sign? integer ('.' integer)? exponent?
/// exponent := ('e' | 'E') sign? integer
/// ```
fn decode_float(lexeme: &str) -> Option<KdlValue> {
    let mut input = lexeme;
    float_lexeme.parse_next(&mut input).ok()?;
    if !input.is_empty() {
        return None;
    }
    let normalized: String = lexeme
        .chars()
        .filter(|&c| c != '_')
        .map(|c| if c == 'e' { 'E' } else { c })
        .collect();
    let dec: BigDecimal = normalized.parse().ok()?;
    Some(KdlValue::new(KdlScalar::Float(dec)))
}

type VResult<T> = PResult<T, ScanError>;

fn float_lexeme(input: &mut &str) -> VResult<()> {
    opt(one_of(['+', '-'])).parse_next(input)?;
    dec_digits.parse_next(input)?;
    opt(preceded('.', dec_digits)).parse_next(input)?;
    opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), dec_digits))
        .void()
        .parse_next(input)?;
    Ok(())
}

/// `integer := digit (digit | '_')*`
fn dec_digits(input: &mut &str) -> VResult<()> {
    one_of(|c: char| c.is_ascii_digit()).parse_next(input)?;
    take_while(0.., |c: char| c.is_ascii_digit() || c == '_')
        .void()
        .parse_next(input)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn keywords() {
        assert_eq!(
            decode_term("#true").unwrap().scalar(),
            &KdlScalar::Bool(true)
        );
        assert_eq!(
            decode_term("#false").unwrap().scalar(),
            &KdlScalar::Bool(false)
        );
        assert_eq!(decode_term("#null").unwrap().scalar(), &KdlScalar::Null);
        assert_eq!(
            decode_term("#inf").unwrap().scalar(),
            &KdlScalar::Infinity { negative: false }
        );
        assert_eq!(
            decode_term("#-inf").unwrap().scalar(),
            &KdlScalar::Infinity { negative: true }
        );
        assert_eq!(decode_term("#nan").unwrap().scalar(), &KdlScalar::Nan);
        assert_eq!(
            decode_term("#foo").unwrap().scalar(),
            &KdlScalar::Keyword("foo".into())
        );
        // Keywords are case-sensitive; anything else is generic.
        assert_eq!(
            decode_term("#True").unwrap().scalar(),
            &KdlScalar::Keyword("True".into())
        );
    }

    #[test]
    fn integers() {
        let v = decode_term("0xdead_beef").unwrap();
        assert_eq!(v.as_integer(), Some(&BigInt::from(0xdead_beef_i64)));
        assert_eq!(v.format(), KdlIntegerFormat::Hex);

        let v = decode_term("-0b10_01").unwrap();
        assert_eq!(v.as_integer(), Some(&BigInt::from(-0b1001)));
        assert_eq!(v.format(), KdlIntegerFormat::Bin);

        let v = decode_term("0o777").unwrap();
        assert_eq!(v.as_integer(), Some(&BigInt::from(0o777)));
        assert_eq!(v.format(), KdlIntegerFormat::Oct);

        let v = decode_term("+1_234").unwrap();
        assert_eq!(v.as_integer(), Some(&BigInt::from(1234)));
        assert_eq!(v.format(), KdlIntegerFormat::Dec);

        // Arbitrary precision.
        let v = decode_term("170141183460469231731687303715884105728").unwrap();
        assert_eq!(
            v.as_integer(),
            Some(&BigInt::from_str("170141183460469231731687303715884105728").unwrap())
        );
    }

    #[test]
    fn bad_integers() {
        assert_eq!(
            decode_term("0x_1").unwrap_err(),
            KdlErrorKind::InvalidHexIntegerFormat
        );
        assert_eq!(
            decode_term("0b12").unwrap_err(),
            KdlErrorKind::InvalidBinIntegerFormat
        );
        assert_eq!(
            decode_term("0o8").unwrap_err(),
            KdlErrorKind::InvalidOctIntegerFormat
        );
        assert_eq!(
            decode_term("12abc").unwrap_err(),
            KdlErrorKind::InvalidDecIntegerFormat
        );
    }

    #[test]
    fn floats() {
        let v = decode_term("1_234.56").unwrap();
        assert_eq!(v.as_float(), Some(&BigDecimal::from_str("1234.56").unwrap()));

        let v = decode_term("1.23e-1000").unwrap();
        assert_eq!(
            v.as_float(),
            Some(&BigDecimal::from_str("1.23E-1000").unwrap())
        );

        let v = decode_term("-2E10").unwrap();
        assert_eq!(v.as_float(), Some(&BigDecimal::from_str("-2E10").unwrap()));

        assert_eq!(
            decode_term("1.").unwrap_err(),
            KdlErrorKind::InvalidFloatFormat
        );
        assert_eq!(
            decode_term("1.5e").unwrap_err(),
            KdlErrorKind::InvalidFloatFormat
        );
        assert_eq!(
            decode_term("-.5").unwrap_err(),
            KdlErrorKind::InvalidFloatFormat
        );
    }

    #[test]
    fn idents() {
        assert_eq!(
            decode_term("foo-bar").unwrap().scalar(),
            &KdlScalar::Ident("foo-bar".into())
        );
        // Reserved words still decode as idents; the parser decides whether
        // they may stand bare.
        assert_eq!(
            decode_term("true").unwrap().scalar(),
            &KdlScalar::Ident("true".into())
        );
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", KdlValue::from(42)), "42");
        assert_eq!(format!("{}", KdlValue::from(true)), "#true");
        assert_eq!(format!("{}", KdlValue::from(Option::<i64>::None)), "#null");
        assert_eq!(format!("{}", KdlValue::from("foo")), "foo");
        assert_eq!(format!("{}", KdlValue::from("foo bar")), "\"foo bar\"");
        assert_eq!(
            format!("{}", KdlValue::integer(255, KdlIntegerFormat::Hex)),
            "0xff"
        );
    }
}
