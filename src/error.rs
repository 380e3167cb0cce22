use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// The toplevel `Error` type for this crate: returned when a KDL document
/// failed to decode or encode.
///
/// This diagnostic implements [`miette::Diagnostic`] and can be used to
/// display detailed, pretty-printed diagnostic messages when using
/// [`miette::Result`] and the `"fancy"` feature flag for `miette`:
///
/// ```no_run
/// fn main() -> miette::Result<()> {
///     "foo 1.".parse::<knotwork::KdlDocument>()?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("Failed to process KDL.")]
pub struct KdlParseFailure {
    /// Original input that this failure came from.
    #[source_code]
    pub input: Arc<String>,

    /// Sub-diagnostics for this failure.
    #[related]
    pub diagnostics: Vec<KdlDiagnostic>,
}

impl KdlParseFailure {
    /// The error kind of the first (usually only) diagnostic.
    pub fn kind(&self) -> Option<&KdlErrorKind> {
        self.diagnostics.first().map(|d| &d.kind)
    }
}

/// An individual diagnostic message for a KDL decoding or encoding issue.
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("{kind}")]
pub struct KdlDiagnostic {
    /// Shared source for the diagnostic.
    #[source_code]
    pub input: Arc<String>,

    /// Offset in chars of the error.
    #[label("{}", label.unwrap_or("here"))]
    pub span: SourceSpan,

    /// Label text for this span. Defaults to `"here"`.
    pub label: Option<&'static str>,

    /// Suggestion for fixing the error.
    #[help]
    pub help: Option<&'static str>,

    /// Severity level for the Diagnostic.
    #[diagnostic(severity)]
    pub severity: miette::Severity,

    /// Specific error kind for this diagnostic.
    pub kind: KdlErrorKind,
}

/// A type representing the specific issue a [`KdlDiagnostic`] reports.
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum KdlErrorKind {
    // Tokenize
    /// The tokenizer stopped before consuming the whole input.
    #[error("Tokenization ended before the end of input.")]
    #[diagnostic(code(knotwork::tokenize::incomplete))]
    IncompleteTokenize,

    /// A byte sequence that can never begin a token.
    #[error("Unable to tokenize input.")]
    #[diagnostic(code(knotwork::tokenize::bad_tokenize))]
    BadTokenize,

    /// A quoted string ran to the end of input without a closing `"`.
    #[error("Unterminated string.")]
    #[diagnostic(code(knotwork::tokenize::unterminated_dquote_string))]
    UnterminatedDquoteString,

    /// A raw string ran to the end of input without its closing quote-hash
    /// run.
    #[error("Unterminated raw string.")]
    #[diagnostic(code(knotwork::tokenize::unterminated_raw_string))]
    UnterminatedRawString,

    /// A backslash escape that is not part of the escape table.
    #[error("Invalid string escape.")]
    #[diagnostic(code(knotwork::tokenize::invalid_dquote_string_escape))]
    InvalidDquoteStringEscape,

    /// A raw string body containing a disallowed code point.
    #[error("Invalid character in raw string.")]
    #[diagnostic(code(knotwork::tokenize::invalid_raw_string_body))]
    InvalidRawStringBody,

    /// `"""` not immediately followed by a newline.
    #[error("Invalid multi-line string.")]
    #[diagnostic(code(knotwork::tokenize::invalid_multiline_string))]
    InvalidMultilineString,

    /// `#"""` (any hash multiplicity) not immediately followed by a newline.
    #[error("Invalid multi-line raw string.")]
    #[diagnostic(code(knotwork::tokenize::invalid_multiline_raw_string))]
    InvalidMultilineRawString,

    /// A line of a multi-line string did not begin with the indentation
    /// prefix established by its final line.
    #[error("Unable to dedent multi-line string.")]
    #[diagnostic(code(knotwork::tokenize::incomplete_dedentation))]
    IncompleteDedentation,

    /// The final line of a multi-line string contained escape-derived or
    /// non-whitespace characters and cannot define the indentation.
    #[error("Invalid final line in multi-line string.")]
    #[diagnostic(code(knotwork::tokenize::invalid_end_line))]
    InvalidEndLine,

    /// A bare lexeme that does not satisfy the identifier rules.
    #[error("Invalid identifier.")]
    #[diagnostic(code(knotwork::tokenize::invalid_identifier))]
    InvalidIdentifier,

    /// A `\u{...}` escape naming something that is not a Unicode scalar
    /// value.
    #[error("Invalid unicode scalar value.")]
    #[diagnostic(code(knotwork::tokenize::invalid_unicode_scalar))]
    InvalidUnicodeScalar,

    /// Input ended in the middle of a construct (comment, string opener).
    #[error("Input ended unexpectedly.")]
    #[diagnostic(code(knotwork::tokenize::premature_termination))]
    PrematureTermination,

    /// A literal newline inside a single-line string.
    #[error("Unexpected newline in single-line string.")]
    #[diagnostic(code(knotwork::tokenize::unexpected_newline_in_single_line_string))]
    UnexpectedNewlineInSingleLineString,

    /// A character that cannot appear at this point in the input.
    #[error("Unexpected character.")]
    #[diagnostic(code(knotwork::tokenize::unexpected_character))]
    UnexpectedCharacter,

    /// A disallowed literal code point in a string body.
    #[error("Disallowed literal code point.")]
    #[diagnostic(code(knotwork::tokenize::disallowed_char))]
    DisallowedChar,

    // Parse
    /// A token that no parser state accepts at this position.
    #[error("Invalid parse state.")]
    #[diagnostic(code(knotwork::parse::invalid_parse_state))]
    InvalidParseState,

    /// An annotation whose inner value is not an identifier or string.
    #[error("Invalid annotation.")]
    #[diagnostic(code(knotwork::parse::invalid_annotation))]
    InvalidAnnotation,

    /// A token that cannot appear inside `(` ... `)`.
    #[error("Invalid token inside annotation.")]
    #[diagnostic(code(knotwork::parse::invalid_annotation_parse_state))]
    InvalidAnnotationParseState,

    /// A token that cannot begin a node attribute.
    #[error("Invalid attribute token.")]
    #[diagnostic(code(knotwork::parse::invalid_attribute_token))]
    InvalidAttributeToken,

    /// A property `=` that is not followed by a decodable value.
    #[error("Invalid property value.")]
    #[diagnostic(code(knotwork::parse::invalid_attribute_value))]
    InvalidAttributeValue,

    /// An annotation in a position where it cannot attach to a property
    /// value.
    #[error("Invalid property value annotation.")]
    #[diagnostic(code(knotwork::parse::invalid_attribute_value_annotation))]
    InvalidAttributeValueAnnotation,

    /// A bare (unquoted) argument that does not satisfy the identifier
    /// rules.
    #[error("Invalid bare identifier.")]
    #[diagnostic(code(knotwork::parse::invalid_bare_identifier))]
    InvalidBareIdentifier,

    /// A node whose resolved attributes are malformed, e.g. two surviving
    /// children blocks.
    #[error("Invalid node attributes.")]
    #[diagnostic(code(knotwork::parse::invalid_node_attributes))]
    InvalidNodeAttributes,

    /// A property key carrying a type annotation.
    #[error("Annotations are not allowed on property keys.")]
    #[diagnostic(code(knotwork::parse::key_annotations_not_allowed))]
    KeyAnnotationsNotAllowed,

    /// A token directly after a node name where a space was required.
    #[error("Unexpected token after node name.")]
    #[diagnostic(code(knotwork::parse::unexpected_token_after_node_name))]
    UnexpectedTokenAfterNodeName,

    /// A value-bearing token after this node already closed its children
    /// block.
    #[error("Node is not accepting attributes here.")]
    #[diagnostic(code(knotwork::parse::node_not_accepting_attributes_now))]
    NodeNotAcceptingAttributesNow,

    /// A slashdash in a position it cannot originate from, e.g. directly
    /// after a pending annotation.
    #[error("Slashdash is not allowed here.")]
    #[diagnostic(code(knotwork::parse::unexpected_slashdash_origin))]
    UnexpectedSlashdashOrigin,

    /// A token that ends the enclosing construct before the slashdash found
    /// its target.
    #[error("Unexpected token while looking for a slashdash target.")]
    #[diagnostic(code(knotwork::parse::unexpected_slashdash_stop_token))]
    UnexpectedSlashdashStopToken,

    /// The item following a slashdash is not a node, value, property, or
    /// children block.
    #[error("Slashdash cannot discard this item.")]
    #[diagnostic(code(knotwork::parse::unexpected_slashdash_target))]
    UnexpectedSlashdashTarget,

    /// The token stream ended inside an unfinished construct.
    #[error("Unexpected end of document.")]
    #[diagnostic(code(knotwork::parse::unexpected_end_of_document))]
    UnexpectedEndOfDocument,

    /// A slashdash with nothing after it to discard.
    #[error("Slashdash with nothing to discard.")]
    #[diagnostic(code(knotwork::parse::slashdash_nothing))]
    SlashdashNothing,

    /// A bare `{` ... `}` block at document level that was not discarded by
    /// a slashdash.
    #[error("Raw children block in document.")]
    #[diagnostic(code(knotwork::parse::raw_block_in_document))]
    RawBlockInDocument,

    /// An annotation that never attached to a node or value.
    #[error("Annotation is not attached to anything.")]
    #[diagnostic(code(knotwork::parse::unresolved_annotation))]
    UnresolvedAnnotation,

    /// Internal state-machine exit that left a frame unresolved.
    #[error("Parser exited in an unresolved state.")]
    #[diagnostic(code(knotwork::parse::unresolved_exit_state))]
    UnresolvedExitState,

    // Value decode
    /// `0b` digits outside `[01_]`, or an empty/underscore-led digit run.
    #[error("Invalid binary integer.")]
    #[diagnostic(code(knotwork::value::invalid_bin_integer_format))]
    InvalidBinIntegerFormat,

    /// `0o` digits outside `[0-7_]`, or an empty/underscore-led digit run.
    #[error("Invalid octal integer.")]
    #[diagnostic(code(knotwork::value::invalid_oct_integer_format))]
    InvalidOctIntegerFormat,

    /// A decimal integer lexeme with trailing garbage.
    #[error("Invalid decimal integer.")]
    #[diagnostic(code(knotwork::value::invalid_dec_integer_format))]
    InvalidDecIntegerFormat,

    /// `0x` digits outside `[0-9A-Fa-f_]`, or an empty/underscore-led digit
    /// run.
    #[error("Invalid hexadecimal integer.")]
    #[diagnostic(code(knotwork::value::invalid_hex_integer_format))]
    InvalidHexIntegerFormat,

    /// An integer lexeme that fits no supported radix.
    #[error("Invalid integer.")]
    #[diagnostic(code(knotwork::value::invalid_integer_format))]
    InvalidIntegerFormat,

    /// A float lexeme that does not match the decimal grammar.
    #[error("Invalid float.")]
    #[diagnostic(code(knotwork::value::invalid_float_format))]
    InvalidFloatFormat,

    /// An empty lexeme where a term was required.
    #[error("Expected a term.")]
    #[diagnostic(code(knotwork::value::no_term))]
    NoTerm,

    // Encode
    /// A generic keyword value whose name cannot be written after `#`.
    #[error("Invalid keyword.")]
    #[diagnostic(code(knotwork::encode::invalid_keyword))]
    InvalidKeyword,
}

impl KdlErrorKind {
    pub(crate) fn help(&self) -> Option<&'static str> {
        use KdlErrorKind::*;
        match self {
            InvalidMultilineString | InvalidMultilineRawString => Some(
                "Multi-line strings must start with a newline directly after the opening quotes.",
            ),
            IncompleteDedentation => Some(
                "Every line of a multi-line string must start with the whitespace prefix of its final line.",
            ),
            InvalidEndLine => {
                Some("The final line of a multi-line string may contain only literal whitespace.")
            }
            InvalidBareIdentifier | InvalidIdentifier => Some(
                "Identifiers cannot look like numbers, keywords, or reserved words. Did you mean to quote this?",
            ),
            InvalidFloatFormat => Some(
                "Floating point numbers must be base 10, and have numbers after the decimal point.",
            ),
            KeyAnnotationsNotAllowed => Some("Annotations go on the property value: key=(type)value."),
            UnexpectedTokenAfterNodeName => {
                Some("Put whitespace between a node name and its attributes.")
            }
            InvalidKeyword => Some("Keyword names must be valid bare identifiers."),
            _ => None,
        }
    }
}

/// A single-diagnostic failure over `input`.
pub(crate) fn failure_from_kind(
    input: &str,
    kind: KdlErrorKind,
    span: SourceSpan,
    label: Option<&'static str>,
) -> KdlParseFailure {
    let src = Arc::new(String::from(input));
    let help = kind.help();
    KdlParseFailure {
        input: src.clone(),
        diagnostics: vec![KdlDiagnostic {
            input: src,
            span,
            label,
            help,
            severity: miette::Severity::Error,
            kind,
        }],
    }
}
