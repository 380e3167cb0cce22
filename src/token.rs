use std::fmt::Display;

use miette::SourceSpan;

/// Source position bookkeeping attached to every [`KdlToken`].
///
/// `line` and `col` both start at 1. The line advances on every line break
/// (CR, LF, CRLF as one unit, NEL, LS, PS, FF); the column resets to 1 on a
/// line break and otherwise advances per code point, except that space runs
/// advance it by their UTF-8 byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenMeta {
    pub(crate) line: usize,
    pub(crate) col: usize,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl TokenMeta {
    /// 1-based line number of the token's first code point.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the token's first code point.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Byte span of the token in the original input.
    pub fn span(&self) -> SourceSpan {
        (self.offset..self.offset + self.len).into()
    }
}

/// The comment flavors the tokenizer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// ...` up to (excluding) the next newline.
    Line,
    /// `/* ... */` with no line break inside.
    Span,
    /// `/* ... */` spanning at least one line break.
    Multiline,
}

/// One lexical token of a KDL v2 document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdlTokenKind {
    /// `(` starting a type annotation.
    OpenAnnotation,
    /// `)` closing a type annotation.
    CloseAnnotation,
    /// `{` starting a children block.
    OpenBlock,
    /// `}` closing a children block.
    CloseBlock,
    /// `/-`
    SlashDash,
    /// `//`, `/* ... */`; the text excludes the delimiters.
    Comment {
        /// Which comment flavor this is.
        kind: CommentKind,
        /// Comment text without the delimiters.
        text: String,
    },
    /// A quoted string, fully unescaped and (if multi-line) dedented.
    DquoteString(String),
    /// A raw string, fully (if multi-line) dedented.
    RawString(String),
    /// A coalesced run of space-like code points.
    Space {
        /// The run as it appeared in the source.
        text: String,
        /// Byte length of the run; columns advance by this amount.
        len: usize,
    },
    /// One line break (CRLF counts as a single break).
    Newline,
    /// `=` or any other equals-like code point.
    Equal,
    /// `;`
    Semicolon,
    /// `\` line continuation outside a string.
    Fold,
    /// A bare lexeme: identifier, number, or `#`-keyword.
    Term(String),
}

impl KdlTokenKind {
    /// Whether this token can produce a value (or node name).
    pub(crate) fn is_value_bearing(&self) -> bool {
        matches!(
            self,
            KdlTokenKind::Term(_) | KdlTokenKind::DquoteString(_) | KdlTokenKind::RawString(_)
        )
    }
}

/// A token plus its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdlToken {
    /// What was scanned.
    pub kind: KdlTokenKind,
    /// Where it was scanned.
    pub meta: TokenMeta,
}

impl Display for KdlTokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use KdlTokenKind::*;
        match self {
            OpenAnnotation => write!(f, "'('"),
            CloseAnnotation => write!(f, "')'"),
            OpenBlock => write!(f, "'{{'"),
            CloseBlock => write!(f, "'}}'"),
            SlashDash => write!(f, "'/-'"),
            Comment { .. } => write!(f, "comment"),
            DquoteString(_) => write!(f, "string"),
            RawString(_) => write!(f, "raw string"),
            Space { .. } => write!(f, "space"),
            Newline => write!(f, "newline"),
            Equal => write!(f, "'='"),
            Semicolon => write!(f, "';'"),
            Fold => write!(f, "line continuation"),
            Term(t) => write!(f, "'{t}'"),
        }
    }
}
