use winnow::{
    combinator::alt,
    error::{ErrMode, ErrorKind, ParserError},
    prelude::*,
    stream::{AsChar, Stream},
    token::take_while,
};

use crate::{
    charset,
    error::{failure_from_kind, KdlErrorKind, KdlParseFailure},
    token::{CommentKind, KdlToken, KdlTokenKind, TokenMeta},
};

/// Tokenizes a full KDL v2 document.
///
/// A leading byte-order mark is consumed before anything else. The returned
/// stream contains every lexical token, including whitespace, newlines, and
/// comments; the parser decides which of those carry meaning. The first
/// lexical error aborts the scan.
pub fn tokenize(input: &str) -> Result<Vec<KdlToken>, KdlParseFailure> {
    let mut scanner = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        match scanner.next_token() {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => return Ok(tokens),
            Err(e) => {
                let end = e.end.max(e.start).min(input.len());
                let start = e.start.min(end);
                return Err(failure_from_kind(input, e.kind, (start..end).into(), e.label));
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct ScanFailure {
    pub(crate) kind: KdlErrorKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) label: Option<&'static str>,
}

/// Lexical scanner over a UTF-8 blob, one token per step, with line/column
/// bookkeeping.
pub(crate) struct Tokenizer<'a> {
    src: &'a str,
    rest: &'a str,
    line: usize,
    col: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        let mut this = Tokenizer {
            src,
            rest: src,
            line: 1,
            col: 1,
        };
        if let Some(stripped) = this.rest.strip_prefix('\u{FEFF}') {
            this.rest = stripped;
            this.col += 1;
        }
        this
    }

    fn offset(&self) -> usize {
        self.src.len() - self.rest.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest.chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if let Some(stripped) = self.rest.strip_prefix(prefix) {
            self.rest = stripped;
            true
        } else {
            false
        }
    }

    fn fail(&self, start: usize, kind: KdlErrorKind) -> ScanFailure {
        ScanFailure {
            kind,
            start,
            end: self.offset(),
            label: None,
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Option<KdlToken>, ScanFailure> {
        let start = self.offset();
        let line = self.line;
        let col = self.col;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let kind = match c {
            '(' => {
                self.bump();
                KdlTokenKind::OpenAnnotation
            }
            ')' => {
                self.bump();
                KdlTokenKind::CloseAnnotation
            }
            '{' => {
                self.bump();
                KdlTokenKind::OpenBlock
            }
            '}' => {
                self.bump();
                KdlTokenKind::CloseBlock
            }
            ';' => {
                self.bump();
                KdlTokenKind::Semicolon
            }
            '\\' => {
                self.bump();
                KdlTokenKind::Fold
            }
            '/' => self.scan_slash(start)?,
            '"' => self.scan_dquote_string(start)?,
            '#' => self.scan_hash(start)?,
            c if charset::is_equals_sign(c) => {
                self.bump();
                KdlTokenKind::Equal
            }
            c if charset::is_unicode_space(c) => self.scan_space(),
            c if charset::is_newline(c) => {
                self.scan_newline();
                KdlTokenKind::Newline
            }
            c if charset::is_disallowed(c) => {
                self.bump();
                return Err(self.fail(start, KdlErrorKind::BadTokenize));
            }
            c if charset::is_identifier_forbidden(c) => {
                self.bump();
                return Err(self.fail(start, KdlErrorKind::UnexpectedCharacter));
            }
            _ => self.scan_term(start)?,
        };

        let end = self.offset();
        let meta = TokenMeta {
            line,
            col,
            offset: start,
            len: end - start,
        };
        let src = self.src;
        self.advance_position(&src[start..end], &kind);
        Ok(Some(KdlToken { kind, meta }))
    }

    /// Position accounting: `Space` advances the column by its byte length,
    /// `Newline` resets it regardless of the newline's width, everything
    /// else advances per code point with embedded line breaks handled.
    fn advance_position(&mut self, consumed: &str, kind: &KdlTokenKind) {
        match kind {
            KdlTokenKind::Space { len, .. } => {
                self.col += *len;
            }
            KdlTokenKind::Newline => {
                self.line += 1;
                self.col = 1;
            }
            _ => {
                let mut chars = consumed.chars().peekable();
                while let Some(c) = chars.next() {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                        self.line += 1;
                        self.col = 1;
                    } else if charset::is_newline(c) {
                        self.line += 1;
                        self.col = 1;
                    } else {
                        self.col += 1;
                    }
                }
            }
        }
    }

    fn scan_space(&mut self) -> KdlTokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !charset::is_unicode_space(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        let len = text.len();
        KdlTokenKind::Space { text, len }
    }

    fn scan_newline(&mut self) {
        if !self.eat("\r\n") {
            self.bump();
        }
    }

    fn scan_slash(&mut self, start: usize) -> Result<KdlTokenKind, ScanFailure> {
        if self.eat("/-") {
            return Ok(KdlTokenKind::SlashDash);
        }
        if self.eat("//") {
            let mut text = String::new();
            while let Some(c) = self.peek() {
                if charset::is_newline(c) {
                    break;
                }
                text.push(c);
                self.bump();
            }
            return Ok(KdlTokenKind::Comment {
                kind: CommentKind::Line,
                text,
            });
        }
        if self.eat("/*") {
            return self.scan_block_comment(start);
        }
        self.bump();
        Err(self.fail(start, KdlErrorKind::UnexpectedCharacter))
    }

    /// `/* ... */` comments nest; any line break inside upgrades the kind
    /// from `Span` to `Multiline`.
    fn scan_block_comment(&mut self, start: usize) -> Result<KdlTokenKind, ScanFailure> {
        let mut depth = 1usize;
        let mut text = String::new();
        let mut multiline = false;
        loop {
            if self.eat("*/") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                text.push_str("*/");
                continue;
            }
            if self.eat("/*") {
                depth += 1;
                text.push_str("/*");
                continue;
            }
            match self.bump() {
                Some(c) => {
                    if charset::is_newline(c) {
                        multiline = true;
                    }
                    text.push(c);
                }
                None => return Err(self.fail(start, KdlErrorKind::PrematureTermination)),
            }
        }
        Ok(KdlTokenKind::Comment {
            kind: if multiline {
                CommentKind::Multiline
            } else {
                CommentKind::Span
            },
            text,
        })
    }

    fn scan_term(&mut self, start: usize) -> Result<KdlTokenKind, ScanFailure> {
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if c == '#' {
                self.bump();
                return Err(self.fail(start, KdlErrorKind::InvalidIdentifier));
            }
            if charset::is_identifier_forbidden(c) {
                break;
            }
            lexeme.push(c);
            self.bump();
        }
        Ok(KdlTokenKind::Term(lexeme))
    }

    /// `#` runs open raw strings when a `"` follows; a single `#` followed
    /// by anything else starts a keyword term like `#true`.
    fn scan_hash(&mut self, start: usize) -> Result<KdlTokenKind, ScanFailure> {
        let mut hashes = 0usize;
        while self.peek() == Some('#') {
            self.bump();
            hashes += 1;
        }
        if self.peek() == Some('"') {
            return self.scan_raw_string(start, hashes);
        }
        if hashes > 1 {
            return Err(self.fail(start, KdlErrorKind::UnexpectedCharacter));
        }
        let mut lexeme = String::from("#");
        while let Some(c) = self.peek() {
            if c == '#' {
                self.bump();
                return Err(self.fail(start, KdlErrorKind::InvalidIdentifier));
            }
            if charset::is_identifier_forbidden(c) {
                break;
            }
            lexeme.push(c);
            self.bump();
        }
        if lexeme.len() == 1 {
            return Err(self.fail(start, KdlErrorKind::InvalidIdentifier));
        }
        Ok(KdlTokenKind::Term(lexeme))
    }

    fn scan_dquote_string(&mut self, start: usize) -> Result<KdlTokenKind, ScanFailure> {
        if self.eat("\"\"\"") {
            if !self.eat_newline() {
                return Err(self.fail(start, KdlErrorKind::InvalidMultilineString));
            }
            let mut items: Vec<(char, bool)> = Vec::new();
            loop {
                if self.eat("\"\"\"") {
                    break;
                }
                match self.peek() {
                    None => return Err(self.fail(start, KdlErrorKind::UnterminatedDquoteString)),
                    Some('\\') => {
                        if let Some(c) = self.scan_escape(start)? {
                            items.push((c, true));
                        }
                    }
                    Some(c) if charset::is_disallowed(c) || charset::is_bom(c) => {
                        self.bump();
                        return Err(self.fail(start, KdlErrorKind::DisallowedChar));
                    }
                    Some('\r') if self.peek_second() == Some('\n') => {
                        self.bump();
                        self.bump();
                        items.push(('\n', false));
                    }
                    Some(c) => {
                        self.bump();
                        items.push((c, false));
                    }
                }
            }
            let text = dedent_multiline(items).map_err(|kind| self.fail(start, kind))?;
            return Ok(KdlTokenKind::DquoteString(text));
        }

        self.bump();
        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Err(self.fail(start, KdlErrorKind::UnterminatedDquoteString)),
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    if let Some(c) = self.scan_escape(start)? {
                        text.push(c);
                    }
                }
                Some(c) if charset::is_newline(c) => {
                    self.bump();
                    return Err(
                        self.fail(start, KdlErrorKind::UnexpectedNewlineInSingleLineString)
                    );
                }
                Some(c) if charset::is_disallowed(c) || charset::is_bom(c) => {
                    self.bump();
                    return Err(self.fail(start, KdlErrorKind::DisallowedChar));
                }
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
            }
        }
        Ok(KdlTokenKind::DquoteString(text))
    }

    fn scan_raw_string(&mut self, start: usize, hashes: usize) -> Result<KdlTokenKind, ScanFailure> {
        if self.eat("\"\"\"") {
            if !self.eat_newline() {
                return Err(self.fail(start, KdlErrorKind::InvalidMultilineRawString));
            }
            let mut items: Vec<(char, bool)> = Vec::new();
            loop {
                if self.raw_terminator_ahead("\"\"\"", hashes) {
                    self.eat("\"\"\"");
                    for _ in 0..hashes {
                        self.bump();
                    }
                    break;
                }
                match self.peek() {
                    None => return Err(self.fail(start, KdlErrorKind::UnterminatedRawString)),
                    Some(c) if charset::is_disallowed(c) || charset::is_bom(c) => {
                        self.bump();
                        return Err(self.fail(start, KdlErrorKind::InvalidRawStringBody));
                    }
                    Some('\r') if self.peek_second() == Some('\n') => {
                        self.bump();
                        self.bump();
                        items.push(('\n', false));
                    }
                    Some(c) => {
                        self.bump();
                        items.push((c, false));
                    }
                }
            }
            let text = dedent_multiline(items).map_err(|kind| self.fail(start, kind))?;
            return Ok(KdlTokenKind::RawString(text));
        }

        self.bump();
        let mut text = String::new();
        loop {
            if self.raw_terminator_ahead("\"", hashes) {
                self.bump();
                for _ in 0..hashes {
                    self.bump();
                }
                break;
            }
            match self.peek() {
                None => return Err(self.fail(start, KdlErrorKind::UnterminatedRawString)),
                Some(c) if charset::is_newline(c) => {
                    self.bump();
                    return Err(
                        self.fail(start, KdlErrorKind::UnexpectedNewlineInSingleLineString)
                    );
                }
                Some(c) if charset::is_disallowed(c) || charset::is_bom(c) => {
                    self.bump();
                    return Err(self.fail(start, KdlErrorKind::InvalidRawStringBody));
                }
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
            }
        }
        Ok(KdlTokenKind::RawString(text))
    }

    /// A raw string closes at `quotes` followed by exactly the opener's
    /// hash count; a longer hash run is still string body.
    fn raw_terminator_ahead(&self, quotes: &str, hashes: usize) -> bool {
        let Some(rest) = self.rest.strip_prefix(quotes) else {
            return false;
        };
        let mut chars = rest.chars();
        for _ in 0..hashes {
            if chars.next() != Some('#') {
                return false;
            }
        }
        chars.next() != Some('#')
    }

    fn eat_newline(&mut self) -> bool {
        if self.eat("\r\n") {
            return true;
        }
        match self.peek() {
            Some(c) if charset::is_newline(c) => {
                self.bump();
                true
            }
            _ => false,
        }
    }

    fn scan_escape(&mut self, start: usize) -> Result<Option<char>, ScanFailure> {
        let mut input = self.rest;
        let res = escaped_char.parse_next(&mut input);
        match res {
            Ok(c) => {
                self.rest = input;
                Ok(c)
            }
            Err(ErrMode::Cut(e)) | Err(ErrMode::Backtrack(e)) => {
                self.rest = input;
                Err(self.fail(
                    start,
                    e.kind.unwrap_or(KdlErrorKind::InvalidDquoteStringEscape),
                ))
            }
            Err(ErrMode::Incomplete(_)) => {
                Err(self.fail(start, KdlErrorKind::InvalidDquoteStringEscape))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub(crate) kind: Option<KdlErrorKind>,
}

impl<I: Stream> ParserError<I> for ScanError {
    fn from_error_kind(_input: &I, _kind: ErrorKind) -> Self {
        Self { kind: None }
    }

    fn append(self, _input: &I, _token_start: &<I as Stream>::Checkpoint, _kind: ErrorKind) -> Self {
        self
    }
}

type SResult<T> = PResult<T, ScanError>;

/// ```text
/// escape := ["\\bfnrtsv] | 'u{' hex-digit{1, 6} '}' | (unicode-space | newline)+
/// hex-digit := [0-9a-fA-F]
/// ```
///
/// Returns `None` for a whitespace escape, which consumes and discards the
/// whitespace run.
fn escaped_char(input: &mut &str) -> SResult<Option<char>> {
    '\\'.parse_next(input)?;
    alt((
        '"'.value(Some('"')),
        '\\'.value(Some('\\')),
        'b'.value(Some('\u{0008}')),
        'f'.value(Some('\u{000C}')),
        'n'.value(Some('\n')),
        'r'.value(Some('\r')),
        't'.value(Some('\t')),
        's'.value(Some(' ')),
        'v'.value(Some('\u{000B}')),
        unicode_escape.map(Some),
        take_while(1.., |c| charset::is_unicode_space(c) || charset::is_newline(c)).value(None),
        bad_escape,
    ))
    .parse_next(input)
}

fn unicode_escape(input: &mut &str) -> SResult<char> {
    "u{".parse_next(input)?;
    let hex = take_while(1..=6, AsChar::is_hex_digit)
        .parse_next(input)
        .map_err(|_: ErrMode<ScanError>| {
            ErrMode::Cut(ScanError {
                kind: Some(KdlErrorKind::InvalidDquoteStringEscape),
            })
        })?;
    '}'.parse_next(input).map_err(|_: ErrMode<ScanError>| {
        ErrMode::Cut(ScanError {
            kind: Some(KdlErrorKind::InvalidDquoteStringEscape),
        })
    })?;
    let scalar = u32::from_str_radix(hex, 16).expect("validated to be a hex string");
    char::from_u32(scalar).ok_or_else(|| {
        ErrMode::Cut(ScanError {
            kind: Some(KdlErrorKind::InvalidUnicodeScalar),
        })
    })
}

fn bad_escape(_input: &mut &str) -> SResult<Option<char>> {
    Err(ErrMode::Cut(ScanError {
        kind: Some(KdlErrorKind::InvalidDquoteStringEscape),
    }))
}

/// Multi-line string post-processing over escape-flagged characters: the
/// final line must be literal whitespace and defines the indent prefix,
/// which is stripped from every preceding line. Lines of pure literal
/// whitespace dedent to empty lines. Lines are rejoined with LF.
fn dedent_multiline(items: Vec<(char, bool)>) -> Result<String, KdlErrorKind> {
    let mut lines: Vec<Vec<(char, bool)>> = vec![Vec::new()];
    for (c, escaped) in items {
        if !escaped && charset::is_newline(c) {
            lines.push(Vec::new());
        } else {
            lines.last_mut().expect("never empty").push((c, escaped));
        }
    }
    let last = lines.last().expect("never empty");
    if last.iter().any(|&(_, escaped)| escaped) {
        return Err(KdlErrorKind::InvalidEndLine);
    }
    if last.iter().any(|&(c, _)| !charset::is_unicode_space(c)) {
        return Err(KdlErrorKind::InvalidEndLine);
    }
    let indent: Vec<char> = last.iter().map(|&(c, _)| c).collect();

    let mut out: Vec<String> = Vec::new();
    for line in &lines[..lines.len() - 1] {
        if line
            .iter()
            .all(|&(c, escaped)| !escaped && charset::is_unicode_space(c))
        {
            out.push(String::new());
            continue;
        }
        if line.len() < indent.len() {
            return Err(KdlErrorKind::IncompleteDedentation);
        }
        for (i, &ic) in indent.iter().enumerate() {
            let (c, escaped) = line[i];
            if escaped || c != ic {
                return Err(KdlErrorKind::IncompleteDedentation);
            }
        }
        out.push(line[indent.len()..].iter().map(|&(c, _)| c).collect());
    }
    Ok(out.join("\n"))
}
