use knotwork::{tokenize, CommentKind, KdlTokenKind};
use pretty_assertions::assert_eq;

fn kinds(input: &str) -> Vec<KdlTokenKind> {
    tokenize(input)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn a_small_document_tokenizes_fully() {
    use KdlTokenKind::*;
    assert_eq!(
        kinds("(ty)node 1 key=#true {\n}"),
        vec![
            OpenAnnotation,
            Term("ty".into()),
            CloseAnnotation,
            Term("node".into()),
            Space {
                text: " ".into(),
                len: 1
            },
            Term("1".into()),
            Space {
                text: " ".into(),
                len: 1
            },
            Term("key".into()),
            Equal,
            Term("#true".into()),
            Space {
                text: " ".into(),
                len: 1
            },
            OpenBlock,
            Newline,
            CloseBlock,
        ]
    );
}

#[test]
fn equals_like_scalars() {
    for eq in ['=', '\u{FE66}', '\u{FF1D}', '\u{1F7F0}'] {
        let input = format!("a{eq}1");
        let toks = kinds(&input);
        assert_eq!(toks[1], KdlTokenKind::Equal, "for {eq:?}");
    }
}

#[test]
fn unicode_spaces_coalesce() {
    let toks = kinds("a \t\u{00A0}\u{2003}b");
    assert_eq!(toks.len(), 3);
    match &toks[1] {
        KdlTokenKind::Space { text, len } => {
            assert_eq!(text, " \t\u{00A0}\u{2003}");
            assert_eq!(*len, text.len());
        }
        other => panic!("expected space, got {other:?}"),
    }
}

#[test]
fn newline_variants() {
    for nl in ["\n", "\r", "\r\n", "\u{0085}", "\u{000C}", "\u{2028}", "\u{2029}"] {
        let input = format!("a{nl}b");
        let toks = tokenize(&input).unwrap();
        assert_eq!(toks[1].kind, KdlTokenKind::Newline, "for {nl:?}");
        assert_eq!(toks[2].meta.line(), 2, "for {nl:?}");
    }
}

#[test]
fn comment_kinds() {
    assert_eq!(
        kinds("/* one line */"),
        vec![KdlTokenKind::Comment {
            kind: CommentKind::Span,
            text: " one line ".into()
        }]
    );
    assert_eq!(
        kinds("/* two\nlines */"),
        vec![KdlTokenKind::Comment {
            kind: CommentKind::Multiline,
            text: " two\nlines ".into()
        }]
    );
    assert_eq!(
        kinds("// to the end"),
        vec![KdlTokenKind::Comment {
            kind: CommentKind::Line,
            text: " to the end".into()
        }]
    );
}

#[test]
fn term_lexemes() {
    assert_eq!(
        kinds("foo-bar +x .prop -0x10 über"),
        vec![
            KdlTokenKind::Term("foo-bar".into()),
            KdlTokenKind::Space {
                text: " ".into(),
                len: 1
            },
            KdlTokenKind::Term("+x".into()),
            KdlTokenKind::Space {
                text: " ".into(),
                len: 1
            },
            KdlTokenKind::Term(".prop".into()),
            KdlTokenKind::Space {
                text: " ".into(),
                len: 1
            },
            KdlTokenKind::Term("-0x10".into()),
            KdlTokenKind::Space {
                text: " ".into(),
                len: 1
            },
            KdlTokenKind::Term("über".into()),
        ]
    );
}

#[test]
fn raw_string_hash_runs() {
    assert_eq!(
        kinds(r####"###"one "## two"###"####),
        vec![KdlTokenKind::RawString("one \"## two".into())]
    );
}

#[test]
fn crlf_normalizes_inside_multiline_strings() {
    assert_eq!(
        kinds("\"\"\"\r\n  a\r\n  b\r\n  \"\"\""),
        vec![KdlTokenKind::DquoteString("a\nb".into())]
    );
}

#[test]
fn fold_is_its_own_token() {
    assert_eq!(
        kinds("\\\n"),
        vec![KdlTokenKind::Fold, KdlTokenKind::Newline]
    );
}

#[test]
fn spans_cover_the_source() {
    let input = "node \"a b\" /* c */ 0x2a";
    let tokens = tokenize(input).unwrap();
    for tok in &tokens {
        let span = tok.meta.span();
        let slice = &input[span.offset()..span.offset() + span.len()];
        match &tok.kind {
            KdlTokenKind::Term(t) => assert_eq!(slice, t),
            KdlTokenKind::DquoteString(_) => assert_eq!(slice, "\"a b\""),
            KdlTokenKind::Comment { text, .. } => assert_eq!(slice, format!("/*{text}*/")),
            _ => {}
        }
    }
    let last = tokens.last().unwrap();
    assert_eq!(last.meta.span().offset() + last.meta.span().len(), input.len());
}
