use miette::SourceSpan;

use crate::{
    charset,
    entry::{survivor_mask, KdlEntry},
    error::{failure_from_kind, KdlErrorKind, KdlParseFailure},
    token::{KdlToken, KdlTokenKind},
    tokenizer::tokenize,
    value::{decode_term, KdlValue},
    KdlDocument, KdlNode,
};

/// Decodes a KDL v2 blob into a document plus any unconsumed trailing
/// tokens.
///
/// The trailing tokens are non-empty only when a stray `}` ends the
/// top-level node run early; everything from that token on is handed back
/// untouched.
pub fn decode(input: &str) -> Result<(KdlDocument, Vec<KdlToken>), KdlParseFailure> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(input, &tokens);
    let nodes = parser.parse_nodes(0)?;
    let rest = tokens[parser.pos..].to_vec();
    Ok((KdlDocument { nodes }, rest))
}

/// Like [`decode`], but any unconsumed trailing tokens are an error.
pub fn decode_strict(input: &str) -> Result<KdlDocument, KdlParseFailure> {
    let (doc, rest) = decode(input)?;
    if let Some(tok) = rest.first() {
        return Err(failure_from_kind(
            input,
            KdlErrorKind::IncompleteTokenize,
            tok.meta.span(),
            Some("unconsumed input"),
        ));
    }
    Ok(doc)
}

/// An item pushed into a node-run accumulator before slashdash resolution.
enum DocItem {
    Node(KdlNode),
    SlashDash(SourceSpan),
    RawBlock(SourceSpan),
}

/// An item pushed into a node's attribute accumulator before slashdash
/// resolution.
enum AttrItem {
    SlashDash(SourceSpan),
    Annotation(String, SourceSpan),
    Arg(KdlValue),
    Prop(KdlValue, KdlValue),
    Children(Vec<KdlNode>, SourceSpan),
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [KdlToken],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, tokens: &'a [KdlToken]) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a KdlToken> {
        self.tokens.get(self.pos)
    }

    fn eof_span(&self) -> SourceSpan {
        (self.src.len()..self.src.len()).into()
    }

    fn err(&self, kind: KdlErrorKind, span: SourceSpan) -> KdlParseFailure {
        failure_from_kind(self.src, kind, span, None)
    }

    /// `Default(depth)`: collects a run of nodes until end of input or a
    /// closing brace. At `depth > 0` the closing brace is consumed; at the
    /// top level it is left for the caller to hand back as unconsumed
    /// input.
    fn parse_nodes(&mut self, depth: usize) -> Result<Vec<KdlNode>, KdlParseFailure> {
        let mut items: Vec<DocItem> = Vec::new();
        let mut pending: Vec<(String, SourceSpan)> = Vec::new();
        loop {
            let Some(tok) = self.peek() else {
                if depth > 0 {
                    return Err(self.err(KdlErrorKind::UnexpectedEndOfDocument, self.eof_span()));
                }
                break;
            };
            let span = tok.meta.span();
            match &tok.kind {
                KdlTokenKind::Space { .. }
                | KdlTokenKind::Newline
                | KdlTokenKind::Semicolon
                | KdlTokenKind::Comment { .. } => {
                    self.pos += 1;
                }
                KdlTokenKind::Fold => {
                    self.pos += 1;
                    self.consume_fold_newline()?;
                }
                KdlTokenKind::SlashDash => {
                    if !pending.is_empty() {
                        return Err(self.err(KdlErrorKind::UnexpectedSlashdashOrigin, span));
                    }
                    self.pos += 1;
                    items.push(DocItem::SlashDash(span));
                }
                KdlTokenKind::OpenAnnotation => {
                    self.pos += 1;
                    pending.push(self.parse_annotation()?);
                }
                KdlTokenKind::Term(name) => {
                    if !charset::is_valid_identifier(name) {
                        return Err(self.err(KdlErrorKind::InvalidIdentifier, span));
                    }
                    let name = name.clone();
                    self.pos += 1;
                    let annotations = pending.drain(..).map(|(s, _)| s).collect();
                    items.push(DocItem::Node(self.parse_node(name, annotations, depth)?));
                }
                KdlTokenKind::DquoteString(name) | KdlTokenKind::RawString(name) => {
                    if name.is_empty() {
                        return Err(self.err(KdlErrorKind::InvalidIdentifier, span));
                    }
                    let name = name.clone();
                    self.pos += 1;
                    let annotations = pending.drain(..).map(|(s, _)| s).collect();
                    items.push(DocItem::Node(self.parse_node(name, annotations, depth)?));
                }
                KdlTokenKind::OpenBlock => {
                    self.pos += 1;
                    // The block's contents are parsed for validity, then
                    // dropped; only a slashdash can make the marker legal.
                    self.parse_nodes(depth + 1)?;
                    items.push(DocItem::RawBlock(span));
                }
                KdlTokenKind::CloseBlock => {
                    if depth > 0 {
                        self.pos += 1;
                    }
                    break;
                }
                KdlTokenKind::CloseAnnotation | KdlTokenKind::Equal => {
                    return Err(self.err(KdlErrorKind::InvalidParseState, span));
                }
            }
        }
        if let Some((_, span)) = pending.first() {
            return Err(self.err(KdlErrorKind::UnresolvedAnnotation, *span));
        }
        self.finalize_nodes(items)
    }

    /// Slashdash resolution over a finished node run: each marker discards
    /// the single following item.
    fn finalize_nodes(&self, items: Vec<DocItem>) -> Result<Vec<KdlNode>, KdlParseFailure> {
        let mut nodes = Vec::new();
        let mut iter = items.into_iter();
        while let Some(item) = iter.next() {
            match item {
                DocItem::SlashDash(span) => match iter.next() {
                    Some(DocItem::Node(_)) | Some(DocItem::RawBlock(_)) => {}
                    Some(DocItem::SlashDash(span)) => {
                        return Err(self.err(KdlErrorKind::UnexpectedSlashdashTarget, span));
                    }
                    None => return Err(self.err(KdlErrorKind::SlashdashNothing, span)),
                },
                DocItem::Node(node) => nodes.push(node),
                DocItem::RawBlock(span) => {
                    return Err(self.err(KdlErrorKind::RawBlockInDocument, span));
                }
            }
        }
        Ok(nodes)
    }

    /// `Node(depth, spaces_since_name, sub_state)`: collects attributes and
    /// children until a terminator, then resolves slashdashes and
    /// de-duplicates properties.
    fn parse_node(
        &mut self,
        name: String,
        annotations: Vec<String>,
        depth: usize,
    ) -> Result<KdlNode, KdlParseFailure> {
        let mut attrs: Vec<AttrItem> = Vec::new();
        let mut spaces = 0usize;
        let mut accepting = true;
        let mut slashdash_pending = false;
        loop {
            let Some(tok) = self.peek() else { break };
            let span = tok.meta.span();
            match &tok.kind {
                KdlTokenKind::Space { .. } => {
                    spaces += 1;
                    self.pos += 1;
                }
                KdlTokenKind::Comment { .. } => {
                    self.pos += 1;
                }
                KdlTokenKind::Fold => {
                    self.pos += 1;
                    self.consume_fold_newline()?;
                    spaces += 1;
                }
                KdlTokenKind::Newline => {
                    self.pos += 1;
                    if slashdash_pending {
                        spaces += 1;
                    } else {
                        break;
                    }
                }
                KdlTokenKind::Semicolon => {
                    if slashdash_pending {
                        return Err(self.err(KdlErrorKind::UnexpectedSlashdashStopToken, span));
                    }
                    self.pos += 1;
                    break;
                }
                KdlTokenKind::CloseBlock => {
                    if slashdash_pending {
                        return Err(self.err(KdlErrorKind::UnexpectedSlashdashStopToken, span));
                    }
                    // Left for the enclosing node run to consume.
                    break;
                }
                KdlTokenKind::SlashDash => {
                    if slashdash_pending {
                        return Err(self.err(KdlErrorKind::UnexpectedSlashdashStopToken, span));
                    }
                    self.pos += 1;
                    attrs.push(AttrItem::SlashDash(span));
                    slashdash_pending = true;
                }
                KdlTokenKind::OpenAnnotation => {
                    if spaces == 0 {
                        return Err(self.err(KdlErrorKind::UnexpectedTokenAfterNodeName, span));
                    }
                    if !accepting {
                        return Err(self.err(KdlErrorKind::NodeNotAcceptingAttributesNow, span));
                    }
                    self.pos += 1;
                    let (annotation, span) = self.parse_annotation()?;
                    attrs.push(AttrItem::Annotation(annotation, span));
                    slashdash_pending = false;
                }
                KdlTokenKind::Term(_)
                | KdlTokenKind::DquoteString(_)
                | KdlTokenKind::RawString(_) => {
                    if spaces == 0 {
                        return Err(self.err(KdlErrorKind::UnexpectedTokenAfterNodeName, span));
                    }
                    if !accepting {
                        return Err(self.err(KdlErrorKind::NodeNotAcceptingAttributesNow, span));
                    }
                    slashdash_pending = false;
                    let key = self.decode_value_token()?;
                    let attr = self.parse_attribute(key, span, &mut attrs)?;
                    attrs.push(attr);
                    spaces = 0;
                }
                KdlTokenKind::OpenBlock => {
                    if spaces == 0 {
                        return Err(self.err(KdlErrorKind::UnexpectedTokenAfterNodeName, span));
                    }
                    self.pos += 1;
                    let children = self.parse_nodes(depth + 1)?;
                    let discarded = slashdash_pending;
                    slashdash_pending = false;
                    attrs.push(AttrItem::Children(children, span));
                    if !discarded {
                        accepting = false;
                    }
                    spaces = 0;
                }
                KdlTokenKind::Equal => {
                    return Err(self.err(KdlErrorKind::InvalidAttributeToken, span));
                }
                KdlTokenKind::CloseAnnotation => {
                    return Err(self.err(KdlErrorKind::InvalidAnnotationParseState, span));
                }
            }
        }
        self.finalize_node(name, annotations, attrs)
    }

    /// A value-bearing token has been decoded to `key`; decide whether it
    /// is a positional argument or a property key.
    fn parse_attribute(
        &mut self,
        mut key: KdlValue,
        key_span: SourceSpan,
        attrs: &mut Vec<AttrItem>,
    ) -> Result<AttrItem, KdlParseFailure> {
        // A pending annotation directly below the accumulator top belongs
        // to this value.
        let annotation = if matches!(attrs.last(), Some(AttrItem::Annotation(..))) {
            match attrs.pop() {
                Some(AttrItem::Annotation(s, _)) => Some(s),
                _ => None,
            }
        } else {
            None
        };

        if self.equal_follows() {
            self.consume_to_equal();
            if annotation.is_some() {
                return Err(self.err(KdlErrorKind::KeyAnnotationsNotAllowed, key_span));
            }
            if !key.is_ident() {
                return Err(self.err(KdlErrorKind::InvalidAttributeToken, key_span));
            }
            self.skip_inline()?;
            let value_annotation = match self.peek() {
                Some(tok) if tok.kind == KdlTokenKind::OpenAnnotation => {
                    self.pos += 1;
                    let ann = self.parse_annotation()?;
                    self.skip_inline()?;
                    if let Some(tok) = self.peek() {
                        if tok.kind == KdlTokenKind::OpenAnnotation {
                            return Err(self.err(
                                KdlErrorKind::InvalidAttributeValueAnnotation,
                                tok.meta.span(),
                            ));
                        }
                    }
                    Some(ann.0)
                }
                _ => None,
            };
            let value_span = match self.peek() {
                Some(tok) => tok.meta.span(),
                None => {
                    return Err(self.err(KdlErrorKind::UnexpectedEndOfDocument, self.eof_span()))
                }
            };
            match self.peek().map(|t| &t.kind) {
                Some(kind) if kind.is_value_bearing() => {}
                _ => return Err(self.err(KdlErrorKind::InvalidAttributeValue, value_span)),
            }
            let mut value = self.decode_value_token()?;
            if let Some(ident) = value.as_ident() {
                if !charset::is_valid_identifier(ident) {
                    return Err(self.err(KdlErrorKind::InvalidBareIdentifier, value_span));
                }
            }
            if let Some(ann) = value_annotation {
                value.annotations.push(ann);
            }
            Ok(AttrItem::Prop(key, value))
        } else {
            if let Some(ident) = key.as_ident() {
                if !charset::is_valid_identifier(ident) {
                    return Err(self.err(KdlErrorKind::InvalidBareIdentifier, key_span));
                }
            }
            if let Some(ann) = annotation {
                key.annotations.push(ann);
            }
            Ok(AttrItem::Arg(key))
        }
    }

    /// Resolves slashdashes, checks leftovers, de-duplicates properties,
    /// and emits the node.
    fn finalize_node(
        &self,
        name: String,
        annotations: Vec<String>,
        attrs: Vec<AttrItem>,
    ) -> Result<KdlNode, KdlParseFailure> {
        let mut entries: Vec<KdlEntry> = Vec::new();
        let mut children: Option<Vec<KdlNode>> = None;
        let mut iter = attrs.into_iter();
        while let Some(item) = iter.next() {
            match item {
                AttrItem::SlashDash(span) => match iter.next() {
                    Some(AttrItem::Arg(_))
                    | Some(AttrItem::Prop(..))
                    | Some(AttrItem::Children(..)) => {}
                    Some(AttrItem::Annotation(_, span)) | Some(AttrItem::SlashDash(span)) => {
                        return Err(self.err(KdlErrorKind::UnexpectedSlashdashTarget, span));
                    }
                    None => return Err(self.err(KdlErrorKind::SlashdashNothing, span)),
                },
                AttrItem::Annotation(_, span) => {
                    return Err(self.err(KdlErrorKind::UnresolvedAnnotation, span));
                }
                AttrItem::Arg(value) => entries.push(KdlEntry::Arg(value)),
                AttrItem::Prop(key, value) => entries.push(KdlEntry::Prop { key, value }),
                AttrItem::Children(nodes, span) => {
                    if children.is_some() {
                        return Err(self.err(KdlErrorKind::InvalidNodeAttributes, span));
                    }
                    children = Some(nodes);
                }
            }
        }
        let mask = survivor_mask(&entries);
        let entries = entries
            .into_iter()
            .zip(mask)
            .filter_map(|(e, keep)| keep.then_some(e))
            .collect();
        Ok(KdlNode {
            name,
            annotations,
            entries,
            children,
        })
    }

    /// `Annotation(depth)`: one value between `(` and `)`, which must carry
    /// a string payload.
    fn parse_annotation(&mut self) -> Result<(String, SourceSpan), KdlParseFailure> {
        self.skip_inline()?;
        let tok = match self.peek() {
            Some(tok) => tok,
            None => return Err(self.err(KdlErrorKind::UnexpectedEndOfDocument, self.eof_span())),
        };
        let span = tok.meta.span();
        let value = match &tok.kind {
            KdlTokenKind::Term(_) | KdlTokenKind::DquoteString(_) | KdlTokenKind::RawString(_) => {
                self.decode_value_token()?
            }
            KdlTokenKind::Newline
            | KdlTokenKind::OpenAnnotation
            | KdlTokenKind::CloseAnnotation => {
                return Err(self.err(KdlErrorKind::InvalidAnnotationParseState, span));
            }
            _ => return Err(self.err(KdlErrorKind::InvalidAnnotation, span)),
        };
        let name = match value.scalar() {
            crate::KdlScalar::Ident(s) | crate::KdlScalar::String(s) => s.clone(),
            _ => return Err(self.err(KdlErrorKind::InvalidAnnotation, span)),
        };
        self.skip_inline()?;
        match self.peek() {
            Some(tok) if tok.kind == KdlTokenKind::CloseAnnotation => {
                self.pos += 1;
                Ok((name, span))
            }
            Some(tok) => Err(self.err(KdlErrorKind::InvalidAnnotationParseState, tok.meta.span())),
            None => Err(self.err(KdlErrorKind::UnexpectedEndOfDocument, self.eof_span())),
        }
    }

    /// Decodes the value-bearing token at the cursor and consumes it.
    fn decode_value_token(&mut self) -> Result<KdlValue, KdlParseFailure> {
        let tok = match self.peek() {
            Some(tok) => tok,
            None => return Err(self.err(KdlErrorKind::UnexpectedEndOfDocument, self.eof_span())),
        };
        let span = tok.meta.span();
        let value = match &tok.kind {
            KdlTokenKind::Term(lexeme) => {
                decode_term(lexeme).map_err(|kind| self.err(kind, span))?
            }
            KdlTokenKind::DquoteString(s) | KdlTokenKind::RawString(s) => {
                KdlValue::from(s.as_str())
            }
            _ => return Err(self.err(KdlErrorKind::InvalidAttributeToken, span)),
        };
        self.pos += 1;
        Ok(value)
    }

    /// After a fold, exactly one newline must follow, possibly behind
    /// spaces and comments; end of input counts.
    fn consume_fold_newline(&mut self) -> Result<(), KdlParseFailure> {
        loop {
            match self.peek().map(|t| (&t.kind, t.meta.span())) {
                Some((KdlTokenKind::Space { .. }, _)) | Some((KdlTokenKind::Comment { .. }, _)) => {
                    self.pos += 1;
                }
                Some((KdlTokenKind::Newline, _)) => {
                    self.pos += 1;
                    return Ok(());
                }
                Some((_, span)) => {
                    return Err(self.err(KdlErrorKind::InvalidParseState, span));
                }
                None => return Ok(()),
            }
        }
    }

    /// Skips spaces, comments, and folds without crossing a newline.
    fn skip_inline(&mut self) -> Result<(), KdlParseFailure> {
        loop {
            match self.peek().map(|t| &t.kind) {
                Some(KdlTokenKind::Space { .. }) | Some(KdlTokenKind::Comment { .. }) => {
                    self.pos += 1;
                }
                Some(KdlTokenKind::Fold) => {
                    self.pos += 1;
                    self.consume_fold_newline()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Whether an `=` lies ahead behind only spaces and comments.
    fn equal_follows(&self) -> bool {
        let mut i = self.pos;
        while let Some(tok) = self.tokens.get(i) {
            match tok.kind {
                KdlTokenKind::Space { .. } | KdlTokenKind::Comment { .. } => i += 1,
                KdlTokenKind::Equal => return true,
                _ => return false,
            }
        }
        false
    }

    fn consume_to_equal(&mut self) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                KdlTokenKind::Space { .. } | KdlTokenKind::Comment { .. } => self.pos += 1,
                KdlTokenKind::Equal => {
                    self.pos += 1;
                    return;
                }
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind_of(input: &str) -> KdlErrorKind {
        decode(input)
            .expect_err("decode should have failed")
            .kind()
            .expect("failure with no diagnostics")
            .clone()
    }

    #[test]
    fn bare_node() {
        let (doc, rest) = decode("node").unwrap();
        assert!(rest.is_empty());
        assert_eq!(doc.nodes().len(), 1);
        assert_eq!(doc.nodes()[0].name(), "node");
        assert_eq!(doc.nodes()[0].children(), None);
    }

    #[test]
    fn quoted_node_name() {
        let (doc, _) = decode("\"two words\" 1").unwrap();
        assert_eq!(doc.nodes()[0].name(), "two words");
    }

    #[test]
    fn reserved_node_name() {
        assert_eq!(kind_of("true"), KdlErrorKind::InvalidIdentifier);
    }

    #[test]
    fn keyword_value() {
        let (doc, _) = decode("node #true").unwrap();
        assert_eq!(doc.nodes()[0].get(0), Some(&true.into()));
    }

    #[test]
    fn bare_value_must_be_identifier() {
        assert_eq!(kind_of("node true"), KdlErrorKind::InvalidBareIdentifier);
    }

    #[test]
    fn no_space_before_attribute() {
        assert_eq!(
            kind_of("node\"arg\""),
            KdlErrorKind::UnexpectedTokenAfterNodeName
        );
    }

    #[test]
    fn semicolon_separates_nodes() {
        let (doc, _) = decode("a; b; c").unwrap();
        let names: Vec<_> = doc.nodes().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn fold_joins_lines() {
        let (doc, _) = decode("node 1 \\\n  2").unwrap();
        assert_eq!(doc.nodes()[0].entries().len(), 2);
        assert_eq!(kind_of("node \\ 2"), KdlErrorKind::InvalidParseState);
    }

    #[test]
    fn annotations() {
        let (doc, _) = decode("(ty)node (u8)1 key=(f32)2.5").unwrap();
        let node = &doc.nodes()[0];
        assert_eq!(node.annotations(), ["ty"]);
        assert_eq!(node.get(0).unwrap().annotations(), ["u8"]);
        assert_eq!(node.get_prop("key").unwrap().annotations(), ["f32"]);
    }

    #[test]
    fn key_annotations_rejected() {
        assert_eq!(
            kind_of("node (a)key=1"),
            KdlErrorKind::KeyAnnotationsNotAllowed
        );
    }

    #[test]
    fn non_ident_keys_rejected() {
        assert_eq!(kind_of("node 1=2"), KdlErrorKind::InvalidAttributeToken);
        assert_eq!(
            kind_of("node \"k\"=2"),
            KdlErrorKind::InvalidAttributeToken
        );
    }

    #[test]
    fn dangling_annotation() {
        assert_eq!(kind_of("(ty)"), KdlErrorKind::UnresolvedAnnotation);
        assert_eq!(kind_of("(1)node"), KdlErrorKind::InvalidAnnotation);
        assert_eq!(kind_of("((a))node"), KdlErrorKind::InvalidAnnotationParseState);
    }

    #[test]
    fn slashdash_node() {
        let (doc, _) = decode("/- gone\nkept").unwrap();
        assert_eq!(doc.nodes().len(), 1);
        assert_eq!(doc.nodes()[0].name(), "kept");
    }

    #[test]
    fn slashdash_attr_and_block() {
        let (doc, _) = decode("node 1 /- 2 3 /- {\n  gone\n} {\n  kept\n}").unwrap();
        let node = &doc.nodes()[0];
        assert_eq!(node.entries().len(), 2);
        let children = node.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), "kept");
    }

    #[test]
    fn slashdash_errors() {
        assert_eq!(kind_of("/-"), KdlErrorKind::SlashdashNothing);
        assert_eq!(kind_of("node /-"), KdlErrorKind::SlashdashNothing);
        assert_eq!(
            kind_of("node /- ;"),
            KdlErrorKind::UnexpectedSlashdashStopToken
        );
        assert_eq!(kind_of("(a) /- node x"), KdlErrorKind::UnexpectedSlashdashOrigin);
    }

    #[test]
    fn raw_block() {
        assert_eq!(kind_of("{\n  a\n}"), KdlErrorKind::RawBlockInDocument);
        let (doc, _) = decode("/- {\n  a\n}").unwrap();
        assert!(doc.nodes().is_empty());
    }

    #[test]
    fn property_dedup() {
        let (doc, _) = decode("node a=1 b=2 a=3").unwrap();
        let node = &doc.nodes()[0];
        assert_eq!(node.entries().len(), 2);
        assert_eq!(node.entries()[0].name(), Some("b"));
        assert_eq!(node.entries()[1].name(), Some("a"));
        assert_eq!(node.get_prop("a"), Some(&3.into()));
    }

    #[test]
    fn nested_children() {
        let (doc, _) = decode("a {\n  b {\n    c\n  }\n}").unwrap();
        let a = &doc.nodes()[0];
        let b = &a.children().unwrap()[0];
        let c = &b.children().unwrap()[0];
        assert_eq!((a.name(), b.name(), c.name()), ("a", "b", "c"));
        assert_eq!(c.children(), None);
    }

    #[test]
    fn unclosed_block() {
        assert_eq!(kind_of("a {\n  b\n"), KdlErrorKind::UnexpectedEndOfDocument);
    }

    #[test]
    fn stray_close_brace_is_left_over() {
        let (doc, rest) = decode("a\n}\nb").unwrap();
        assert_eq!(doc.nodes().len(), 1);
        assert_eq!(rest[0].kind, KdlTokenKind::CloseBlock);
        assert!(decode_strict("a\n}\nb").is_err());
    }

    #[test]
    fn attributes_after_children_rejected() {
        assert_eq!(
            kind_of("node {\n  a\n} 1"),
            KdlErrorKind::NodeNotAcceptingAttributesNow
        );
    }

    #[test]
    fn missing_property_value() {
        assert_eq!(kind_of("node key="), KdlErrorKind::UnexpectedEndOfDocument);
        assert_eq!(
            kind_of("node key=\nnext"),
            KdlErrorKind::InvalidAttributeValue
        );
    }
}
