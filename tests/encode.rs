use knotwork::{
    decode, decode_strict, encode, EncodeOptions, KdlDocument, KdlEntry, KdlErrorKind,
    KdlIntegerFormat, KdlNode, KdlValue,
};
use pretty_assertions::assert_eq;

fn reencode(input: &str) -> String {
    let doc = decode_strict(input).expect("decode failed");
    encode(&doc, &EncodeOptions::default()).expect("encode failed")
}

#[test]
fn empty_document_is_a_newline() {
    let doc = KdlDocument::new();
    assert_eq!(encode(&doc, &EncodeOptions::default()).unwrap(), "\n");
    assert_eq!(doc.to_string(), "\n");
}

#[test]
fn single_bare_node() {
    assert_eq!(reencode("node"), "node\n");
}

#[test]
fn canonical_children_layout() {
    let canonical = "node1 {\n    node2 {\n        node3\n    }\n}\n";
    assert_eq!(reencode("node1 { node2 { node3; }; }"), canonical);
    // Canonical output is a fixed point.
    assert_eq!(reencode(canonical), canonical);
}

#[test]
fn empty_children_are_dropped() {
    assert_eq!(reencode("node {\n}"), "node\n");
}

#[test]
fn radix_lexemes_are_preserved() {
    assert_eq!(reencode("n 0xff 0b10 0o7 42"), "n 0xff 0b10 0o7 42\n");
}

#[test]
fn radix_override() {
    let doc = decode_strict("n 0xff 0b10 0o7 42").unwrap();
    let opts = EncodeOptions::with_integer_format(KdlIntegerFormat::Hex);
    assert_eq!(encode(&doc, &opts).unwrap(), "n 0xff 0x2 0x7 0x2a\n");
}

#[test]
fn keywords_and_specials() {
    assert_eq!(
        reencode("kw #true #false #null #inf #-inf #nan #meta"),
        "kw #true #false #null #inf #-inf #nan #meta\n"
    );
}

#[test]
fn annotations() {
    assert_eq!(
        reencode("numbers (u8)10 (i32)20 myfloat=(f32)1.5"),
        "numbers (u8)10 (i32)20 myfloat=(f32)1.5\n"
    );
    assert_eq!(reencode("(\"a b\")node"), "(\"a b\")node\n");
}

#[test]
fn strings_go_bare_when_they_can() {
    assert_eq!(reencode("s \"plain\" \"two words\""), "s plain \"two words\"\n");
    // Reserved words and number-shapes must stay quoted.
    assert_eq!(reencode("s \"true\" \"-1\""), "s \"true\" \"-1\"\n");
}

#[test]
fn string_escapes() {
    assert_eq!(
        reencode(r#"s "a\nb" "tab\there""#),
        "s \"a\\nb\" \"tab\\there\"\n"
    );
    // NEL has no named escape and becomes a hex escape.
    assert_eq!(reencode("s \"x\\u{85}y\""), "s \"x\\u{85}y\"\n");
}

#[test]
fn quoted_names() {
    assert_eq!(reencode("\"two words\" 1"), "\"two words\" 1\n");
}

#[test]
fn property_dedup_on_encode() {
    let mut node = KdlNode::new("node");
    node.push(("a", 1));
    node.push(("b", 2));
    node.push(("a", 3));
    let doc: KdlDocument = [node].into_iter().collect();
    assert_eq!(doc.to_string(), "node b=2 a=3\n");
}

#[test]
fn float_canonical_forms() {
    assert_eq!(reencode("f 1.5 0.00001 1.0e7 1.23e-1000"), "f 1.5 0.00001 1.0E+7 1.23E-1000\n");
}

#[test]
fn multiline_string_reencodes_escaped() {
    let doc = decode_strict("str \"\"\"\n  Hello\n  World\n  \"\"\"").unwrap();
    assert_eq!(doc.to_string(), "str \"Hello\\nWorld\"\n");
}

#[test]
fn invalid_keyword_is_rejected() {
    let mut node = KdlNode::new("n");
    node.push(KdlEntry::Arg(KdlValue::keyword("has space")));
    let doc: KdlDocument = [node].into_iter().collect();
    let err = encode(&doc, &EncodeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), Some(&KdlErrorKind::InvalidKeyword));
}

#[test]
fn decode_encode_decode_round_trip() {
    for input in [
        "node\n",
        "a 1 2 3\nb prop=value {\n    c #true\n}\n",
        "deep {\n    deeper {\n        deepest 0x2a key=\"v v\"\n    }\n}\n",
        "kw #nan #inf (odd)#-inf\n",
        "f 1.5E+300 -0.25\n",
    ] {
        let (doc, rest) = decode(input).expect("first decode failed");
        assert!(rest.is_empty());
        let encoded = encode(&doc, &EncodeOptions::default()).expect("encode failed");
        let (doc2, rest2) = decode(&encoded).expect("re-decode failed");
        assert!(rest2.is_empty());
        assert_eq!(doc, doc2, "round trip diverged for {input:?}");
    }
}

#[test]
fn unicode_identifiers_stay_bare() {
    assert_eq!(reencode("café größe=1"), "café größe=1\n");
}

#[test]
fn node_and_entry_display() {
    let doc = decode_strict("node (u8)1 key=2 {\n  child\n}").unwrap();
    let node = &doc.nodes()[0];
    assert_eq!(node.to_string(), "node (u8)1 key=2 {\n    child\n}");
    assert_eq!(node.entries()[0].to_string(), "(u8)1");
    assert_eq!(node.entries()[1].to_string(), "key=2");
}

#[test]
fn set_format_changes_the_radix() {
    let mut doc = decode_strict("n 255").unwrap();
    doc.nodes_mut()[0].entries_mut()[0]
        .value_mut()
        .set_format(KdlIntegerFormat::Bin);
    assert_eq!(doc.to_string(), "n 0b11111111\n");
}

#[test]
fn deep_documents_are_fixed_points() {
    let canonical = "a {\n    b 1 {\n        c \"x y\" {\n            d #null\n        }\n    }\n}\n";
    assert_eq!(reencode(canonical), canonical);
    assert_eq!(reencode(&reencode(canonical)), reencode(canonical));
}

#[test]
fn hand_built_document_round_trips() {
    let mut node = KdlNode::new("server").with_annotation("config");
    node.push(8080);
    node.push(("host", "localhost"));
    let mut child = KdlNode::new("tls");
    child.push(false);
    node.set_children(vec![child]);
    let doc: KdlDocument = [node].into_iter().collect();

    let encoded = encode(&doc, &EncodeOptions::default()).unwrap();
    assert_eq!(
        encoded,
        "(config)server 8080 host=localhost {\n    tls #false\n}\n"
    );
    let decoded = decode_strict(&encoded).unwrap();
    assert_eq!(doc, decoded);
}
