// Shows how to maintain nodes sorted by name in a
// machine-generated kdl document

use knotwork::{KdlDocument, KdlNode};

fn sort_by_name(x: &KdlNode, y: &KdlNode) -> std::cmp::Ordering {
    x.name().cmp(y.name())
}

fn main() -> miette::Result<()> {
    let input = r#"
words {
    apple
    orange
}
    "#;
    let mut doc: KdlDocument = input.parse()?;

    let words_section = doc.get_mut("words").expect("'words' section should exist");
    let word_nodes = words_section
        .children_mut()
        .expect("'words' section should have children");

    word_nodes.push(KdlNode::new("banana"));
    word_nodes.sort_by(sort_by_name);

    println!("{}", doc);

    // output:
    // words {
    //     apple
    //     banana
    //     orange
    // }

    Ok(())
}
