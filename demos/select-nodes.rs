// Shows how to pick nodes out of a document with a selector path.

use knotwork::{select, KdlAttrSelector, KdlDocument, KdlSelector};

fn main() -> miette::Result<()> {
    let input = r#"
fleet {
    server name=web-1 region=eu {
        port 443
    }
    server name=web-2 region=us {
        port 8080
    }
    worker name=batch-1 region=eu
}
    "#;
    let doc: KdlDocument = input.parse()?;

    // Every server, anywhere in the tree.
    for node in select(&doc, &["server".into()]) {
        println!("server: {:?}", node.get_prop("name"));
    }

    // Only servers pinned to a region.
    let eu = select(
        &doc,
        &[KdlSelector::node(
            "server",
            [KdlAttrSelector::from(("region", "eu"))],
        )],
    );
    println!("eu servers: {}", eu.len());

    // Ports of every server, via a chained path.
    for port in select(&doc, &["server".into(), "port".into()]) {
        println!("port: {}", port.get(0).expect("port nodes carry a value"));
    }

    Ok(())
}
