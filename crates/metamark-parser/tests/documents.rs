use metamark_parser::{parse, render_tree, tokenize, NodeKind};

const STRUCTURE: &str = "# Main Heading\n\n\
This is a paragraph with some text.\n\n\
[[diagram]]\ngraph TD\nA[Start] --> B[Process]\nB --> C[End]\n[[/diagram]]\n\n\
> important: This is an important note.\n\n\
%% This is a comment block %%\n\
Some content here\n\
%% End comment %%\n";

const COMPLEX: &str = "---\ntitle: Complex Test\ndescription: A test with nested structures\n---\n\n\
# Main Section\n\n\
This is a paragraph with **bold** and *italic* text.\n\n\
[[diagram]]\n\
graph TD\n    A[Start] --> B[Process]\n    B --> C[Decision]\n    C -->|Yes| D[Action 1]\n    C -->|No| E[Action 2]\n\
[[/diagram]]\n\n\
> important: This is a critical note about the process.\n\
> It spans multiple lines.\n\n\
%% This is a detailed comment about the implementation %%\n\
Some implementation details here.\n\
%% End implementation comment %%\n\n\
## Subsection\n\n\
More content here.\n\n\
[[table]]\n| Header 1 | Header 2 |\n|----------|----------|\n| Cell 1   | Cell 2   |\n[[/table]]\n\n\
> warning: This is a warning about the table format.\n\n\
%% Final comment %%\n";

#[test]
fn structure_document() {
    let doc = parse(STRUCTURE).unwrap();
    let kinds: Vec<NodeKind> = doc.blocks().iter().map(|n| n.kind).collect();

    assert_eq!(
        kinds,
        vec![
            NodeKind::Heading,
            NodeKind::Paragraph,
            NodeKind::Component,
            NodeKind::Annotation,
            NodeKind::Comment,
            NodeKind::Paragraph,
            NodeKind::Comment,
        ]
    );

    let blocks = doc.blocks();
    assert_eq!(blocks[0].text(), Some("Main Heading"));
    assert_eq!(blocks[1].text(), Some("This is a paragraph with some text."));
    assert_eq!(blocks[2].text(), Some("diagram"));
    assert_eq!(
        blocks[2].children[0].text(),
        Some("graph TD\nA[Start] --> B[Process]\nB --> C[End]")
    );
    assert_eq!(blocks[3].text(), Some("important"));
    assert_eq!(
        blocks[3].children[0].text(),
        Some("This is an important note.")
    );
    assert_eq!(blocks[4].text(), Some("This is a comment block"));
    assert_eq!(blocks[5].text(), Some("Some content here"));
    assert_eq!(blocks[6].text(), Some("End comment"));
}

#[test]
fn complex_document() {
    let doc = parse(COMPLEX).unwrap();
    let blocks = doc.blocks();

    assert_eq!(blocks.len(), 13);
    assert_eq!(doc.get_metadata("title"), Some("Complex Test"));
    assert_eq!(
        doc.get_metadata("description"),
        Some("A test with nested structures")
    );

    assert!(blocks[0].is(NodeKind::Metadata));
    assert!(blocks[3].is(NodeKind::Component));
    assert_eq!(blocks[3].text(), Some("diagram"));
    assert!(blocks[3].children[0]
        .text()
        .unwrap()
        .contains("C -->|No| E[Action 2]"));

    assert!(blocks[4].is(NodeKind::Annotation));
    assert_eq!(
        blocks[4].children[0].text(),
        Some("This is a critical note about the process.\nIt spans multiple lines.")
    );

    assert!(blocks[8].is(NodeKind::Heading));
    assert_eq!(blocks[8].level, 2);
    assert!(blocks[10].is(NodeKind::Component));
    assert_eq!(blocks[10].text(), Some("table"));
    assert!(blocks[11].is(NodeKind::Annotation));
    assert_eq!(blocks[11].text(), Some("warning"));
    assert!(blocks[12].is(NodeKind::Comment));
}

#[test]
fn parsing_is_repeatable() {
    for _ in 0..100 {
        let doc = parse(COMPLEX).unwrap();
        assert_eq!(doc.blocks().len(), 13);
        doc.destroy();
    }
}

#[test]
fn tree_listing() {
    let doc = parse("# Title\n\n> note: hi\n").unwrap();
    let tree = render_tree(&doc.root, 0);

    assert_eq!(
        tree,
        "Document(children=2)\n  \
         Heading(text=\"Title\", level=1, children=0)\n  \
         Annotation(text=\"note\", children=1)\n    \
         Paragraph(text=\"hi\", children=0)\n"
    );
}

#[test]
fn json_output_carries_metadata_and_tree() {
    let doc = parse("---\nb: 2\na: 1\n---\n# Title\n").unwrap();
    let json = serde_json::to_value(&doc).unwrap();

    let keys: Vec<&String> = json["meta"].as_object().unwrap().keys().collect();
    assert_eq!(json["meta"]["a"], "1");
    assert_eq!(keys.len(), 2);
    assert_eq!(json["root"]["kind"], "Document");
    assert_eq!(json["root"]["children"][1]["kind"], "Heading");
    assert_eq!(json["root"]["children"][1]["level"], 1);
}

#[test]
fn token_stream_ends_with_eof() {
    let tokens = tokenize(COMPLEX);
    assert!(tokens.len() > 13);
    assert_eq!(
        tokens.last().map(|t| t.kind),
        Some(metamark_parser::scanner::TokenKind::Eof)
    );
}
