use crude_csv::Grid;
use crude_csv::decode::parse_document;

#[test]
fn serialize_joins_cells_and_rows() {
    let g = Grid::parse("a, b\nc ,d\n");
    assert_eq!(g.serialize(), "a,b\nc,d");
}

#[test]
fn serialize_is_idempotent_without_edits() {
    let g = Grid::parse("x,y\n1,2\n3,4");
    let first = g.serialize();
    let second = g.serialize();
    assert_eq!(first, second);
}

#[test]
fn reparse_reproduces_grid_for_plain_content() {
    let docs = [
        "a,b,c\n1,2,3\n",
        "name,qty\n  apples , 3\n\npears,  \n",
        "",
        "single",
        "x,,z\n,,\n",
    ];
    for doc in docs {
        let once = parse_document(doc);
        let text = Grid::from_rows(once.clone()).serialize();
        assert_eq!(parse_document(&text), once, "document {doc:?}");
    }
}

#[test]
fn quoted_content_is_not_reescaped_on_write() {
    let g = Grid::parse("\"a,b\",\"say \"\"hi\"\"\"");
    assert_eq!(g.cell(0, 0), Some("a,b"));
    assert_eq!(g.cell(0, 1), Some("say \"hi\""));
    let text = g.serialize();
    assert_eq!(text, "a,b,say \"hi\"");
    // Reloading splits the cell that held a comma.
    assert_eq!(Grid::parse(&text).column_count(), 3);
    assert_eq!(g.lossy_cells(), vec![(0, 0), (0, 1)]);
}

#[test]
fn encode_to_writer_matches_serialize() -> Result<(), Box<dyn std::error::Error>> {
    let g = crude_csv::decode_from_str("a,b\nc,d");
    let mut buf = Vec::new();
    crude_csv::encode_to_writer(&mut buf, &g)?;
    assert_eq!(String::from_utf8(buf)?, crude_csv::encode_to_string(&g));
    Ok(())
}

#[test]
fn decode_from_reader_matches_decode_from_str() -> Result<(), Box<dyn std::error::Error>> {
    let text = "\u{FEFF}name,qty\r\nbolt,4\r\n";
    let g = crude_csv::decode_from_reader(text.as_bytes())?;
    assert_eq!(g, crude_csv::decode_from_str(text));
    assert_eq!(g.serialize(), "name,qty\nbolt,4");
    Ok(())
}

#[test]
fn grid_serializes_to_json_rows() -> Result<(), Box<dyn std::error::Error>> {
    let g = Grid::parse("a,b\n1");
    let json = serde_json::to_string(&g)?;
    assert_eq!(json, r#"[["a","b"],["1",""]]"#);
    let back: Grid = serde_json::from_str(r#"[["a"],["b","c"]]"#)?;
    assert_eq!(back.column_count(), 2);
    Ok(())
}
