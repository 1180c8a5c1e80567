use pretty_assertions::assert_eq;
use sheetpage_core::{parse_rows, rows_to_string, Sheet};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[test]
fn quoted_cell_carries_comma_newline_and_doubled_quote() {
    let rows = parse_rows("\"a,b\nc\"\"d\"");
    assert_eq!(rows, vec![row(&["a,b\nc\"d"])]);
}

#[test]
fn last_row_survives_missing_trailing_newline() {
    let rows = parse_rows("slug,title\nsermorelin,Sermorelin");
    assert_eq!(rows, vec![row(&["slug", "title"]), row(&["sermorelin", "Sermorelin"])]);
}

#[test]
fn trailing_newline_adds_no_empty_row() {
    let rows = parse_rows("a,b\nc,d\n");
    assert_eq!(rows.len(), 2);
}

#[test]
fn quotes_anywhere_in_a_cell_toggle_quoting() {
    // A quote opening mid-cell still protects the delimiters inside it.
    let rows = parse_rows("pre\"fix,more\"post,tail\n");
    assert_eq!(rows, vec![row(&["prefix,morepost", "tail"])]);
}

#[test]
fn round_trip_preserves_awkward_cells() {
    let original = vec![
        row(&["slug", "note"]),
        row(&["bpc-157", "line one\nline two"]),
        row(&["tb-500", "commas, quotes \" and more"]),
        row(&["", "leading empty cell"]),
    ];
    let text = rows_to_string(&original);
    assert_eq!(parse_rows(&text), original);
}

#[test]
fn canonical_text_round_trips_unchanged() {
    let text = "a,b\n\"c,d\",e\n";
    assert_eq!(rows_to_string(&parse_rows(text)), text);
}

#[test]
fn round_trip_keeps_a_row_with_one_empty_cell() {
    let original = vec![row(&[""]), row(&["a"])];
    let text = rows_to_string(&original);
    assert_eq!(text, "\"\"\na\n");
    assert_eq!(parse_rows(&text), original);
}

#[test]
fn quoted_empty_row_reserializes_to_itself() {
    let text = "\"\"\n";
    assert_eq!(rows_to_string(&parse_rows(text)), text);
}

#[test]
fn sheet_splits_header_row_from_data() {
    let sheet = Sheet::parse("Slug,Hero Title\nsermorelin,Sermorelin\n");
    assert_eq!(sheet.headers(), &row(&["Slug", "Hero Title"])[..]);
    assert_eq!(sheet.rows().len(), 1);
}

#[test]
fn empty_text_yields_an_empty_sheet() {
    let sheet = Sheet::parse("");
    assert!(sheet.headers().is_empty());
    assert!(sheet.rows().is_empty());
}
