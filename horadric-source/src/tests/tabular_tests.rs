use super::*;

const SAMPLE: &str = "index\tcode\tlvl req\n\
Stone Crusher\tmau\t68\n\
Expansion\t\t\n\
\t\t\n\
Shako\tuap\tnot-a-number\n";

#[test]
fn skips_blank_and_expansion_rows() {
    let table = Table::parse_str("UniqueItems.txt", SAMPLE).unwrap();
    assert_eq!(table.len(), 2);
    let names: Vec<&str> = table.rows().map(|r| r.first()).collect();
    assert_eq!(names, vec!["Stone Crusher", "Shako"]);
}

#[test]
fn columns_are_case_insensitive() {
    let table = Table::parse_str("UniqueItems.txt", SAMPLE).unwrap();
    let row = table.rows().next().unwrap();
    assert_eq!(row.get("CODE"), Some("mau"));
    assert_eq!(row.int("Lvl Req").unwrap(), Some(68));
    assert_eq!(row.get("missing"), None);
    assert!(table.has_column("INDEX"));
}

#[test]
fn bad_integer_is_a_row_error() {
    let table = Table::parse_str("UniqueItems.txt", SAMPLE).unwrap();
    let shako = table.rows().nth(1).unwrap();
    let err = shako.int("lvl req").unwrap_err();
    assert_eq!(err.file, "UniqueItems.txt");
    assert_eq!(err.line, 5);
    assert!(err.message.contains("not-a-number"));
}

#[test]
fn short_rows_read_as_blank() {
    let table = Table::parse_str("Misc.txt", "name\tcode\ttype\nEl Rune\tr01\n").unwrap();
    let row = table.rows().next().unwrap();
    assert_eq!(row.get("type"), None);
}

#[test]
fn require_columns_reports_missing() {
    let table = Table::parse_str("Misc.txt", "name\tcode\n").unwrap();
    assert!(table.require_columns(&["name", "code"]).is_ok());
    assert!(matches!(
        table.require_columns(&["type"]),
        Err(SourceError::MissingColumn { .. })
    ));
}
