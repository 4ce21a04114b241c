use super::*;

#[test]
fn test_quote_ident_simple() {
    assert_eq!(quote_ident("users"), r#""users""#);
}

#[test]
fn test_quote_ident_with_embedded_quotes() {
    assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
}

#[test]
fn test_quote_ident_with_dots() {
    assert_eq!(quote_ident("schema.table"), r#""schema.table""#);
}

#[test]
fn test_quote_table_with_dotted_name() {
    assert_eq!(quote_table(Some("a.b"), "c"), r#""a.b"."c""#);
}

#[test]
fn test_quote_columns() {
    assert_eq!(quote_columns(["id", "na\"me"]), r#""id", "na""me""#);
    assert_eq!(quote_columns(Vec::<&str>::new()), "");
}
