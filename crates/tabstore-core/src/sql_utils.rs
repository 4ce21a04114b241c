//! SQL identifier quoting utilities
//!
//! Table, schema and column names come from user descriptors, so every
//! identifier that reaches generated SQL goes through [`quote_ident`].

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use tabstore_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a table name, qualifying it with `schema` when one is given.
///
/// Unlike a dotted-string splitter, the two parts are quoted separately so a
/// `.` inside either name stays part of that name.
///
/// # Examples
/// ```
/// use tabstore_core::sql_utils::quote_table;
/// assert_eq!(quote_table(None, "x_people"), r#""x_people""#);
/// assert_eq!(quote_table(Some("raw"), "orders"), r#""raw"."orders""#);
/// ```
pub fn quote_table(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
        None => quote_ident(table),
    }
}

/// Join a list of column names into a quoted, comma-separated list.
pub fn quote_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> String {
    columns
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
