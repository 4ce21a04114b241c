//! DuckDB-backed table store.
//!
//! [`TableStore`] borrows a DuckDB [`Connection`] owned by the caller and maps
//! schema descriptors onto physical tables living in an optional namespace
//! (database schema) under an optional name prefix.

use crate::error::{StoreError, StoreResult};
use crate::mapping::{logical_type, physical_type};
use crate::row_helpers::{read_value, to_sql_value};
use duckdb::Connection;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tabstore_core::config::DEFAULT_BATCH_SIZE;
use tabstore_core::sql_utils::{quote_columns, quote_ident, quote_table};
use tabstore_core::{Field, FieldType, Row, Schema, StoreConfig, Value};

/// Schema DuckDB places tables in when none is named.
const DEFAULT_SCHEMA: &str = "main";

type TableFilter = Box<dyn Fn(&str) -> bool>;

/// Maps table schema descriptors onto tables of a borrowed DuckDB connection.
///
/// Every operation is a blocking call against the connection. The set of
/// managed table names is cached after the first listing and dropped by any
/// create or delete issued through this store; tables created behind its back
/// are only seen once the cache is invalidated.
///
/// Descriptors passed to [`TableStore::create_table`] are kept, so describing
/// or writing a table this store created uses the original descriptor
/// (including its `missingValues`) instead of a reflected one.
pub struct TableStore<'conn> {
    conn: &'conn Connection,
    namespace: Option<String>,
    prefix: String,
    batch_size: usize,
    atomic_writes: bool,
    filter: Option<TableFilter>,
    tables_cache: RefCell<Option<BTreeSet<String>>>,
    descriptors: BTreeMap<String, Schema>,
}

impl<'conn> TableStore<'conn> {
    /// Store over `conn` in the default schema with no prefix.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            namespace: None,
            prefix: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            atomic_writes: false,
            filter: None,
            tables_cache: RefCell::new(None),
            descriptors: BTreeMap::new(),
        }
    }

    /// Store over `conn` configured from a [`StoreConfig`].
    pub fn with_config(conn: &'conn Connection, config: StoreConfig) -> Self {
        Self {
            namespace: config.schema,
            prefix: config.prefix,
            batch_size: config.batch_size.max(1),
            atomic_writes: config.atomic_writes,
            ..Self::new(conn)
        }
    }

    /// Place managed tables in database schema `namespace`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self.descriptors.clear();
        self.invalidate_cache();
        self
    }

    /// Prepend `prefix` to every physical table name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.descriptors.clear();
        self.invalidate_cache();
        self
    }

    /// Only manage physical tables for which `filter` returns true.
    pub fn with_filter(mut self, filter: impl Fn(&str) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self.invalidate_cache();
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Physical name of logical table `name`.
    pub fn physical_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Logical names of all managed tables.
    pub fn list_tables(&self) -> StoreResult<BTreeSet<String>> {
        if let Some(cached) = self.tables_cache.borrow().as_ref() {
            return Ok(cached.clone());
        }

        let tables = self.reflect_table_names()?;
        *self.tables_cache.borrow_mut() = Some(tables.clone());
        Ok(tables)
    }

    /// Whether logical table `name` exists.
    pub fn table_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.list_tables()?.contains(name))
    }

    /// Create logical table `name` from `schema`.
    ///
    /// The descriptor is fully validated before any statement runs, so an
    /// unsupported field type leaves neither a table nor a namespace behind.
    pub fn create_table(&mut self, name: &str, schema: &Schema) -> StoreResult<()> {
        if self.table_exists(name)? {
            return Err(StoreError::AlreadyExists {
                table: name.to_string(),
            });
        }
        let ddl = self.create_table_sql(name, schema)?;

        self.ensure_namespace()?;
        log::debug!("Creating table: {ddl}");
        self.conn.execute_batch(&ddl)?;
        self.descriptors.insert(name.to_string(), schema.clone());
        self.invalidate_cache();
        Ok(())
    }

    /// Create several tables at once.
    ///
    /// Without `force`, any existing target fails the call with
    /// `AlreadyExists` before anything is created. With `force`, existing
    /// targets are dropped and recreated. A name listed twice fails with
    /// `AlreadyExists` before anything runs.
    pub fn create_tables(&mut self, tables: &[(&str, &Schema)], force: bool) -> StoreResult<()> {
        let mut seen = BTreeSet::new();
        if let Some((name, _)) = tables.iter().find(|(name, _)| !seen.insert(*name)) {
            return Err(StoreError::AlreadyExists {
                table: name.to_string(),
            });
        }

        let statements = tables
            .iter()
            .map(|(name, schema)| self.create_table_sql(name, schema))
            .collect::<StoreResult<Vec<_>>>()?;

        let existing = self.list_tables()?;
        let mut to_drop = Vec::new();
        for (name, _) in tables {
            if existing.contains(*name) {
                if !force {
                    return Err(StoreError::AlreadyExists {
                        table: name.to_string(),
                    });
                }
                to_drop.push(*name);
            }
        }
        if !to_drop.is_empty() {
            self.delete_tables(&to_drop, false)?;
        }

        self.ensure_namespace()?;
        let result = tables
            .iter()
            .zip(&statements)
            .try_for_each(|((name, schema), ddl)| {
                log::debug!("Creating table: {ddl}");
                self.conn.execute_batch(ddl)?;
                self.descriptors.insert(name.to_string(), (*schema).clone());
                Ok::<_, duckdb::Error>(())
            });
        self.invalidate_cache();
        Ok(result?)
    }

    /// Drop logical table `name`.
    pub fn delete_table(&mut self, name: &str) -> StoreResult<()> {
        self.delete_tables(&[name], false)
    }

    /// Drop each table in `names`.
    ///
    /// Missing tables fail with `NotFound` before anything is dropped, unless
    /// `ignore` is set, in which case they are skipped. Repeated names are
    /// dropped once.
    pub fn delete_tables(&mut self, names: &[&str], ignore: bool) -> StoreResult<()> {
        let existing = self.list_tables()?;
        let mut targets = BTreeSet::new();
        for name in names {
            if existing.contains(*name) {
                targets.insert(*name);
            } else if !ignore {
                return Err(StoreError::NotFound {
                    table: name.to_string(),
                });
            }
        }

        let mut dropped = Vec::with_capacity(targets.len());
        let result = targets.iter().try_for_each(|name| {
            let sql = format!("DROP TABLE {}", self.qualified_name(name));
            log::debug!("Dropping table: {sql}");
            self.conn.execute_batch(&sql)?;
            dropped.push(*name);
            Ok::<_, duckdb::Error>(())
        });
        for name in dropped {
            self.descriptors.remove(name);
        }
        self.invalidate_cache();
        Ok(result?)
    }

    /// Drop every managed table.
    pub fn delete_all(&mut self) -> StoreResult<()> {
        let names = self.list_tables()?;
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.delete_tables(&names, false)
    }

    /// Descriptor of logical table `name`.
    ///
    /// Tables created through this store return the descriptor they were
    /// created from; any other table is reflected from the database.
    pub fn describe_table(&self, name: &str) -> StoreResult<Schema> {
        self.require_table(name)?;
        if let Some(schema) = self.descriptors.get(name) {
            return Ok(schema.clone());
        }
        self.reflect_schema(name)
    }

    fn reflect_schema(&self, name: &str) -> StoreResult<Schema> {
        let physical = self.physical_name(name);

        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_catalog = current_database() \
             AND table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map(duckdb::params![self.schema_name(), physical], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let fields = columns
            .into_iter()
            .map(|(column, data_type)| match logical_type(&data_type) {
                Some(field_type) => Ok(Field::new(column, field_type)),
                None => Err(StoreError::UnsupportedColumnType {
                    table: name.to_string(),
                    column,
                    data_type,
                }),
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Schema::new(fields))
    }

    /// Visit every row of logical table `name`, in whatever order the
    /// database returns them.
    pub fn for_each_row<F>(&self, name: &str, mut visit: F) -> StoreResult<()>
    where
        F: FnMut(Row) -> StoreResult<()>,
    {
        let schema = self.describe_table(name)?;
        let types = schema.validate()?;
        let sql = format!(
            "SELECT {} FROM {}",
            quote_columns(schema.field_names()),
            self.qualified_name(name)
        );
        log::debug!("Reading table: {sql}");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let values = types
                .iter()
                .enumerate()
                .map(|(idx, field_type)| read_value(row, idx, *field_type))
                .collect::<Result<Row, _>>()?;
            visit(values)?;
        }
        Ok(())
    }

    /// All rows of logical table `name`, unordered.
    pub fn read_table(&self, name: &str) -> StoreResult<Vec<Row>> {
        let mut rows = Vec::new();
        self.for_each_row(name, |row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(rows)
    }

    /// Coerce and insert positional `rows` into logical table `name`.
    ///
    /// Every row is checked and coerced before the first insert is issued.
    /// Returns the number of rows written.
    pub fn write_table(&self, name: &str, rows: &[Row]) -> StoreResult<usize> {
        let schema = self.describe_table(name)?;
        let expected = schema.fields.len();

        let mut cast = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(StoreError::RowArity {
                    row: idx,
                    expected,
                    found: row.len(),
                });
            }
            cast.push(schema.cast_row(row)?);
        }

        self.insert_rows(name, &schema, &cast)
    }

    /// Coerce and insert field-name keyed rows into logical table `name`.
    ///
    /// Fields missing from a row are written as NULL; keys that name no field
    /// fail with `UnknownField`.
    pub fn write_keyed(&self, name: &str, rows: &[BTreeMap<String, Value>]) -> StoreResult<usize> {
        let schema = self.describe_table(name)?;

        let mut cast = Vec::with_capacity(rows.len());
        for keyed in rows {
            let mut row = vec![Value::Null; schema.fields.len()];
            for (key, value) in keyed {
                let idx = schema
                    .field_index(key)
                    .ok_or_else(|| StoreError::UnknownField {
                        table: name.to_string(),
                        field: key.clone(),
                    })?;
                row[idx] = value.clone();
            }
            cast.push(schema.cast_row(&row)?);
        }

        self.insert_rows(name, &schema, &cast)
    }

    /// Drop the cached table listing.
    ///
    /// Called after every create/delete; callers that change tables through
    /// the connection directly can call it too.
    pub fn invalidate_cache(&self) {
        if self.tables_cache.borrow_mut().take().is_some() {
            log::debug!("Table list cache invalidated");
        }
    }

    fn schema_name(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    fn qualified_name(&self, name: &str) -> String {
        quote_table(self.namespace.as_deref(), &self.physical_name(name))
    }

    fn require_table(&self, name: &str) -> StoreResult<()> {
        if self.table_exists(name)? {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                table: name.to_string(),
            })
        }
    }

    fn reflect_table_names(&self) -> StoreResult<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_catalog = current_database() \
             AND table_schema = ? AND table_type = 'BASE TABLE'",
        )?;
        let physical = stmt
            .query_map(duckdb::params![self.schema_name()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(physical
            .into_iter()
            .filter(|table| self.filter.as_ref().map_or(true, |keep| keep(table.as_str())))
            .filter_map(|table| table.strip_prefix(self.prefix.as_str()).map(str::to_string))
            .collect())
    }

    fn create_table_sql(&self, name: &str, schema: &Schema) -> StoreResult<String> {
        let types = schema.validate()?;
        let columns = schema
            .fields
            .iter()
            .zip(types)
            .map(|(field, field_type)| column_definition(field, field_type))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "CREATE TABLE {} ({columns})",
            self.qualified_name(name)
        ))
    }

    fn ensure_namespace(&self) -> StoreResult<()> {
        if let Some(namespace) = &self.namespace {
            let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(namespace));
            log::debug!("Ensuring namespace: {sql}");
            self.conn.execute_batch(&sql)?;
        }
        Ok(())
    }

    fn insert_rows(&self, name: &str, schema: &Schema, rows: &[Row]) -> StoreResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let table = self.qualified_name(name);
        let columns = quote_columns(schema.field_names());
        let placeholders = format!("({})", vec!["?"; schema.fields.len()].join(", "));

        let insert = |conn: &Connection| -> StoreResult<usize> {
            let mut written = 0;
            for chunk in rows.chunks(self.batch_size) {
                let sql = format!(
                    "INSERT INTO {table} ({columns}) VALUES {}",
                    vec![placeholders.as_str(); chunk.len()].join(", ")
                );
                let params = chunk.iter().flatten().map(to_sql_value);
                written += conn.execute(&sql, duckdb::params_from_iter(params))?;
            }
            log::debug!("Inserted {written} rows into {table}");
            Ok(written)
        };

        if self.atomic_writes {
            self.transaction(insert)
        } else {
            insert(self.conn)
        }
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    fn transaction<F, T>(&self, body: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| StoreError::Transaction(format!("BEGIN failed: {e}")))?;

        let result = body(self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    rollback(self.conn);
                    return Err(StoreError::Transaction(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => rollback(self.conn),
        }
        result
    }
}

fn rollback(conn: &Connection) {
    if let Err(e) = conn.execute_batch("ROLLBACK") {
        log::warn!("ROLLBACK failed: {e}");
    }
}

fn column_definition(field: &Field, field_type: FieldType) -> String {
    format!("{} {}", quote_ident(&field.name), physical_type(field_type))
}

impl fmt::Display for TableStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableStore <duckdb/{}>", self.schema_name())
    }
}

impl fmt::Debug for TableStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableStore")
            .field("namespace", &self.namespace)
            .field("prefix", &self.prefix)
            .field("batch_size", &self.batch_size)
            .field("atomic_writes", &self.atomic_writes)
            .field("filtered", &self.filter.is_some())
            .field("descriptors", &self.descriptors.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
