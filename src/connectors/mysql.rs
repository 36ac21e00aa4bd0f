//! MySQL source connector.
//!
//! Reads table, column and key definitions from `INFORMATION_SCHEMA` and
//! streams table contents into CSV files. Uses a single SQLx connection
//! driven by a current-thread Tokio runtime, so every call blocks until the
//! database has answered and queries run strictly one after another.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType as ArrowType, Field as ArrowField, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use base64::Engine;
use futures::TryStreamExt;
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Executor, Row, Statement, TypeInfo, ValueRef};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use super::config::MysqlConfig;
use super::{Connector, ConnectorError};
use crate::export::{ExportError, csv::CsvTableWriter, table_path};
use crate::models::{Field, ForeignKey, Key, MetaData, Table};
use crate::typemap::{MysqlTypeMapper, TypeMapper};

/// Rows buffered per CSV batch when exporting a table.
const EXPORT_BATCH_ROWS: usize = 10_000;

/// Tables and views of a schema, as `SHOW TABLES` lists them.
const TABLE_NAMES_QUERY: &str = r#"
    SELECT CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME
    FROM INFORMATION_SCHEMA.TABLES
    WHERE TABLE_SCHEMA = ? AND TABLE_TYPE IN ('BASE TABLE', 'VIEW')
    ORDER BY TABLE_NAME
"#;

/// One row of `INFORMATION_SCHEMA.COLUMNS`.
#[derive(Debug, Clone)]
pub struct ColumnRow {
    pub column_name: String,
    pub data_type: String,
    pub column_key: String,
}

/// One foreign-key row of `INFORMATION_SCHEMA.KEY_COLUMN_USAGE`.
#[derive(Debug, Clone)]
pub struct KeyColumnRow {
    pub constraint_name: String,
    pub table_name: String,
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
}

/// Build a table from its column rows, in ordinal order.
///
/// Columns with `COLUMN_KEY = 'PRI'` form the primary key: a single name
/// for one column, a list for several.
pub fn build_table(table_name: &str, columns: &[ColumnRow]) -> Result<Table, ConnectorError> {
    let mapper = MysqlTypeMapper::new();
    let mut fields = Vec::with_capacity(columns.len());
    let mut primary_key = Vec::new();

    for column in columns {
        let field_type = mapper
            .map_native_type(&column.data_type)
            .map_err(|source| ConnectorError::TypeMapping {
                table: table_name.to_string(),
                field: column.column_name.clone(),
                source,
            })?;
        if column.column_key == "PRI" {
            primary_key.push(column.column_name.clone());
        }
        fields.push(Field::typed(column.column_name.clone(), field_type));
    }

    let mut table = Table::new(table_name, fields);
    table.primary_key = Key::from_names(primary_key);
    Ok(table)
}

/// Group key-column rows into foreign keys.
///
/// Rows of the same constraint on the same table become one foreign key
/// whose fields follow row order. Keys are returned in order of first
/// appearance; single-column keys are scalars.
pub fn group_foreign_keys(rows: &[KeyColumnRow]) -> Vec<ForeignKey> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut grouped: HashMap<(String, String), (String, Vec<String>, Vec<String>)> =
        HashMap::new();

    for row in rows {
        let id = (row.table_name.clone(), row.constraint_name.clone());
        let entry = grouped.entry(id.clone()).or_insert_with(|| {
            order.push(id);
            (row.referenced_table_name.clone(), Vec::new(), Vec::new())
        });
        entry.1.push(row.column_name.clone());
        entry.2.push(row.referenced_column_name.clone());
    }

    order
        .into_iter()
        .filter_map(|id| {
            let (ref_table, fields, ref_fields) = grouped.remove(&id)?;
            Some(ForeignKey {
                table: id.0,
                field: Key::from_names(fields)?,
                ref_table,
                ref_field: Key::from_names(ref_fields)?,
            })
        })
        .collect()
}

/// Quote a MySQL identifier.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render one cell as CSV text; `None` for NULL.
fn cell_text(row: &MySqlRow, index: usize) -> Result<Option<String>, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(None);
    }
    let type_name = raw.type_info().name().to_uppercase();

    let text = match type_name.as_str() {
        // Integer types
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "BOOLEAN" => {
            row.try_get_unchecked::<i64, _>(index)?.to_string()
        }
        t if t.ends_with("UNSIGNED") => row.try_get_unchecked::<u64, _>(index)?.to_string(),
        "BIT" => row.try_get_unchecked::<u64, _>(index)?.to_string(),
        "YEAR" => row.try_get_unchecked::<u16, _>(index)?.to_string(),

        // Floating point
        "FLOAT" => row.try_get::<f32, _>(index)?.to_string(),
        "DOUBLE" => row.try_get::<f64, _>(index)?.to_string(),

        // Date/Time types; zero and partial-zero dates have no chrono value
        "DATE" => match row.try_get::<chrono::NaiveDate, _>(index) {
            Ok(date) => date.to_string(),
            Err(_) => raw_datetime_text(row, index, false)?,
        },
        "DATETIME" | "TIMESTAMP" => match row.try_get::<chrono::NaiveDateTime, _>(index) {
            Ok(datetime) => datetime.to_string(),
            Err(_) => raw_datetime_text(row, index, true)?,
        },
        // TIME is an interval of up to +-838:59:59, not a time of day
        "TIME" => row.try_get::<MySqlTime, _>(index)?.to_string(),

        // Binary and spatial types
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        }

        // DECIMAL arrives as text; strings, ENUM, SET and JSON as well
        _ => row.try_get_unchecked::<String, _>(index)?,
    };
    Ok(Some(text))
}

/// Render a binary-protocol DATE, DATETIME or TIMESTAMP value as MySQL
/// prints it, zero dates included.
///
/// The value is a length byte followed by 0, 4, 7 or 11 bytes: little-endian
/// year, month, day, then hour, minute, second, then microseconds.
fn format_binary_datetime(bytes: &[u8], with_time: bool) -> Option<String> {
    let (&len, body) = bytes.split_first()?;
    if body.len() != usize::from(len) || !matches!(len, 0 | 4 | 7 | 11) {
        return None;
    }

    let (year, month, day) = match body {
        [y0, y1, month, day, ..] => (u16::from_le_bytes([*y0, *y1]), *month, *day),
        _ => (0, 0, 0),
    };
    let mut text = format!("{:04}-{:02}-{:02}", year, month, day);
    if with_time {
        let (hour, minute, second) = match body {
            [_, _, _, _, hour, minute, second, ..] => (*hour, *minute, *second),
            _ => (0, 0, 0),
        };
        text.push_str(&format!(" {:02}:{:02}:{:02}", hour, minute, second));
        if let [_, _, _, _, _, _, _, m0, m1, m2, m3] = body {
            let micros = u32::from_le_bytes([*m0, *m1, *m2, *m3]);
            if micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
        }
    }
    Some(text)
}

/// Text of a temporal cell that chrono cannot represent
fn raw_datetime_text(
    row: &MySqlRow,
    index: usize,
    with_time: bool,
) -> Result<String, sqlx::Error> {
    let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
    if let Some(text) = format_binary_datetime(&bytes, with_time) {
        return Ok(text);
    }
    String::from_utf8(bytes).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Column-wise buffer of exported rows.
struct RowBuffer {
    schema: SchemaRef,
    columns: Vec<Vec<Option<String>>>,
}

impl RowBuffer {
    fn new(header: &[String]) -> Self {
        let fields: Vec<ArrowField> = header
            .iter()
            .map(|name| ArrowField::new(name, ArrowType::Utf8, true))
            .collect();
        Self {
            schema: Arc::new(Schema::new(fields)),
            columns: vec![Vec::new(); header.len()],
        }
    }

    fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    fn push(&mut self, row: &MySqlRow) -> Result<(), sqlx::Error> {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.push(cell_text(row, index)?);
        }
        Ok(())
    }

    /// Drain the buffer into a record batch.
    fn take_batch(&mut self) -> Result<RecordBatch, ArrowError> {
        let arrays: Vec<ArrayRef> = self
            .columns
            .iter_mut()
            .map(|values| Arc::new(StringArray::from(std::mem::take(values))) as ArrayRef)
            .collect();
        RecordBatch::try_new(self.schema.clone(), arrays)
    }
}

/// Connector over a MySQL database.
///
/// The connection is opened and all metadata is loaded in
/// [`MysqlConnector::connect`]. It is closed when the connector is dropped.
pub struct MysqlConnector {
    config: MysqlConfig,
    runtime: Runtime,
    conn: Option<MySqlConnection>,
    metadata: MetaData,
}

impl MysqlConnector {
    /// Connect to the database and load its metadata.
    pub fn connect(config: MysqlConfig) -> Result<Self, ConnectorError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset("utf8mb4");

        let conn = runtime
            .block_on(MySqlConnection::connect_with(&options))
            .map_err(|e| ConnectorError::database(e, "connecting to MySQL"))?;

        info!(
            "Connected to MySQL source: {}:{}/{}",
            config.host, config.port, config.database
        );

        let mut connector = Self {
            config,
            runtime,
            conn: Some(conn),
            metadata: MetaData::new(),
        };
        connector.load_metadata()?;
        Ok(connector)
    }

    pub fn config(&self) -> &MysqlConfig {
        &self.config
    }

    fn load_metadata(&mut self) -> Result<(), ConnectorError> {
        let mut tables = Vec::new();
        for table_name in self.table_names()? {
            let columns = self.columns(&table_name)?;
            tables.push(build_table(&table_name, &columns)?);
        }
        let foreign_keys = group_foreign_keys(&self.key_column_rows()?);

        let mut metadata = MetaData::new();
        metadata.set_tables(tables)?;
        metadata.set_foreign_keys(foreign_keys)?;

        info!(
            "Loaded {} tables and {} foreign keys from {}",
            metadata.tables().len(),
            metadata.foreign_keys().len(),
            self.config.database
        );
        self.metadata = metadata;
        Ok(())
    }

    fn fetch_rows(
        &mut self,
        query: &str,
        binds: &[&str],
        context: &str,
    ) -> Result<Vec<MySqlRow>, ConnectorError> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| ConnectorError::database("connection is closed", context))?;
        let mut query = sqlx::query(query);
        for value in binds {
            query = query.bind(*value);
        }
        self.runtime
            .block_on(query.fetch_all(conn))
            .map_err(|e| ConnectorError::database(e, context))
    }

    fn table_names(&mut self) -> Result<Vec<String>, ConnectorError> {
        let database = self.config.database.clone();
        let rows = self.fetch_rows(
            TABLE_NAMES_QUERY,
            &[database.as_str()],
            "listing MySQL tables",
        )?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("TABLE_NAME"))
            .collect::<Result<_, _>>()
            .map_err(|e| ConnectorError::database(e, "reading MySQL table names"))
    }

    fn columns(&mut self, table_name: &str) -> Result<Vec<ColumnRow>, ConnectorError> {
        let query = r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(DATA_TYPE AS CHAR(64)) AS DATA_TYPE,
                CAST(COLUMN_KEY AS CHAR(3)) AS COLUMN_KEY
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;
        let database = self.config.database.clone();
        let rows = self.fetch_rows(
            query,
            &[database.as_str(), table_name],
            "loading MySQL columns",
        )?;

        let columns = rows
            .iter()
            .map(|row| -> Result<ColumnRow, sqlx::Error> {
                Ok(ColumnRow {
                    column_name: row.try_get("COLUMN_NAME")?,
                    data_type: row.try_get("DATA_TYPE")?,
                    column_key: row.try_get("COLUMN_KEY")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| ConnectorError::database(e, "reading MySQL columns"))?;

        debug!("Loaded {} columns for {}", columns.len(), table_name);
        Ok(columns)
    }

    fn key_column_rows(&mut self) -> Result<Vec<KeyColumnRow>, ConnectorError> {
        let query = r#"
            SELECT
                CAST(CONSTRAINT_NAME AS CHAR(255)) AS CONSTRAINT_NAME,
                CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME,
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(REFERENCED_TABLE_NAME AS CHAR(255)) AS REFERENCED_TABLE_NAME,
                CAST(REFERENCED_COLUMN_NAME AS CHAR(255)) AS REFERENCED_COLUMN_NAME
            FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE
            WHERE TABLE_SCHEMA = ? AND REFERENCED_TABLE_SCHEMA = ?
            ORDER BY TABLE_NAME, CONSTRAINT_NAME, ORDINAL_POSITION
        "#;
        let database = self.config.database.clone();
        let rows = self.fetch_rows(
            query,
            &[database.as_str(), database.as_str()],
            "loading MySQL foreign keys",
        )?;

        rows.iter()
            .map(|row| -> Result<KeyColumnRow, sqlx::Error> {
                Ok(KeyColumnRow {
                    constraint_name: row.try_get("CONSTRAINT_NAME")?,
                    table_name: row.try_get("TABLE_NAME")?,
                    column_name: row.try_get("COLUMN_NAME")?,
                    referenced_table_name: row.try_get("REFERENCED_TABLE_NAME")?,
                    referenced_column_name: row.try_get("REFERENCED_COLUMN_NAME")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| ConnectorError::database(e, "reading MySQL foreign keys"))
    }

    /// Stream one table into a CSV file, returning the number of rows.
    fn export_table(&mut self, table_name: &str, path: &Path) -> Result<usize, ExportError> {
        let sql = format!("SELECT * FROM {}", quote_ident(table_name));
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| ConnectorError::database("connection is closed", "exporting table"))?;

        self.runtime.block_on(async move {
            let header: Vec<String> = {
                let statement = (&mut *conn)
                    .prepare(sql.as_str())
                    .await
                    .map_err(|e| ConnectorError::database(e, "preparing table export"))?;
                statement
                    .columns()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            };

            let mut writer = CsvTableWriter::create(path)?;
            let mut buffer = RowBuffer::new(&header);
            let mut rows = sqlx::query(sql.as_str()).fetch(&mut *conn);

            while let Some(row) = rows
                .try_next()
                .await
                .map_err(|e| ConnectorError::database(e, "reading table rows"))?
            {
                buffer
                    .push(&row)
                    .map_err(|e| ConnectorError::database(e, "decoding table rows"))?;
                if buffer.len() >= EXPORT_BATCH_ROWS {
                    writer.write(&buffer.take_batch()?)?;
                }
            }
            // Always written so that empty tables still get a header
            writer.write(&buffer.take_batch()?)?;
            writer.finish()
        })
    }
}

impl Connector for MysqlConnector {
    fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    fn export_tables(&mut self, output_dir: &Path) -> Result<(), ExportError> {
        for table_name in self.metadata.get_table_names() {
            let path = table_path(output_dir, &table_name)?;
            let rows = self.export_table(&table_name, &path)?;
            info!("Exported {} rows from {}", rows, table_name);
        }
        Ok(())
    }
}

impl Drop for MysqlConnector {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = self.runtime.block_on(conn.close()) {
                warn!("Failed to close MySQL connection: {}", e);
            }
        }
    }
}
