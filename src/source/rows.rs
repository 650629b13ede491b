// file: src/source/rows.rs
// description: relational row source read through the sqlx any driver
// reference: https://docs.rs/sqlx/latest/sqlx/any/index.html

use crate::config::DatabaseConfig;
use crate::error::{IngestError, Result};
use crate::models::Document;
use futures::stream::BoxStream;
use sqlx::AnyConnection;
use sqlx::any::{AnyRow, install_default_drivers};
use sqlx::{Connection, Row};
use tracing::{debug, info};

pub const TITLE_FIELD: &str = "title";
pub const TEXT_FIELD: &str = "text";

const COLUMNS: [&str; 3] = ["id", TITLE_FIELD, TEXT_FIELD];

pub struct RowReader {
    config: DatabaseConfig,
}

impl RowReader {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub async fn connect(&self) -> Result<AnyConnection> {
        install_default_drivers();

        info!("Connecting to database: {}", redact(&self.config.url));
        let conn = AnyConnection::connect(&self.config.url).await?;
        Ok(conn)
    }

    /// Streams the configured query's rows over `conn`.
    pub fn rows<'a>(
        &'a self,
        conn: &'a mut AnyConnection,
    ) -> BoxStream<'a, std::result::Result<AnyRow, sqlx::Error>> {
        debug!("Executing query: {}", self.config.query);
        sqlx::query(&self.config.query).fetch(conn)
    }

    /// Sends the protocol-level goodbye and waits for the connection to shut down.
    pub async fn close(&self, conn: AnyConnection) -> Result<()> {
        conn.close().await?;
        debug!("Database connection closed");
        Ok(())
    }

    /// Maps `id, title, text` by position. A NULL title or text leaves the
    /// field out; a NULL id is a decode failure.
    pub fn to_document(row: &AnyRow) -> Result<Document> {
        if row.len() < COLUMNS.len() {
            return Err(IngestError::RowDecode {
                column: COLUMNS[row.len()].to_string(),
                message: format!(
                    "query returned {} columns, expected {}",
                    row.len(),
                    COLUMNS.len()
                ),
            });
        }

        let id = column_text(row, 0)?.ok_or_else(|| IngestError::RowDecode {
            column: COLUMNS[0].to_string(),
            message: "id is NULL".to_string(),
        })?;

        let mut document = Document::new(id);
        document.add_optional_field(TITLE_FIELD, column_text(row, 1)?);
        document.add_optional_field(TEXT_FIELD, column_text(row, 2)?);
        Ok(document)
    }
}

/// Text columns verbatim; integers as decimal text. Floats keep their
/// fractional part, so a stored `1.0` stays `1.0`.
fn column_text(row: &AnyRow, index: usize) -> Result<Option<String>> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return Ok(value);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return Ok(value.map(|v| v.to_string()));
    }
    row.try_get::<Option<f64>, _>(index)
        .map(|value| value.map(|v| format!("{:?}", v)))
        .map_err(|e| IngestError::RowDecode {
            column: COLUMNS[index].to_string(),
            message: e.to_string(),
        })
}

/// Hides the password component of a connection URL for logging.
fn redact(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}
