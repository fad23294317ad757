//! PostgreSQL backend: one `PgConnection`, opened then closed.

use sqlx::Connection;
use sqlx::postgres::PgConnection;
use tracing::debug;

use crate::database::DbError;

#[derive(Debug, Clone)]
pub struct PostgresConnector;

impl PostgresConnector {
    pub async fn connect(&self, uri: &str) -> Result<(), DbError> {
        let conn = PgConnection::connect(uri)
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;

        debug!("postgres handshake complete, closing probe connection");
        conn.close()
            .await
            .map_err(|e| DbError::Connect(format!("close failed: {e}")))
    }
}
