use sqlx::{Connection, MySqlConnection, PgConnection};
use tracing::info;

use crate::error::InitError;
use crate::models::{InitConfig, Mode};

/// Execute the configured SQL script against the configured database.
///
/// The script is read before connecting, and sent as a single batch over
/// one connection.
pub async fn run(config: &InitConfig) -> Result<(), InitError> {
    let script = tokio::fs::read_to_string(&config.script)
        .await
        .map_err(|source| InitError::ReadScript {
            path: config.script.clone(),
            source,
        })?;

    info!(
        event = "init_started",
        mode = %config.mode,
        script = %config.script.display(),
        bytes = script.len(),
        message = "Applying SQL script"
    );

    match config.mode {
        Mode::Pg => {
            let mut conn = PgConnection::connect(&config.dsn)
                .await
                .map_err(InitError::Connect)?;
            sqlx::raw_sql(&script)
                .execute(&mut conn)
                .await
                .map_err(InitError::Execute)?;
            conn.close().await.map_err(InitError::Connect)?;
        }
        Mode::My => {
            let mut conn = MySqlConnection::connect(&config.dsn)
                .await
                .map_err(InitError::Connect)?;
            sqlx::raw_sql(&script)
                .execute(&mut conn)
                .await
                .map_err(InitError::Execute)?;
            conn.close().await.map_err(InitError::Connect)?;
        }
    }

    info!(event = "init_completed", message = "SQL script applied");
    Ok(())
}
