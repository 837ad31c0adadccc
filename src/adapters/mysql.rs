use crate::config::DatabaseSettings;
use crate::core::ScorerSink;
use crate::domain::model::RankedScorer;
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, validate_sql_identifier};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::str::FromStr;

pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS `{table}` (\
            `position` INT, \
            `player` VARCHAR(255), \
            `club` VARCHAR(255), \
            `total_goals` INT, \
            `penalty_goals` INT, \
            `assists` INT, \
            `matches` INT, \
            `mins` INT, \
            `age` INT, \
            PRIMARY KEY (`player`, `club`))"
    )
}

/// `position` is only written on first insert; re-runs refresh the statistics.
pub fn upsert_sql(table: &str) -> String {
    format!(
        "INSERT INTO `{table}` \
            (`position`, `player`, `club`, `total_goals`, `penalty_goals`, `assists`, `matches`, `mins`, `age`) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON DUPLICATE KEY UPDATE \
            `total_goals` = VALUES(`total_goals`), \
            `penalty_goals` = VALUES(`penalty_goals`), \
            `assists` = VALUES(`assists`), \
            `matches` = VALUES(`matches`), \
            `mins` = VALUES(`mins`), \
            `age` = VALUES(`age`)"
    )
}

pub fn connect_options(settings: &DatabaseSettings) -> Result<MySqlConnectOptions> {
    if let Some(url) = &settings.url {
        return Ok(MySqlConnectOptions::from_str(url)?);
    }

    let name = validate_required_field("database.name", &settings.name)?;
    let user = validate_required_field("database.user", &settings.user)?;

    let mut options = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(user)
        .database(name);
    if let Some(password) = &settings.password {
        options = options.password(password);
    }
    Ok(options)
}

/// MySQL sink backed by a lazily connected sqlx pool.
pub struct MySqlSink {
    pool: MySqlPool,
    table: String,
}

impl MySqlSink {
    /// Builds the pool without connecting; the first statement opens the connection.
    pub fn connect(settings: &DatabaseSettings, table: &str) -> Result<Self> {
        validate_sql_identifier("load.table", table)?;
        let options = connect_options(settings)?;
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }
}

#[async_trait]
impl ScorerSink for MySqlSink {
    fn table(&self) -> &str {
        &self.table
    }

    async fn ensure_table(&self) -> Result<()> {
        sqlx::query(&create_table_sql(&self.table))
            .execute(&self.pool)
            .await?;
        tracing::info!("✅ MySQL connection ready, table `{}` ensured", self.table);
        Ok(())
    }

    async fn upsert(&self, rows: &[RankedScorer]) -> Result<u64> {
        let sql = upsert_sql(&self.table);
        let mut tx = self.pool.begin().await?;
        let mut rows_affected = 0;

        for row in rows {
            let s = &row.scorer;
            let result = sqlx::query(&sql)
                .bind(row.position)
                .bind(&s.player)
                .bind(&s.club)
                .bind(s.total_goals)
                .bind(s.penalty_goals)
                .bind(s.assists)
                .bind(s.matches)
                .bind(s.mins)
                .bind(s.age)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(done) => rows_affected += done.rows_affected(),
                Err(e) => {
                    tracing::error!("❌ Upsert of {} ({}) failed: {}", s.player, s.club, e);
                    if let Err(rollback_error) = tx.rollback().await {
                        tracing::warn!("Rollback failed: {}", rollback_error);
                    }
                    return Err(e.into());
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            "✅ Data inserted or updated successfully. Rows affected: {}",
            rows_affected
        );
        Ok(rows_affected)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed.");
    }
}
