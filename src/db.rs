use anyhow::{anyhow, Context};
use diesel::{
    sql_query,
    sql_types::{Nullable, Text},
    Connection, QueryableByName,
};
use diesel_async::{
    async_connection_wrapper::AsyncConnectionWrapper,
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection, RunQueryDsl,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<AsyncPgConnection>;

pub fn connect_to_db(db_url: &str, max_size: usize) -> anyhow::Result<DbPool> {
    let db_config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
    Pool::builder(db_config)
        .max_size(max_size)
        .build()
        .context("failed to build database pool")
}

/// Applies pending migrations on a dedicated blocking connection. Must not be
/// called from inside an async runtime; see [`run_migrations`].
pub fn run_migrations_blocking(db_url: &str) -> anyhow::Result<()> {
    let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(db_url)
        .context("failed to connect for migrations")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("failed to run migrations: {e}"))?;
    for version in applied {
        tracing::info!("applied migration {version}");
    }
    Ok(())
}

pub async fn run_migrations(db_url: &str) -> anyhow::Result<()> {
    let db_url = db_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations_blocking(&db_url))
        .await
        .context("migration task panicked")?
}

#[derive(Debug, QueryableByName)]
pub struct ColumnInfo {
    #[diesel(sql_type = Text)]
    pub column_name: String,
    #[diesel(sql_type = Text)]
    pub data_type: String,
    #[diesel(sql_type = Text)]
    pub is_nullable: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub column_default: Option<String>,
}

#[derive(Debug, QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    table_name: String,
}

pub async fn describe_table(
    conn: &mut AsyncPgConnection,
    table: &str,
) -> diesel::QueryResult<Vec<ColumnInfo>> {
    sql_query(
        "SELECT column_name::text, data_type::text, is_nullable::text, column_default::text \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind::<Text, _>(table)
    .load(conn)
    .await
}

pub async fn list_tables(conn: &mut AsyncPgConnection) -> diesel::QueryResult<Vec<String>> {
    let tables: Vec<TableName> = sql_query(
        "SELECT table_name::text FROM information_schema.tables \
         WHERE table_schema = 'public' ORDER BY table_name",
    )
    .load(conn)
    .await?;
    Ok(tables.into_iter().map(|t| t.table_name).collect())
}
