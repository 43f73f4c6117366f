//! Prints the column layout of the `clubs` and `events` tables and every table
//! in the public schema of the configured database.

use club_hub::{config::Config, db};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use envconfig::Envconfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init_from_env()?;
    let conn = &mut AsyncPgConnection::establish(&config.database_url()?).await?;

    for table in ["clubs", "events"] {
        println!("=== {table} table structure ===");
        for column in db::describe_table(conn, table).await? {
            println!(
                "  {:<20} {:<30} nullable={:<3} default={}",
                column.column_name,
                column.data_type,
                column.is_nullable,
                column.column_default.as_deref().unwrap_or("-"),
            );
        }
        println!();
    }

    println!("=== tables ===");
    for table in db::list_tables(conn).await? {
        println!("  {table}");
    }
    Ok(())
}
