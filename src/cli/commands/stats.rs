//! Store inspection and config scaffolding commands.

use tokio::runtime::Runtime;

use crate::config;
use crate::db;

/// Print row counts for the five target tables.
pub fn cmd_stats(rt: &Runtime, db_url: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let counts = db::table_counts(&pool).await?;

        println!("songs     {}", counts.songs);
        println!("artists   {}", counts.artists);
        println!("users     {}", counts.users);
        println!("time      {}", counts.time);
        println!("songplays {}", counts.songplays);
        Ok(())
    })
}

/// Write a default config file so operators have something to edit.
pub fn cmd_init_config() -> anyhow::Result<()> {
    let config = config::Config::default();
    config::save(&config)?;

    match config::config_path() {
        Some(path) => println!("Wrote default config to {}", path.display()),
        None => println!("Wrote default config."),
    }
    Ok(())
}
