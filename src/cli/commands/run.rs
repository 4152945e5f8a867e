//! Pipeline-running commands.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::db;
use crate::loader;

/// Run the full pipeline against one database.
pub fn cmd_run(rt: &Runtime, song_root: &Path, log_root: &Path, db_url: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;

        let summary = loader::run(&pool, song_root, log_root).await?;
        println!(
            "Run complete: {} song files, {} log files, {} songplays loaded.",
            summary.song_files, summary.log_files, summary.songplays
        );
        println!(
            "Sentinel ids: song {}, artist {}.",
            summary.placeholders.song_id, summary.placeholders.artist_id
        );

        let counts = db::table_counts(&pool).await?;
        println!(
            "Store now holds {} songs, {} artists, {} users, {} time rows, {} songplays.",
            counts.songs, counts.artists, counts.users, counts.time, counts.songplays
        );
        Ok(())
    })
}

/// Load only the song-metadata corpus.
pub fn cmd_songs(rt: &Runtime, root: &Path, db_url: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let files = loader::load_song_corpus(&pool, root).await?;
        println!("Song corpus complete: {files} files processed.");
        Ok(())
    })
}

/// Load only the activity-log corpus, seeding sentinels first so lookup
/// misses always have a target.
pub fn cmd_logs(rt: &Runtime, root: &Path, db_url: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let placeholders = loader::seed_placeholders(&pool).await?;
        let (files, songplays) = loader::load_log_corpus(&pool, root, &placeholders).await?;
        println!("Log corpus complete: {files} files processed, {songplays} songplays loaded.");
        Ok(())
    })
}
