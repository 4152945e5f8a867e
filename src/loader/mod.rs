//! The load pipeline: song corpus, placeholder seeding, log corpus.
//!
//! One pipeline, run end to end by [`run`]:
//! 1. every file of the song corpus upserts one song and one artist row
//! 2. [`seed_placeholders`] inserts the sentinel "unknown" song/artist rows
//!    and hands their ids back as an explicit [`PlaceholderIds`] value
//! 3. every file of the log corpus is filtered to song-play events, the
//!    time and user dimensions are upserted, and one fact row lands per
//!    event, resolved against the song store or the sentinels
//!
//! Files are processed strictly one at a time over the single shared
//! connection; every insert commits on its own. Duplicate keys are skips
//! with a diagnostic, malformed records abort the run.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db;
use crate::error::Result;
use crate::model::{Artist, Song};
use crate::records::{self, LogEvent};
use crate::scanner;

/// Title given to the sentinel song row.
pub const UNKNOWN_SONG_TITLE: &str = "Unknown Song";
/// Name given to the sentinel artist row.
pub const UNKNOWN_ARTIST_NAME: &str = "Unknown Artist";

/// The sentinel ids backing unresolved song/artist lookups.
///
/// Returned by [`seed_placeholders`] and threaded into the log loader as a
/// parameter — never ambient state. The ids are string-encoded integers and
/// may be greater than `"1"` when real corpus rows already occupy the seed
/// keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderIds {
    pub song_id: String,
    pub artist_id: String,
}

/// What a full run did, for the end-of-run report.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub song_files: usize,
    pub log_files: usize,
    pub songplays: usize,
    pub placeholders: PlaceholderIds,
}

/// Load one song-metadata file: upsert its artist row, then its song row.
///
/// A duplicate key on either insert is a skip with a diagnostic; the file
/// still counts as processed.
pub async fn process_song_file(pool: &SqlitePool, path: &Path) -> Result<()> {
    let record = records::read_song_file(path)?;

    let artist = record.artist();
    if !db::insert_artist(pool, &artist).await? {
        info!("Skipped artist {} because it is already in the db", artist.artist_id);
    }

    let song = record.song();
    if !db::insert_song(pool, &song).await? {
        info!("Skipped song {} because it is already in the db", song.song_id);
    }

    Ok(())
}

/// Insert the sentinel song and artist rows and return the ids used.
///
/// Ids are string-encoded integers starting at `"1"`; on collision with an
/// existing key the id increments and the insert retries until one lands.
/// Runs after the song corpus so the sentinels never shadow real rows, and
/// before the log corpus whose lookup misses they backfill.
pub async fn seed_placeholders(pool: &SqlitePool) -> Result<PlaceholderIds> {
    // Artist first so the sentinel song has a referent.
    let mut key: u64 = 1;
    let artist_id = loop {
        let candidate = Artist {
            artist_id: key.to_string(),
            name: UNKNOWN_ARTIST_NAME.to_string(),
            location: None,
            latitude: None,
            longitude: None,
        };
        if db::insert_artist(pool, &candidate).await? {
            break candidate.artist_id;
        }
        key += 1;
    };

    let mut key: u64 = 1;
    let song_id = loop {
        let candidate = Song {
            song_id: key.to_string(),
            title: UNKNOWN_SONG_TITLE.to_string(),
            artist_id: artist_id.clone(),
            year: 0,
            duration: 0.0,
        };
        if db::insert_song(pool, &candidate).await? {
            break candidate.song_id;
        }
        key += 1;
    };

    info!(song_id = %song_id, artist_id = %artist_id, "Seeded placeholder rows");
    Ok(PlaceholderIds { song_id, artist_id })
}

/// Load one activity-log file. Returns the number of fact rows inserted.
///
/// Non-song-play events are dropped entirely. For each retained event the
/// time and user rows are insert-if-absent (duplicate timestamps and user
/// ids within or across files collide on their primary key and are
/// skipped), then the fact row is inserted with resolved or sentinel ids.
pub async fn process_log_file(
    pool: &SqlitePool,
    path: &Path,
    placeholders: &PlaceholderIds,
) -> Result<usize> {
    let events = records::read_log_file(path)?;
    let mut loaded = 0;

    for event in events.iter().filter(|e| e.is_song_play()) {
        let time = event.time_row(path)?;
        if !db::insert_time(pool, &time).await? {
            debug!("Skipped time row {} because it is already in the db", time.start_time);
        }

        let user = event.user_row(path)?;
        if !db::insert_user(pool, &user).await? {
            debug!("Skipped user {} because they are already in the db", user.user_id);
        }

        let (song_id, artist_id) = resolve_song(pool, event, placeholders).await?;
        let play = event.songplay_row(path, song_id, artist_id)?;
        db::insert_songplay(pool, &play).await?;
        loaded += 1;
    }

    Ok(loaded)
}

/// Resolve an event's (song title, artist name, duration) to stored ids,
/// falling back to the sentinels when the corpus has no match or the event
/// is missing one of the three lookup fields.
async fn resolve_song(
    pool: &SqlitePool,
    event: &LogEvent,
    placeholders: &PlaceholderIds,
) -> Result<(String, String)> {
    if let (Some(song), Some(artist), Some(length)) = (&event.song, &event.artist, event.length) {
        if let Some(found) = db::find_song(pool, song, artist, length).await? {
            return Ok(found);
        }
    }
    Ok((placeholders.song_id.clone(), placeholders.artist_id.clone()))
}

/// Load every file of the song corpus. Returns the file count.
pub async fn load_song_corpus(pool: &SqlitePool, root: &Path) -> Result<usize> {
    let files = scanner::find_json_files(root);
    info!("{} files found in {}", files.len(), root.display());

    for (i, file) in files.iter().enumerate() {
        process_song_file(pool, file).await?;
        info!("{}/{} files processed. Processed {}", i + 1, files.len(), file.display());
    }

    Ok(files.len())
}

/// Load every file of the log corpus. Returns (file count, fact rows).
pub async fn load_log_corpus(
    pool: &SqlitePool,
    root: &Path,
    placeholders: &PlaceholderIds,
) -> Result<(usize, usize)> {
    let files = scanner::find_json_files(root);
    info!("{} files found in {}", files.len(), root.display());

    let mut songplays = 0;
    for (i, file) in files.iter().enumerate() {
        songplays += process_log_file(pool, file, placeholders).await?;
        info!("{}/{} files processed. Processed {}", i + 1, files.len(), file.display());
    }

    Ok((files.len(), songplays))
}

/// The full pipeline: song corpus, then sentinels, then log corpus.
pub async fn run(pool: &SqlitePool, song_root: &Path, log_root: &Path) -> Result<RunSummary> {
    let song_files = load_song_corpus(pool, song_root).await?;
    let placeholders = seed_placeholders(pool).await?;
    let (log_files, songplays) = load_log_corpus(pool, log_root, &placeholders).await?;

    Ok(RunSummary {
        song_files,
        log_files,
        songplays,
        placeholders,
    })
}
