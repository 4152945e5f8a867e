//! Storage boundary for the star schema.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! Provides the operations the load pipeline depends on:
//! - insert-if-absent writes for the four keyed tables (songs, artists,
//!   users, time), reporting whether a row actually landed
//! - the songplay fact insert (synthetic key assigned by the store)
//! - the point lookup resolving (title, artist name, duration) to ids
//!
//! Duplicate keys are handled with `INSERT ... ON CONFLICT DO NOTHING`
//! rather than by catching constraint violations, so "already present" is a
//! typed result (`Ok(false)`) and every other database failure stays an
//! error. Each statement commits on its own; there is no batching
//! transaction, and partial progress survives an aborted run.

use std::path::Path;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::model::{Artist, Song, Songplay, TimeRow, User};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "songplays.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{DEFAULT_DB_NAME}"),
    }
}

/// Initialize the database and run migrations.
///
/// Creates the database file if it doesn't exist and establishes the pool.
/// The pool is capped at a single connection: the whole run shares one
/// connection and statements execute strictly in sequence.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Insert an artist row, skipping silently if the id already exists.
///
/// Returns whether a new row was inserted.
pub async fn insert_artist(pool: &SqlitePool, artist: &Artist) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO artists (artist_id, name, location, latitude, longitude)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(artist_id) DO NOTHING
        "#,
    )
    .bind(&artist.artist_id)
    .bind(&artist.name)
    .bind(&artist.location)
    .bind(artist.latitude)
    .bind(artist.longitude)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Insert a song row, skipping silently if the id already exists.
///
/// Returns whether a new row was inserted.
pub async fn insert_song(pool: &SqlitePool, song: &Song) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO songs (song_id, title, artist_id, year, duration)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(song_id) DO NOTHING
        "#,
    )
    .bind(&song.song_id)
    .bind(&song.title)
    .bind(&song.artist_id)
    .bind(song.year)
    .bind(song.duration)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Insert a user row, skipping silently if the id already exists.
///
/// The conflict policy is the same first-write-wins skip as every other
/// table: a later event with a different subscription level does not
/// overwrite the stored row.
pub async fn insert_user(pool: &SqlitePool, user: &User) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_id, first_name, last_name, gender, level)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user.user_id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.gender)
    .bind(&user.level)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Insert a time-dimension row, skipping silently if the timestamp is
/// already present. One row per distinct event timestamp.
pub async fn insert_time(pool: &SqlitePool, time: &TimeRow) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO time (start_time, hour, day, week, month, year, weekday)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(start_time) DO NOTHING
        "#,
    )
    .bind(time.start_time)
    .bind(time.hour)
    .bind(time.day)
    .bind(time.week)
    .bind(time.month)
    .bind(time.year)
    .bind(time.weekday)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Insert a songplay fact row and return its synthetic key.
pub async fn insert_songplay(pool: &SqlitePool, play: &Songplay) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO songplays
            (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(play.start_time)
    .bind(play.user_id)
    .bind(&play.level)
    .bind(&play.song_id)
    .bind(&play.artist_id)
    .bind(play.session_id)
    .bind(&play.location)
    .bind(&play.user_agent)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Resolve a log event's (song title, artist name, duration) to the stored
/// (song_id, artist_id) pair.
///
/// The match is exact on all three fields; duration round-trips through the
/// store bit-for-bit so float equality is sound here. Returns `None` when
/// the corpus has no such song — callers substitute the sentinel ids.
pub async fn find_song(
    pool: &SqlitePool,
    title: &str,
    artist_name: &str,
    duration: f64,
) -> sqlx::Result<Option<(String, String)>> {
    sqlx::query_as(
        r#"
        SELECT s.song_id, s.artist_id
        FROM songs s
        JOIN artists a ON s.artist_id = a.artist_id
        WHERE s.title = ? AND a.name = ? AND s.duration = ?
        "#,
    )
    .bind(title)
    .bind(artist_name)
    .bind(duration)
    .fetch_optional(pool)
    .await
}

/// Row counts of the five target tables, for the `stats` command and the
/// end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub songs: i64,
    pub artists: i64,
    pub users: i64,
    pub time: i64,
    pub songplays: i64,
}

/// Count the rows in every target table.
pub async fn table_counts(pool: &SqlitePool) -> sqlx::Result<TableCounts> {
    let songs: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    let artists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM artists")
        .fetch_one(pool)
        .await?;
    let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    let time: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM time")
        .fetch_one(pool)
        .await?;
    let songplays: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songplays")
        .fetch_one(pool)
        .await?;

    Ok(TableCounts {
        songs: songs.0,
        artists: artists.0,
        users: users.0,
        time: time.0,
        songplays: songplays.0,
    })
}
