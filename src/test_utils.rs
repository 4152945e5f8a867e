//! Test utilities and fixtures for songplay-etl tests.
//!
//! Provides a temp-database factory and NDJSON corpus writers so the
//! module tests don't repeat fixture plumbing.

use std::path::{Path, PathBuf};

use serde_json::json;
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::model::{Artist, Song};

/// Creates a temporary database for testing.
///
/// The database lives in a temporary directory that is cleaned up when the
/// returned `TempDir` is dropped; keep it alive for the duration of the
/// test. Migrations run automatically.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::db::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// A song row matching [`sample_artist`], lifted from the real corpus.
pub fn sample_song() -> Song {
    Song {
        song_id: "SOMZWCG12A8C13C480".into(),
        title: "I Didn't Mean To".into(),
        artist_id: "ARD7TVE1187B99BFB1".into(),
        year: 0,
        duration: 218.93179,
    }
}

/// An artist row matching [`sample_song`].
pub fn sample_artist() -> Artist {
    Artist {
        artist_id: "ARD7TVE1187B99BFB1".into(),
        name: "Casual".into(),
        location: Some("California - LA".into()),
        latitude: None,
        longitude: None,
    }
}

/// Write a one-record song-metadata file the way the corpus lays it out.
pub fn write_song_file(dir: &Path, name: &str, song: &Song, artist: &Artist) -> PathBuf {
    let line = json!({
        "num_songs": 1,
        "song_id": song.song_id,
        "title": song.title,
        "artist_id": song.artist_id,
        "year": song.year,
        "duration": song.duration,
        "artist_name": artist.name,
        "artist_location": artist.location,
        "artist_latitude": artist.latitude,
        "artist_longitude": artist.longitude,
    });
    let path = dir.join(name);
    std::fs::write(&path, format!("{line}\n")).expect("Failed to write song file");
    path
}

/// One song-play event line, with `userId` string-encoded as in the real log.
pub fn song_play_line(
    song: &str,
    artist: &str,
    length: f64,
    ts: i64,
    user_id: i64,
    session_id: i64,
) -> String {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Jacob",
        "gender": "M",
        "itemInSession": 1,
        "lastName": "Klein",
        "length": length,
        "level": "paid",
        "location": "Tampa-St. Petersburg-Clearwater, FL",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1_540_558_108_796.0,
        "sessionId": session_id,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "\"Mozilla/5.0\"",
        "userId": user_id.to_string(),
    })
    .to_string()
}

/// A non-song-play page action (dropped by the log loader).
pub fn page_line(page: &str, ts: i64, user_id: i64) -> String {
    json!({
        "artist": null,
        "auth": "Logged In",
        "firstName": "Walter",
        "gender": "M",
        "itemInSession": 0,
        "lastName": "Frye",
        "length": null,
        "level": "free",
        "location": "San Francisco-Oakland-Hayward, CA",
        "method": "GET",
        "page": page,
        "registration": 1_540_919_166_796.0,
        "sessionId": 38,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": "\"Mozilla/5.0\"",
        "userId": user_id.to_string(),
    })
    .to_string()
}

/// Write an activity-log file, one event per line.
pub fn write_log_file(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).expect("Failed to write log file");
    path
}
