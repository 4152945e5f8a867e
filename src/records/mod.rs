//! Source-record parsing for the two corpora.
//!
//! Both corpora are newline-delimited JSON. A song-metadata file carries
//! exactly one object; an activity-log file carries one object per line.
//! Numeric fields go through the lenient [`crate::coerce`] adapters because
//! the exporters emit them inconsistently (numbers vs. numeric strings,
//! `""` for absent values).
//!
//! Parsing is strict about shape: a line that does not deserialize aborts
//! the run with a [`Error::Malformed`] naming the file and line. Silently
//! loading a garbled row would corrupt the target tables.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::coerce;
use crate::error::{Error, Result};
use crate::model::{Artist, Song, Songplay, TimeRow, User};

/// `page` value that marks a track being played; every other page action
/// is dropped by the log loader.
pub const SONG_PLAY_PAGE: &str = "NextSong";

/// One record from the song-metadata corpus.
///
/// Field names match the source JSON. The flat record carries both the song
/// and the artist entity; [`SongRecord::song`] and [`SongRecord::artist`]
/// project them out.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    #[serde(deserialize_with = "coerce::int_lenient")]
    pub year: i64,
    #[serde(deserialize_with = "coerce::float_lenient")]
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_float_lenient")]
    pub artist_latitude: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_float_lenient")]
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    /// Project the song row.
    pub fn song(&self) -> Song {
        Song {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    /// Project the artist row.
    pub fn artist(&self) -> Artist {
        Artist {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// One event from the activity log.
///
/// Only the fields the pipeline consumes are kept; the log's remaining
/// fields (`auth`, `method`, `status`, ...) are ignored. Most fields are
/// optional because non-song-play events (login pages, logged-out browsing)
/// leave them null or empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_float_lenient")]
    pub length: Option<f64>,
    pub level: String,
    #[serde(default)]
    pub location: Option<String>,
    pub page: String,
    #[serde(deserialize_with = "coerce::int_lenient")]
    pub session_id: i64,
    #[serde(default)]
    pub song: Option<String>,
    /// Millisecond-epoch event timestamp
    #[serde(deserialize_with = "coerce::int_lenient")]
    pub ts: i64,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_int_lenient")]
    pub user_id: Option<i64>,
}

impl LogEvent {
    /// Whether this event is a track being played.
    pub fn is_song_play(&self) -> bool {
        self.page == SONG_PLAY_PAGE
    }

    /// Decompose the event timestamp into its time-dimension row.
    pub fn time_row(&self, path: &Path) -> Result<TimeRow> {
        TimeRow::from_epoch_ms(self.ts).ok_or_else(|| {
            Error::malformed(path, format!("timestamp {} is out of range", self.ts))
        })
    }

    /// Project the user row. Errors if the event has no user id, which a
    /// song-play event always should.
    pub fn user_row(&self, path: &Path) -> Result<User> {
        let user_id = self.user_id.ok_or_else(|| {
            Error::malformed(path, format!("song-play event at ts {} has no user id", self.ts))
        })?;
        Ok(User {
            user_id,
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            gender: self.gender.clone().unwrap_or_default(),
            level: self.level.clone(),
        })
    }

    /// Build the fact row once the song/artist keys are resolved.
    pub fn songplay_row(&self, path: &Path, song_id: String, artist_id: String) -> Result<Songplay> {
        let user_id = self.user_id.ok_or_else(|| {
            Error::malformed(path, format!("song-play event at ts {} has no user id", self.ts))
        })?;
        Ok(Songplay {
            start_time: self.ts,
            user_id,
            level: self.level.clone(),
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location.clone().unwrap_or_default(),
            user_agent: self.user_agent.clone().unwrap_or_default(),
        })
    }
}

/// Read the single record of a song-metadata file.
///
/// The corpus format is one JSON object per file; trailing blank lines are
/// tolerated, an empty file is not.
pub fn read_song_file(path: &Path) -> Result<SongRecord> {
    let reader = BufReader::new(File::open(path)?);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        return serde_json::from_str(&line)
            .map_err(|e| Error::malformed(path, format!("line {}: {e}", idx + 1)));
    }
    Err(Error::malformed(path, "no record found"))
}

/// Read every event of an activity-log file, one JSON object per line.
pub fn read_log_file(path: &Path) -> Result<Vec<LogEvent>> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: LogEvent = serde_json::from_str(&line)
            .map_err(|e| Error::malformed(path, format!("line {}: {e}", idx + 1)))?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SONG_LINE: &str = r#"{"num_songs": 1, "artist_id": "ARD7TVE1187B99BFB1", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "SOMZWCG12A8C13C480", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}"#;

    const NEXT_SONG_LINE: &str = r#"{"artist":"Sydney Youngblood","auth":"Logged In","firstName":"Jacob","gender":"M","itemInSession":53,"lastName":"Klein","length":238.07955,"level":"paid","location":"Tampa-St. Petersburg-Clearwater, FL","method":"PUT","page":"NextSong","registration":1540558108796.0,"sessionId":954,"song":"Ain't No Sunshine","status":200,"ts":1543449657796,"userAgent":"\"Mozilla\/5.0\"","userId":"73"}"#;

    const HOME_LINE: &str = r#"{"artist":null,"auth":"Logged In","firstName":"Walter","gender":"M","itemInSession":0,"lastName":"Frye","length":null,"level":"free","location":"San Francisco-Oakland-Hayward, CA","method":"GET","page":"Home","registration":1540919166796.0,"sessionId":38,"song":null,"status":200,"ts":1541105830796,"userAgent":"\"Mozilla\/5.0\"","userId":"39"}"#;

    #[test]
    fn test_song_record_projections() {
        let record: SongRecord = serde_json::from_str(SONG_LINE).unwrap();
        let song = record.song();
        assert_eq!(song.song_id, "SOMZWCG12A8C13C480");
        assert_eq!(song.year, 0);
        assert_eq!(song.duration, 218.93179);

        let artist = record.artist();
        assert_eq!(artist.artist_id, "ARD7TVE1187B99BFB1");
        assert_eq!(artist.name, "Casual");
        assert_eq!(artist.latitude, None);
    }

    #[test]
    fn test_log_event_fields_coerce() {
        let event: LogEvent = serde_json::from_str(NEXT_SONG_LINE).unwrap();
        assert!(event.is_song_play());
        // userId arrives as a string in the log
        assert_eq!(event.user_id, Some(73));
        assert_eq!(event.session_id, 954);
        assert_eq!(event.ts, 1_543_449_657_796);
        assert_eq!(event.length, Some(238.07955));
    }

    #[test]
    fn test_non_song_play_event() {
        let event: LogEvent = serde_json::from_str(HOME_LINE).unwrap();
        assert!(!event.is_song_play());
        assert_eq!(event.song, None);
        assert_eq!(event.length, None);
    }

    #[test]
    fn test_logged_out_event_has_no_user() {
        let line = r#"{"artist":null,"auth":"Logged Out","firstName":null,"gender":null,"itemInSession":0,"lastName":null,"length":null,"level":"free","location":null,"method":"GET","page":"Home","registration":null,"sessionId":100,"song":null,"status":200,"ts":1541106106796,"userAgent":null,"userId":""}"#;
        let event: LogEvent = serde_json::from_str(line).unwrap();
        assert_eq!(event.user_id, None);
    }

    #[test]
    fn test_read_song_file_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TRAAAAW128F429D538.json");
        std::fs::write(&path, format!("{SONG_LINE}\n")).unwrap();

        let record = read_song_file(&path).unwrap();
        assert_eq!(record.title, "I Didn't Mean To");
    }

    #[test]
    fn test_read_song_file_empty_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "\n\n").unwrap();

        let err = read_song_file(&path).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }));
    }

    #[test]
    fn test_read_log_file_all_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2018-11-29-events.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{NEXT_SONG_LINE}").unwrap();
        writeln!(f, "{HOME_LINE}").unwrap();

        let events = read_log_file(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events.iter().filter(|e| e.is_song_play()).count(), 1);
    }

    #[test]
    fn test_read_log_file_garbled_line_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"page\": \"NextSong\"").unwrap();

        let err = read_log_file(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.json"));
        assert!(msg.contains("line 1"));
    }
}
