//! Core data models for the star schema.
//!
//! Defines the row types for the five target tables: [`Song`], [`Artist`],
//! [`User`], [`TimeRow`], and [`Songplay`]. These are derived from SQLx for
//! database mapping.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `songs` - Song metadata keyed by the source's natural song id
//! - `artists` - Artist metadata keyed by the source's natural artist id
//! - `users` - Listeners projected from the activity log
//! - `time` - Time dimension keyed by the raw millisecond timestamp
//! - `songplays` - One fact row per song-play event (synthetic key)

use chrono::{DateTime, Datelike, Timelike};
use sqlx::FromRow;

/// A song row, keyed by the corpus's natural id (e.g. `SOUPIRU12A6D4FA1E1`).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    /// Natural id of the performing artist
    pub artist_id: String,
    /// Release year (0 in the corpus when unknown)
    pub year: i64,
    /// Duration in seconds
    pub duration: f64,
}

/// An artist row, keyed by the corpus's natural id.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A listener projected from the activity log.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    /// Subscription level at event time ("free" or "paid")
    pub level: String,
}

/// One time-dimension row.
///
/// Keyed by the raw millisecond-epoch timestamp; every other column is a
/// pure function of it (UTC).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TimeRow {
    pub start_time: i64,
    pub hour: i64,
    pub day: i64,
    /// ISO 8601 week number
    pub week: i64,
    pub month: i64,
    pub year: i64,
    /// 0-based from Monday
    pub weekday: i64,
}

impl TimeRow {
    /// Decompose a millisecond-epoch timestamp into its dimension columns.
    ///
    /// Returns `None` if the timestamp is outside the representable datetime
    /// range; callers treat that as a malformed record.
    pub fn from_epoch_ms(start_time: i64) -> Option<Self> {
        let dt = DateTime::from_timestamp_millis(start_time)?;
        Some(Self {
            start_time,
            hour: i64::from(dt.hour()),
            day: i64::from(dt.day()),
            week: i64::from(dt.iso_week().week()),
            month: i64::from(dt.month()),
            year: i64::from(dt.year()),
            weekday: i64::from(dt.weekday().num_days_from_monday()),
        })
    }
}

/// One songplay fact row, without its synthetic key.
///
/// The `songplay_id` primary key is assigned by the store on insert.
/// `song_id` and `artist_id` always hold a real or sentinel id, never NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct Songplay {
    pub start_time: i64,
    pub user_id: i64,
    pub level: String,
    pub song_id: String,
    pub artist_id: String,
    pub session_id: i64,
    pub location: String,
    pub user_agent: String,
}
