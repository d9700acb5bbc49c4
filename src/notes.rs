//! User-authored study notes.
//!
//! Notes are persisted externally (Supabase) and referenced in chat via
//! `@noteN` mentions; this module fetches them per (user, video) and
//! expands mentions into inline prompt context.

use crate::error::{LekseError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::instrument;

/// A timestamped note taken while watching a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(rename = "videoId")]
    pub video_id: String,
    /// Display timestamp, e.g. "02:15".
    pub timestamp: String,
    #[serde(rename = "timestampSeconds")]
    pub timestamp_seconds: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub description: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Trait for note storage backends.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch all notes for a user and video, ordered by timestamp.
    async fn notes_for(&self, user_id: &str, video_id: &str) -> Result<Vec<Note>>;
}

/// Supabase REST-backed note store.
pub struct SupabaseNoteStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseNoteStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NoteStore for SupabaseNoteStore {
    #[instrument(skip(self))]
    async fn notes_for(&self, user_id: &str, video_id: &str) -> Result<Vec<Note>> {
        let url = format!("{}/rest/v1/notes", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[
                ("select", "*"),
                ("user_id", &format!("eq.{}", user_id)),
                ("videoId", &format!("eq.{}", video_id)),
                ("order", "timestampSeconds.asc"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LekseError::Notes(format!(
                "notes query returned {}: {}",
                status, detail
            )));
        }

        let notes: Vec<Note> = response
            .json()
            .await
            .map_err(|e| LekseError::Notes(format!("Malformed notes response: {}", e)))?;

        Ok(notes)
    }
}

/// In-memory note store for tests.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Vec<Note>,
}

impl MemoryNoteStore {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn notes_for(&self, _user_id: &str, video_id: &str) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.video_id == video_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| {
            a.timestamp_seconds
                .partial_cmp(&b.timestamp_seconds)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(notes)
    }
}

fn mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@note(\d+)").expect("Invalid regex"))
}

/// Expand `@noteN` mentions into inline note context.
///
/// `N` is 1-based over the supplied (timestamp-ordered) notes. Mentions
/// without a matching note are left untouched.
pub fn resolve_note_references(text: &str, notes: &[Note]) -> String {
    mention_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let mention = &caps[0];
            let index: usize = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => return mention.to_string(),
            };

            match index.checked_sub(1).and_then(|i| notes.get(i)) {
                Some(note) => format!(
                    "[note {} at {}: {}]",
                    index, note.timestamp, note.description
                ),
                None => mention.to_string(),
            }
        })
        .to_string()
}
