//! YouTube transcript source.
//!
//! Resolves the caption track for a video with yt-dlp, then fetches and
//! parses the json3 subtitle payload.

use super::{TranscriptSegment, TranscriptSource};
use crate::error::{LekseError, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Transcript source backed by YouTube caption tracks.
pub struct YoutubeTranscriptSource {
    client: reqwest::Client,
    /// Preferred caption languages, in priority order.
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            languages,
        }
    }

    /// Look up the json3 caption track URL via yt-dlp metadata.
    ///
    /// Manually uploaded subtitles are preferred over automatic captions.
    async fn resolve_track_url(&self, video_id: &str) -> Result<String> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--dump-json",
                "--no-download",
                "--no-warnings",
                &url,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LekseError::ToolNotFound("yt-dlp".to_string())
                } else {
                    LekseError::TranscriptUnavailable(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LekseError::TranscriptUnavailable(format!(
                "Video {} not found or unavailable: {}",
                video_id, stderr
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str).map_err(|e| {
            LekseError::TranscriptUnavailable(format!("Failed to parse yt-dlp output: {}", e))
        })?;

        for field in ["subtitles", "automatic_captions"] {
            let Some(tracks) = json[field].as_object() else {
                continue;
            };

            for lang in &self.languages {
                // Automatic captions carry variant suffixes like "en-orig".
                let candidates = tracks
                    .iter()
                    .filter(|(key, _)| *key == lang || key.starts_with(&format!("{}-", lang)));

                for (_, formats) in candidates {
                    if let Some(track_url) = formats
                        .as_array()
                        .into_iter()
                        .flatten()
                        .find(|f| f["ext"].as_str() == Some("json3"))
                        .and_then(|f| f["url"].as_str())
                    {
                        return Ok(track_url.to_string());
                    }
                }
            }
        }

        Err(LekseError::TranscriptUnavailable(format!(
            "No caption track for video {} in languages {:?}",
            video_id, self.languages
        )))
    }

    /// Parse a json3 caption payload into ordered segments.
    fn parse_json3(payload: &serde_json::Value) -> Vec<TranscriptSegment> {
        let mut segments = Vec::new();

        for event in payload["events"].as_array().into_iter().flatten() {
            let Some(segs) = event["segs"].as_array() else {
                continue;
            };

            let text: String = segs
                .iter()
                .filter_map(|s| s["utf8"].as_str())
                .collect::<Vec<_>>()
                .join("")
                .replace('\n', " ")
                .trim()
                .to_string();

            if text.is_empty() {
                continue;
            }

            let start_ms = event["tStartMs"].as_f64().unwrap_or(0.0);
            let duration_ms = event["dDurMs"].as_f64().unwrap_or(0.0);

            segments.push(TranscriptSegment::new(
                text,
                start_ms / 1000.0,
                duration_ms / 1000.0,
            ));
        }

        segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));
        segments
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let track_url = self.resolve_track_url(video_id).await?;
        debug!("Fetching caption track for {}", video_id);

        let response = self.client.get(&track_url).send().await?;
        if !response.status().is_success() {
            return Err(LekseError::TranscriptUnavailable(format!(
                "Caption track fetch for {} returned {}",
                video_id,
                response.status()
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        let segments = Self::parse_json3(&payload);

        if segments.is_empty() {
            return Err(LekseError::TranscriptUnavailable(format!(
                "Caption track for {} contained no text",
                video_id
            )));
        }

        debug!("Fetched {} segments for {}", segments.len(), video_id);
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json3() {
        let payload = serde_json::json!({
            "events": [
                { "tStartMs": 0, "dDurMs": 2000, "segs": [{ "utf8": "hello " }, { "utf8": "there" }] },
                { "tStartMs": 2500, "dDurMs": 1500, "segs": [{ "utf8": "world\n" }] },
                // Style-only events carry no segs and are skipped.
                { "tStartMs": 4000, "dDurMs": 0 }
            ]
        });

        let segments = YoutubeTranscriptSource::parse_json3(&payload);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hello there");
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].duration, 2.0);
        assert_eq!(segments[1].text, "world");
        assert_eq!(segments[1].start, 2.5);
    }

    #[test]
    fn test_parse_json3_empty() {
        let payload = serde_json::json!({ "events": [] });
        assert!(YoutubeTranscriptSource::parse_json3(&payload).is_empty());
    }
}
