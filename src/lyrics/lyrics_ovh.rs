//! lyrics.ovh API client
//!
//! Free lookup service returning plain (unsynced) lyrics by artist and title.
//! `GET /v1/<artist>/<title>` answers `{"lyrics": "..."}` on success.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::error::LyricsError;

/// Source of plain lyrics text for a track.
#[async_trait]
pub trait RemoteLyrics: Send + Sync {
    /// Fetch the raw, newline separated lyrics block.
    async fn fetch(&self, artist: &str, title: &str) -> Result<String, LyricsError>;
}

/// lyrics.ovh response
#[derive(Debug, Deserialize)]
struct LyricsOvhResponse {
    lyrics: Option<String>,
}

/// lyrics.ovh API client
#[derive(Debug, Clone)]
pub struct LyricsOvhClient {
    client: reqwest::Client,
    base_url: String,
}

impl LyricsOvhClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.lyrics.ovh";
    const USER_AGENT: &'static str = concat!("lrcplay/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("build lyrics http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn lookup_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl RemoteLyrics for LyricsOvhClient {
    async fn fetch(&self, artist: &str, title: &str) -> Result<String, LyricsError> {
        let url = self.lookup_url(artist, title);
        tracing::debug!(%url, "fetching remote lyrics");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LyricsError::Status(response.status()));
        }

        let body = response.text().await?;
        extract_lyrics(&body)
    }
}

/// Pull the lyrics block out of a response body.
fn extract_lyrics(body: &str) -> Result<String, LyricsError> {
    let parsed: LyricsOvhResponse = serde_json::from_str(body)?;
    match parsed.lyrics {
        Some(text) if text.lines().any(|l| !l.trim().is_empty()) => Ok(text),
        _ => Err(LyricsError::Empty),
    }
}
