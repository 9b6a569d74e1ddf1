//! Cover lookup through MusicBrainz + the Cover Art Archive.
//!
//! MusicBrainz resolves (artist, album) to release MBIDs; the Cover Art
//! Archive serves the front image for a release MBID.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use cantus_core::ports::{CoverError, CoverLookup};

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const COVER_ART_BASE_URL: &str = "https://coverartarchive.org";
// MusicBrainz allows one request per second per client.
const SEARCH_INTERVAL: Duration = Duration::from_secs(1);
const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Deserialize)]
struct ReleaseSearch {
  #[serde(default)]
  releases: Vec<ReleaseHit>,
}

#[derive(Debug, Deserialize)]
struct ReleaseHit {
  id: String,
  #[serde(default)]
  score: Option<u32>,
}

#[derive(Clone)]
pub struct MusicBrainzCoverLookup {
  http_client: reqwest::Client,
  /// When the last MusicBrainz search went out. Shared by clones.
  last_search: Arc<Mutex<Option<Instant>>>,
  musicbrainz_url: String,
  cover_art_url: String,
}

impl MusicBrainzCoverLookup {
  pub fn new(user_agent: &str) -> Result<Self, CoverError> {
    Self::with_endpoints(user_agent, MUSICBRAINZ_BASE_URL, COVER_ART_BASE_URL)
  }

  pub fn with_endpoints(user_agent: &str, musicbrainz_url: &str, cover_art_url: &str) -> Result<Self, CoverError> {
    let http_client = reqwest::Client::builder()
      .user_agent(user_agent)
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| CoverError::Network(e.to_string()))?;

    Ok(Self {
      http_client,
      last_search: Arc::new(Mutex::new(None)),
      musicbrainz_url: musicbrainz_url.trim_end_matches('/').to_string(),
      cover_art_url: cover_art_url.trim_end_matches('/').to_string(),
    })
  }

  /// Sleeps until the next search is allowed. The lock is held across the
  /// sleep so concurrent callers queue up behind each other.
  async fn throttle(&self) {
    let mut last = self.last_search.lock().await;
    if let Some(delay) = search_delay(*last, Instant::now()) {
      tracing::debug!(?delay, "waiting for the MusicBrainz rate limit");
      tokio::time::sleep(delay).await;
    }
    *last = Some(Instant::now());
  }

  /// Release MBIDs matching (artist, album), best match first.
  async fn search_releases(&self, artist: &str, album: &str) -> Result<Vec<String>, CoverError> {
    self.throttle().await;

    let url = Url::parse_with_params(
      &format!("{}/release/", self.musicbrainz_url),
      &[("query", release_query(artist, album)), ("fmt", "json".into()), ("limit", MAX_CANDIDATES.to_string())],
    )
    .map_err(|e| CoverError::Parse(e.to_string()))?;

    tracing::debug!(%artist, %album, url = %url, "Querying MusicBrainz API");

    let response = self.http_client.get(url).send().await.map_err(|e| CoverError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let error_text = response.text().await.unwrap_or_default();
      return Err(CoverError::Service(status.as_u16(), error_text));
    }

    let body = response.text().await.map_err(|e| CoverError::Network(e.to_string()))?;
    parse_release_ids(&body)
  }

  /// Front cover bytes for a release, `None` when the archive has none.
  async fn front_cover(&self, release_id: &str) -> Result<Option<Vec<u8>>, CoverError> {
    let url = format!("{}/release/{}/front-500", self.cover_art_url, release_id);

    let response = self.http_client.get(&url).send().await.map_err(|e| CoverError::Network(e.to_string()))?;

    match response.status() {
      StatusCode::NOT_FOUND => Ok(None),
      status if status.is_success() => {
        let bytes = response.bytes().await.map_err(|e| CoverError::Network(e.to_string()))?;
        Ok(Some(bytes.to_vec()))
      }
      status => Err(CoverError::Service(status.as_u16(), url)),
    }
  }
}

#[async_trait]
impl CoverLookup for MusicBrainzCoverLookup {
  async fn fetch_front_cover(&self, artist: &str, album: &str) -> Result<Vec<u8>, CoverError> {
    for release_id in self.search_releases(artist, album).await? {
      if let Some(image) = self.front_cover(&release_id).await? {
        return Ok(image);
      }
    }

    Err(CoverError::NotFound { artist: artist.to_string(), album: album.to_string() })
  }
}

fn search_delay(last: Option<Instant>, now: Instant) -> Option<Duration> {
  let elapsed = now.saturating_duration_since(last?);
  SEARCH_INTERVAL.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// Lucene query for the release search endpoint.
fn release_query(artist: &str, album: &str) -> String {
  format!("artist:\"{}\" AND release:\"{}\"", escape_phrase(artist), escape_phrase(album))
}

fn escape_phrase(value: &str) -> String {
  value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn parse_release_ids(body: &str) -> Result<Vec<String>, CoverError> {
  let search: ReleaseSearch = serde_json::from_str(body).map_err(|e| CoverError::Parse(e.to_string()))?;

  let mut hits = search.releases;
  // stable: keeps MusicBrainz order among equal scores
  hits.sort_by_key(|hit| std::cmp::Reverse(hit.score.unwrap_or(0)));

  Ok(hits.into_iter().map(|hit| hit.id).collect())
}
