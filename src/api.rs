use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";
const SERVER_URL_ENV: &str = "MIKAN_SERVER_URL";
const HTTP_USER_AGENT: &str = concat!("Mikan/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterSummary {
    pub id: String,
    pub title: String,
    pub page_count: usize,
}

#[derive(Debug, Deserialize)]
struct ChapterListResponse {
    #[serde(default)]
    chapters: Vec<ChapterSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRef {
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ChapterDetail {
    #[serde(default)]
    pages: Vec<PageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    Vertical,
    Single,
}

impl ReadingMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Vertical => "Vertical",
            Self::Single => "Single",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Vertical => Self::Single,
            Self::Single => Self::Vertical,
        }
    }
}

/// The record exchanged bit-for-bit with both the local store and the
/// remote endpoint. `updated_at` is unix milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderPosition {
    pub chapter_id: String,
    pub page_index: usize,
    pub mode: ReadingMode,
    // The server may echo records written before this field existed.
    #[serde(default)]
    pub ui_hidden: bool,
    pub updated_at: u64,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    state: Option<ReaderPosition>,
}

pub struct SourceClient {
    base: Url,
    http: Client,
}

impl SourceClient {
    pub fn new() -> Result<Self> {
        let raw = std::env::var(SERVER_URL_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        Self::with_base_url(&raw)
    }

    fn with_base_url(raw: &str) -> Result<Self> {
        let base = Url::parse(raw).with_context(|| format!("invalid server url: {raw}"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("server url cannot be a base: {raw}"));
        }

        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(HTTP_USER_AGENT)
            .build()
            .context("failed to create http client")?;

        Ok(Self { base, http })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked at construction time: the base can hold path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn list_chapters(&self) -> Result<Vec<ChapterSummary>> {
        let response: ChapterListResponse = self
            .http
            .get(self.endpoint(&["api", "chapters"]))
            .send()
            .context("failed to request chapter list")?
            .error_for_status()
            .context("chapter list request failed")?
            .json()
            .context("failed to parse chapter list response")?;
        Ok(response.chapters)
    }

    pub fn chapter_pages(&self, chapter_id: &str) -> Result<Vec<PageRef>> {
        let response: ChapterDetail = self
            .http
            .get(self.endpoint(&["api", "chapters", chapter_id]))
            .send()
            .with_context(|| format!("failed to request chapter {chapter_id}"))?
            .error_for_status()
            .with_context(|| format!("chapter {chapter_id} request failed"))?
            .json()
            .with_context(|| format!("failed to parse chapter {chapter_id} response"))?;
        Ok(response.pages)
    }

    pub fn load_position(&self) -> Result<Option<ReaderPosition>> {
        let response: StateResponse = self
            .http
            .get(self.endpoint(&["api", "state"]))
            .send()
            .context("failed to request reading position")?
            .error_for_status()
            .context("reading position request failed")?
            .json()
            .context("failed to parse reading position response")?;
        Ok(response.state)
    }

    pub fn save_position(&self, position: &ReaderPosition) -> Result<()> {
        self.http
            .post(self.endpoint(&["api", "state"]))
            .json(position)
            .send()
            .context("failed to send reading position")?
            .error_for_status()
            .context("reading position save failed")?;
        Ok(())
    }

    /// Page urls from the server are root-relative (`/images/...`); a source
    /// may also hand out absolute urls to a different host.
    pub fn resolve_image_url(&self, url: &str) -> Result<Url> {
        self.base
            .join(url)
            .with_context(|| format!("invalid page image url: {url}"))
    }

    pub fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve_image_url(url)?;
        let response = self
            .http
            .get(resolved)
            .send()
            .with_context(|| format!("failed to request page image {url}"))?
            .error_for_status()
            .with_context(|| format!("page image request failed: {url}"))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read page image body: {url}"))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SourceClient {
        SourceClient::with_base_url("http://localhost:8000").unwrap()
    }

    #[test]
    fn endpoints_are_joined_onto_the_base_path() {
        let client = SourceClient::with_base_url("http://localhost:9000/manga/").unwrap();
        assert_eq!(
            client.endpoint(&["api", "chapters"]).as_str(),
            "http://localhost:9000/manga/api/chapters"
        );
    }

    #[test]
    fn chapter_ids_are_percent_encoded_in_the_path() {
        let url = client().endpoint(&["api", "chapters", "ch 01"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/chapters/ch%2001");
    }

    #[test]
    fn relative_image_urls_resolve_against_the_server() {
        let url = client().resolve_image_url("/images/c001/001.jpg").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/images/c001/001.jpg");
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        let url = client().resolve_image_url("https://cdn.example.com/p.png").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/p.png");
    }

    #[test]
    fn position_record_tolerates_a_missing_ui_hidden_field() {
        let raw = r#"{"chapter_id":"c001","page_index":4,"mode":"single","updated_at":1700000000000}"#;
        let position: ReaderPosition = serde_json::from_str(raw).unwrap();
        assert_eq!(position.page_index, 4);
        assert_eq!(position.mode, ReadingMode::Single);
        assert!(!position.ui_hidden);
    }

    #[test]
    fn absent_remote_state_parses_as_none() {
        let response: StateResponse = serde_json::from_str(r#"{"state":null}"#).unwrap();
        assert!(response.state.is_none());
    }
}
