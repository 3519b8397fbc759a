use crate::Match;
use crate::sample::sample_matches;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

pub type ApiResult<T> = Result<T, ApiError>;

/// Header carrying the optional provider key.
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Scores client. Reads a snapshot from a configurable REST source, or the
/// built-in sample set when no source is configured.
#[derive(Debug, Clone)]
pub struct ScoresApi {
    client: Client,
}

impl Default for ScoresApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("scoreline/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Could not read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Response shape extraction
// ---------------------------------------------------------------------------

/// One way a provider may wrap its match array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// The body itself is the array.
    BareArray,
    /// The array sits under a top-level object field.
    Field(&'static str),
}

/// Tried in order; the first rule that yields an array wins.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule::BareArray,
    ExtractionRule::Field("matches"),
    ExtractionRule::Field("response"),
];

impl ExtractionRule {
    fn apply(self, body: &mut Value) -> Option<Vec<Value>> {
        let target = match self {
            ExtractionRule::BareArray => body,
            ExtractionRule::Field(name) => body.as_object_mut()?.get_mut(name)?,
        };
        match target.take() {
            Value::Array(items) => Some(items),
            other => {
                *target = other;
                None
            }
        }
    }
}

/// Pull the match array out of a response body. Unknown shapes give an
/// empty list; individual records that do not parse are dropped.
pub fn extract_matches(mut body: Value) -> Vec<Match> {
    let Some(items) = EXTRACTION_RULES
        .iter()
        .find_map(|rule| rule.apply(&mut body))
    else {
        warn!("unrecognised response shape, treating as empty");
        return Vec::new();
    };

    let total = items.len();
    let matches: Vec<Match> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Match>(item) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("skipping malformed match record: {e}");
                None
            }
        })
        .collect();

    if matches.len() < total {
        warn!("dropped {} of {total} match records", total - matches.len());
    }
    matches
}

impl ScoresApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the current match snapshot.
    ///
    /// An empty `source_url` returns a fresh copy of the sample set. The key,
    /// when non-empty, is sent as [`API_KEY_HEADER`]. No retry happens here.
    pub async fn fetch_matches(&self, source_url: &str, api_key: &str) -> ApiResult<Vec<Match>> {
        let url = source_url.trim();
        if url.is_empty() {
            debug!("no source configured, serving sample matches");
            return Ok(sample_matches());
        }

        let mut request = self.client.get(url);
        let key = api_key.trim();
        if !key.is_empty() {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| ApiError::Network {
            url: url.to_owned(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let text = response.text().await.map_err(|e| ApiError::Body {
            url: url.to_owned(),
            source: e,
        })?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(extract_matches(body)),
            Err(e) => {
                warn!("response from {url} is not JSON ({e}), treating as empty");
                Ok(Vec::new())
            }
        }
    }
}
