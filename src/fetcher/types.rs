use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

#[derive(Debug, Clone)]
pub struct PageResponse {
    /// URL as it appeared in the input list; records are keyed on this.
    pub url_requested: String,
    pub url_final: Url,
    pub status: StatusCode,
    pub body_utf8: String,
    /// WHATWG name of the encoding the body was decoded from.
    pub encoding: &'static str,
    pub fetched_at: DateTime<Utc>,
}

impl PageResponse {
    /// Wrap an already-decoded HTML document, e.g. one loaded from disk.
    pub fn from_html(url: Url, html: impl Into<String>) -> Self {
        Self {
            url_requested: url.to_string(),
            url_final: url,
            status: StatusCode::OK,
            body_utf8: html.into(),
            encoding: encoding_rs::UTF_8.name(),
            fetched_at: Utc::now(),
        }
    }
}
