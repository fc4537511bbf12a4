use std::path::Path;
use tracing::debug;

use crate::pipeline::errors::PipelineError;

/// Read the candidate URL list: one URL per line, blank lines and `#`
/// comments ignored, anything that is not http(s) dropped.
pub async fn read_url_list(path: &Path) -> Result<Vec<String>, PipelineError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PipelineError::Input {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_url_list(&raw))
}

pub fn parse_url_list(raw: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !(line.starts_with("http://") || line.starts_with("https://")) {
            debug!(line = idx + 1, "Ignoring non-http entry in url list: {}", line);
            continue;
        }
        urls.push(line.to_string());
    }
    urls
}
