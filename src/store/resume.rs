use std::collections::HashSet;

/// Candidates not yet in the store, in first-seen order with repeats dropped.
pub fn pending_urls(seen: &HashSet<String>, candidates: &[String]) -> Vec<String> {
    let mut queued = HashSet::new();
    candidates
        .iter()
        .filter(|url| !seen.contains(url.as_str()))
        .filter(|url| queued.insert(url.as_str()))
        .cloned()
        .collect()
}
