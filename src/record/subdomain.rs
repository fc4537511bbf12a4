/// How a record's `content_info.subdomain` tag is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubdomainRule {
    Fixed(String),
    /// Score each tag by how many of its keywords occur in the title and
    /// content; the best score wins and ties go to the earlier tag.
    Keywords(Vec<KeywordTag>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTag {
    pub tag: String,
    pub keywords: Vec<String>,
}

impl SubdomainRule {
    pub fn classify(&self, title: &str, content: &str) -> String {
        match self {
            SubdomainRule::Fixed(tag) => tag.clone(),
            SubdomainRule::Keywords(tags) => {
                let haystack = format!("{title} {content}").to_lowercase();
                let mut best: Option<(&KeywordTag, usize)> = None;
                for tag in tags {
                    let score = tag
                        .keywords
                        .iter()
                        .filter(|keyword| haystack.contains(keyword.to_lowercase().as_str()))
                        .count();
                    if best.is_none_or(|(_, top)| score > top) {
                        best = Some((tag, score));
                    }
                }
                best.map(|(tag, _)| tag.tag.clone()).unwrap_or_default()
            }
        }
    }

    /// Parse `tag=kw1,kw2;tag2=kw3` into a keyword rule.
    pub fn parse_keywords(rules: &str) -> Result<Self, String> {
        let mut tags = Vec::new();
        for entry in rules.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (tag, keywords) = entry
                .split_once('=')
                .ok_or_else(|| format!("missing '=' in '{entry}'"))?;
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(format!("empty tag in '{entry}'"));
            }
            let keywords: Vec<String> = keywords
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            tags.push(KeywordTag {
                tag: tag.to_string(),
                keywords,
            });
        }
        if tags.is_empty() {
            return Err("no tags given".to_string());
        }
        Ok(SubdomainRule::Keywords(tags))
    }
}
