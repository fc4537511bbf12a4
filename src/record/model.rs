use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One output line. Field names and nesting are fixed by the delivery format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Text")]
    pub text: String,
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub data_info: DataInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataInfo {
    pub lang: String,
    pub url: String,
    pub source: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub processing_date: NaiveDate,
    pub delivery_version: String,
    pub title: String,
    pub content: String,
    pub content_info: ContentInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub domain: String,
    pub subdomain: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    Article,
    Blog,
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Article => write!(f, "Article"),
            RecordType::Blog => write!(f, "Blog"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(RecordType::Article),
            "blog" => Ok(RecordType::Blog),
            other => Err(format!("expected 'Article' or 'Blog', got '{other}'")),
        }
    }
}

impl ArticleRecord {
    pub fn url(&self) -> &str {
        &self.meta.data_info.url
    }
}
