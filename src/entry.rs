use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::schema::CollectionKind;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct ShareMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Url>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct BlogEntry {
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<ShareMetadata>,
}

impl BlogEntry {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct AuthorEntry {
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Url>>,
}

/// A normalized record of either collection.
#[derive(Debug, PartialEq, Eq, Serialize, Clone)]
#[serde(untagged)]
pub enum Record {
    Blog(BlogEntry),
    Author(AuthorEntry),
}

impl Record {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Record::Blog(_) => CollectionKind::Blog,
            Record::Author(_) => CollectionKind::Author,
        }
    }

    pub fn as_blog(&self) -> Option<&BlogEntry> {
        match self {
            Record::Blog(blog) => Some(blog),
            _ => None,
        }
    }

    pub fn as_author(&self) -> Option<&AuthorEntry> {
        match self {
            Record::Author(author) => Some(author),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct Entry {
    pub id: Arc<str>,
    pub collection: CollectionKind,
    pub data: Record,
    #[serde(skip_serializing_if = "is_empty")]
    pub body: Arc<str>,
}

fn is_empty(body: &Arc<str>) -> bool {
    body.is_empty()
}
