use std::{
    fmt::{Debug, Display},
    io,
    path::PathBuf,
};

use thiserror::Error;

/// Why a single record was rejected. Field names are dotted paths (`share.title`, `tags[1]`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error("field `{field}` expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
    #[error("unrecognized field `{0}`")]
    ExtraField(String),
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::TypeMismatch { field, .. } => field,
            ValidationError::ExtraField(field) => field,
        }
    }
}

#[derive(Debug)]
pub struct EntryError {
    pub path: PathBuf,
    pub error: ValidationError,
}

impl Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

#[derive(Error)]
pub enum SiteErr {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{context}:\n {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SiteErr>,
    },
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("collection `{kind}` is not defined in schema {version}")]
    CollectionNotInSchema { kind: String, version: String },
    #[error("malformed frontmatter: {0}")]
    Frontmatter(String),
    #[error("{path:?} requires the `{integration}` integration")]
    IntegrationMissing { integration: String, path: PathBuf },
    #[error("blog entry `{entry}` references unknown author `{author}`")]
    DanglingReference { entry: String, author: String },
    #[error("{} invalid content entries:\n{}", .0.len(), list_entries(.0))]
    InvalidEntries(Vec<EntryError>),
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),
}

fn list_entries(entries: &[EntryError]) -> String {
    entries
        .iter()
        .map(|entry| format!(" {entry}"))
        .collect::<Vec<String>>()
        .join("\n")
}

impl Debug for SiteErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

pub trait ContextExt<T> {
    fn with_context<C, F>(self, context: F) -> Result<T, SiteErr>
    where
        C: Display,
        F: FnOnce() -> C;
}

impl<T, E> ContextExt<T> for Result<T, E>
where
    E: Into<SiteErr>,
{
    fn with_context<C, F>(self, context: F) -> Result<T, SiteErr>
    where
        C: Display,
        F: FnOnce() -> C,
    {
        self.map_err(|err| SiteErr::WithContext {
            context: context().to_string(),
            source: Box::new(err.into()),
        })
    }
}
