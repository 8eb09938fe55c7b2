//! Declarative content schemas.
//!
//! Each collection is described by an [`ObjectSchema`]: a list of fields with a semantic type and a
//! presence rule. The three historical layouts of the site's frontmatter are kept side by side as
//! [`SchemaVersion`]s so old content can still be checked against the rules it was written for.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::SiteErr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Blog,
    Author,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Blog, CollectionKind::Author];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Blog => "blog",
            CollectionKind::Author => "author",
        }
    }
}

impl Display for CollectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = SiteErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(CollectionKind::Blog),
            "author" => Ok(CollectionKind::Author),
            other => Err(SiteErr::UnknownCollection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text,
    Boolean,
    Integer,
    Url,
    /// Calendar date, coerced from `YYYY-MM-DD` or an RFC 3339 timestamp.
    Date,
    List(Box<FieldType>),
    Object(ObjectSchema),
}

impl FieldType {
    pub fn list_of(item: FieldType) -> Self {
        FieldType::List(Box::new(item))
    }

    pub fn name(&self) -> String {
        match self {
            FieldType::Text => "text".into(),
            FieldType::Boolean => "boolean".into(),
            FieldType::Integer => "integer".into(),
            FieldType::Url => "URL".into(),
            FieldType::Date => "date".into(),
            FieldType::List(item) => format!("list of {}", item.name()),
            FieldType::Object(_) => "object".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    Default(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
}

impl Field {
    pub fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Required,
        }
    }

    pub fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Optional,
        }
    }

    pub fn with_default(name: &'static str, ty: FieldType, default: Value) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Default(default),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    /// Strict objects reject keys not listed in `fields`; the others drop them.
    pub strict: bool,
}

impl ObjectSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            strict: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Blog only: optional tags, mandatory share card.
    V1,
    /// Adds authors, cover images and canonical links; tags become mandatory.
    V2,
    /// Tags default to empty, author links become optional, adds id and read time.
    #[default]
    V3,
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVersion::V1 => write!(f, "v1"),
            SchemaVersion::V2 => write!(f, "v2"),
            SchemaVersion::V3 => write!(f, "v3"),
        }
    }
}

fn share() -> FieldType {
    FieldType::Object(
        ObjectSchema::new(vec![
            Field::optional("image", FieldType::Url),
            Field::required("title", FieldType::Text),
            Field::required("description", FieldType::Text),
        ])
        .strict(),
    )
}

fn draft() -> Field {
    Field::with_default("draft", FieldType::Boolean, Value::Bool(false))
}

impl SchemaVersion {
    /// `None` when the collection did not exist yet in this version.
    pub fn schema(&self, kind: CollectionKind) -> Option<ObjectSchema> {
        match (self, kind) {
            (SchemaVersion::V1, CollectionKind::Blog) => Some(ObjectSchema::new(vec![
                draft(),
                Field::required("date", FieldType::Date),
                Field::required("title", FieldType::Text),
                Field::optional("tags", FieldType::list_of(FieldType::Text)),
                Field::required("share", share()),
            ])),
            (SchemaVersion::V1, CollectionKind::Author) => None,
            (SchemaVersion::V2, CollectionKind::Blog) => Some(ObjectSchema::new(vec![
                draft(),
                Field::required("date", FieldType::Date),
                Field::required("title", FieldType::Text),
                Field::required("tags", FieldType::list_of(FieldType::Text)),
                Field::optional("author", FieldType::Text),
                Field::optional("cover", FieldType::Url),
                Field::optional("canonical", FieldType::Url),
                Field::optional("share", share()),
            ])),
            (SchemaVersion::V2, CollectionKind::Author) => Some(ObjectSchema::new(vec![
                Field::required("name", FieldType::Text),
                Field::required("image", FieldType::Text),
                Field::required("links", FieldType::list_of(FieldType::Url)),
            ])),
            (SchemaVersion::V3, CollectionKind::Blog) => Some(ObjectSchema::new(vec![
                draft(),
                Field::required("date", FieldType::Date),
                Field::required("title", FieldType::Text),
                Field::with_default(
                    "tags",
                    FieldType::list_of(FieldType::Text),
                    Value::Sequence(vec![]),
                ),
                Field::optional("author", FieldType::Text),
                Field::optional("cover", FieldType::Url),
                Field::optional("canonical", FieldType::Url),
                Field::optional("id", FieldType::Integer),
                Field::optional("read_time", FieldType::Integer),
                Field::optional("share", share()),
            ])),
            (SchemaVersion::V3, CollectionKind::Author) => Some(ObjectSchema::new(vec![
                Field::required("name", FieldType::Text),
                Field::required("image", FieldType::Text),
                Field::optional("links", FieldType::list_of(FieldType::Url)),
            ])),
        }
    }

    pub fn collections(&self) -> Vec<CollectionKind> {
        CollectionKind::ALL
            .into_iter()
            .filter(|kind| self.schema(*kind).is_some())
            .collect()
    }
}
