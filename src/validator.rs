//! Validation of raw frontmatter records against a collection schema.
//!
//! Validation happens in two steps. The raw YAML value is first walked against the
//! [`ObjectSchema`]: required fields are checked, defaults filled in, dates and URLs coerced to
//! their canonical text form and unknown keys either rejected (strict objects) or dropped. The
//! resulting mapping only contains well-typed values, so it is then deserialized into the typed
//! [`BlogEntry`] / [`AuthorEntry`].

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::trace;
use url::Url;

use crate::{
    entry::{AuthorEntry, BlogEntry, Record},
    error::{SiteErr, ValidationError},
    schema::{CollectionKind, FieldType, ObjectSchema, Presence, SchemaVersion},
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const ROOT: &str = "record";

#[derive(Debug, Clone)]
pub struct Validator {
    kind: CollectionKind,
    version: SchemaVersion,
    schema: ObjectSchema,
}

impl Validator {
    pub fn new(version: SchemaVersion, kind: CollectionKind) -> Result<Self, SiteErr> {
        let schema = version
            .schema(kind)
            .ok_or_else(|| SiteErr::CollectionNotInSchema {
                kind: kind.to_string(),
                version: version.to_string(),
            })?;
        Ok(Self {
            kind,
            version,
            schema,
        })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Applies the schema and returns the normalized, still untyped, mapping.
    pub fn normalize(&self, raw: &Value) -> Result<Mapping, ValidationError> {
        normalize_object(&self.schema, raw, "")
    }

    pub fn validate(&self, raw: &Value) -> Result<Record, ValidationError> {
        let normalized = Value::Mapping(self.normalize(raw)?);
        trace!("normalized {} record: {:?}", self.kind, normalized);
        Ok(match self.kind {
            CollectionKind::Blog => Record::Blog(into_typed::<BlogEntry>(normalized, self.kind)?),
            CollectionKind::Author => {
                Record::Author(into_typed::<AuthorEntry>(normalized, self.kind)?)
            }
        })
    }
}

/// Validates `raw` against the collection named by `identifier` ("blog" or "author").
pub fn validate(
    version: SchemaVersion,
    identifier: &str,
    raw: &Value,
) -> Result<Record, SiteErr> {
    let validator = Validator::new(version, identifier.parse()?)?;
    Ok(validator.validate(raw)?)
}

fn into_typed<T: DeserializeOwned>(
    normalized: Value,
    kind: CollectionKind,
) -> Result<T, ValidationError> {
    serde_yaml::from_value(normalized).map_err(|err| ValidationError::TypeMismatch {
        field: ROOT.into(),
        expected: format!("{kind} entry"),
        found: err.to_string(),
    })
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(n) if n.is_i64() => "integer".into(),
        Value::Number(n) if n.is_u64() => "integer out of range".into(),
        Value::Number(_) => "number".into(),
        Value::String(s) => format!("text {s:?}"),
        Value::Sequence(_) => "list".into(),
        Value::Mapping(_) => "object".into(),
        Value::Tagged(tagged) => format!("tagged value {}", tagged.tag),
    }
}

fn mismatch(path: &str, ty: &FieldType, found: String) -> ValidationError {
    ValidationError::TypeMismatch {
        field: if path.is_empty() { ROOT.into() } else { path.into() },
        expected: ty.name(),
        found,
    }
}

/// Parses YAML timestamp text: `2023-01-15`, optionally followed by `T`, `t` or whitespace and
/// `hh:mm:ss`, an optional fraction and an optional `Z` or `±h[h][:mm]` offset.
///
/// The calendar date is kept as written whatever the offset.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let (date, time) = match text.find(['T', 't', ' ', '\t']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    match time {
        None => Some(date),
        Some(time) => is_time_of_day(time.trim_start()).then_some(date),
    }
}

fn is_time_of_day(text: &str) -> bool {
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == ':' || c == '.'))
        .unwrap_or(text.len());
    let (time, offset) = text.split_at(end);
    let (clock, fraction) = time.split_once('.').unwrap_or((time, ""));
    NaiveTime::parse_from_str(clock, "%H:%M:%S").is_ok()
        && fraction.chars().all(|c| c.is_ascii_digit())
        && is_offset(offset.trim_start())
}

fn is_offset(text: &str) -> bool {
    if matches!(text, "" | "Z" | "z") {
        return true;
    }
    let Some(offset) = text.strip_prefix(['+', '-']) else {
        return false;
    };
    let (hours, minutes) = offset.split_once(':').unwrap_or((offset, "00"));
    matches!(hours.len(), 1 | 2)
        && minutes.len() == 2
        && hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit())
        && hours.parse::<u32>().is_ok_and(|h| h < 24)
        && minutes.parse::<u32>().is_ok_and(|m| m < 60)
}

fn normalize_object(
    schema: &ObjectSchema,
    value: &Value,
    path: &str,
) -> Result<Mapping, ValidationError> {
    let Value::Mapping(map) = value else {
        return Err(mismatch(
            path,
            &FieldType::Object(schema.clone()),
            describe(value),
        ));
    };

    if schema.strict {
        for key in map.keys() {
            let known = key
                .as_str()
                .map(|name| schema.field(name).is_some())
                .unwrap_or(false);
            if !known {
                let name = match key.as_str() {
                    Some(name) => name.to_string(),
                    None => serde_yaml::to_string(key)
                        .map(|s| s.trim_end().to_string())
                        .unwrap_or_else(|_| format!("{key:?}")),
                };
                return Err(ValidationError::ExtraField(join(path, &name)));
            }
        }
    }

    let mut normalized = Mapping::with_capacity(schema.fields.len());
    for field in schema.fields.iter() {
        let field_path = join(path, field.name);
        match (map.get(field.name), &field.presence) {
            (Some(value), _) => {
                normalized.insert(
                    Value::String(field.name.into()),
                    normalize_value(&field.ty, value, &field_path)?,
                );
            }
            (None, Presence::Required) => {
                return Err(ValidationError::MissingField(field_path));
            }
            (None, Presence::Optional) => {}
            (None, Presence::Default(default)) => {
                normalized.insert(Value::String(field.name.into()), default.clone());
            }
        }
    }
    Ok(normalized)
}

fn normalize_value(ty: &FieldType, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match (ty, value) {
        (FieldType::Text, Value::String(_)) => Ok(value.clone()),
        (FieldType::Boolean, Value::Bool(_)) => Ok(value.clone()),
        (FieldType::Integer, Value::Number(n)) if n.is_i64() => Ok(value.clone()),
        (FieldType::Url, Value::String(text)) => Url::parse(text.trim())
            .map(|url| Value::String(url.into()))
            .map_err(|err| mismatch(path, ty, format!("{text:?} ({err})"))),
        (FieldType::Date, Value::String(text)) => parse_date(text)
            .map(|date| Value::String(date.format(DATE_FORMAT).to_string()))
            .ok_or_else(|| mismatch(path, ty, format!("{text:?}"))),
        (FieldType::List(item), Value::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, value)| normalize_value(item, value, &format!("{path}[{i}]")))
            .collect::<Result<Vec<Value>, ValidationError>>()
            .map(Value::Sequence),
        (FieldType::Object(schema), _) => normalize_object(schema, value, path).map(Value::Mapping),
        (_, value) => Err(mismatch(path, ty, describe(value))),
    }
}
