use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::SiteErr;

const FENCE: &str = "---";

/// A content file split into its raw metadata record and the remaining body.
#[derive(Debug, PartialEq)]
pub struct Document {
    pub data: Value,
    pub body: String,
}

/// Splits a markdown document into its YAML frontmatter and body.
///
/// A file without an opening fence has an empty record and is all body.
pub fn split(content: &str) -> Result<Document, SiteErr> {
    let content = content.replace("\r\n", "\n");
    let content = content.trim_start_matches('\u{feff}');

    let Some(rest) = content
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_prefix('\n').or(rest.is_empty().then_some(rest)))
    else {
        return Ok(Document {
            data: Value::Mapping(Mapping::new()),
            body: content.to_string(),
        });
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Document {
                data: parse_yaml(yaml)?,
                body: body.trim_start_matches('\n').to_string(),
            });
        }
        offset += line.len();
    }
    Err(SiteErr::Frontmatter("closing `---` not found".into()))
}

fn parse_yaml(yaml: &str) -> Result<Value, SiteErr> {
    if yaml.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    match serde_yaml::from_str(yaml)? {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        value => Ok(value),
    }
}

/// Reads a content file: markdown gets its frontmatter split off, data files are parsed whole.
pub fn parse(path: &Path, content: &str) -> Result<Document, SiteErr> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(Document {
            data: parse_yaml(content)?,
            body: String::new(),
        }),
        Some("json") => Ok(Document {
            data: serde_json::from_str(content)?,
            body: String::new(),
        }),
        _ => split(content),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_frontmatter_and_body() {
        let doc = split("---\ntitle: hello\ndate: 2023-01-15\n---\n\n# Hello\n").unwrap();
        assert_eq!(
            doc.data,
            serde_yaml::from_str::<Value>("title: hello\ndate: 2023-01-15").unwrap()
        );
        assert_eq!(doc.body, "# Hello\n");
    }

    #[test]
    fn windows_line_endings() {
        let doc = split("---\r\ntitle: hello\r\n---\r\nbody").unwrap();
        assert_eq!(doc.data["title"], Value::String("hello".into()));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn no_frontmatter() {
        let doc = split("# just text\n").unwrap();
        assert_eq!(doc.data, Value::Mapping(Mapping::new()));
        assert_eq!(doc.body, "# just text\n");
    }

    #[test]
    fn empty_frontmatter() {
        let doc = split("---\n---\nbody").unwrap();
        assert_eq!(doc.data, Value::Mapping(Mapping::new()));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn dashes_inside_values_are_not_fences() {
        let doc = split("---\ntitle: a --- b\n---\n").unwrap();
        assert_eq!(doc.data["title"], Value::String("a --- b".into()));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn unclosed_frontmatter() {
        assert!(matches!(
            split("---\ntitle: hello\n"),
            Err(SiteErr::Frontmatter(_))
        ));
    }

    #[test]
    fn thematic_break_is_not_a_fence() {
        let doc = split("----\ntext").unwrap();
        assert_eq!(doc.body, "----\ntext");
    }

    #[test]
    fn data_files() {
        let doc = parse(Path::new("ada.yaml"), "name: Ada\nimage: /ada.png\n").unwrap();
        assert_eq!(doc.data["name"], Value::String("Ada".into()));
        assert_eq!(doc.body, "");

        let doc = parse(Path::new("ada.json"), r#"{"name": "Ada", "links": []}"#).unwrap();
        assert_eq!(doc.data["links"], Value::Sequence(vec![]));
    }
}
