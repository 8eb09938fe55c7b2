//! Content collections for the webry site: site configuration, frontmatter schemas and the
//! validator that turns raw frontmatter into typed blog and author records.

pub mod args;
pub mod collections;
pub mod config;
pub mod entry;
pub mod error;
pub mod frontmatter;
pub mod fs;
pub mod schema;
pub mod validator;

pub use collections::{init_from_path, Collections};
pub use config::{Config, Integration};
pub use entry::{AuthorEntry, BlogEntry, Entry, Record, ShareMetadata};
pub use error::{SiteErr, ValidationError};
pub use schema::{CollectionKind, SchemaVersion};
pub use validator::{validate, Validator};
