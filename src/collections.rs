use std::{
    collections::{BTreeMap, BTreeSet},
    fs::read_to_string,
    path::Path,
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    config::{Config, Integration},
    entry::{AuthorEntry, BlogEntry, Entry},
    error::{ContextExt, EntryError, SiteErr},
    frontmatter,
    fs::get_files_by_ext_deep,
    schema::CollectionKind,
    validator::Validator,
};

pub const CONTENT_EXTENSIONS: [&str; 5] = ["md", "mdx", "yaml", "yml", "json"];

/// Validated entries of every collection, keyed by kind and kept in display order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Collections {
    entries: BTreeMap<CollectionKind, Vec<Arc<Entry>>>,
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry and restores the collection order: blog posts newest first, authors by id.
    pub fn add(&mut self, entry: Entry) {
        let kind = entry.collection;
        let entries = self.entries.entry(kind).or_default();
        entries.push(Arc::new(entry));
        sort(kind, entries);
    }

    pub fn get(&self, kind: CollectionKind) -> &[Arc<Entry>] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get_entry(&self, kind: CollectionKind, id: &str) -> Option<&Entry> {
        self.get(kind)
            .iter()
            .find(|entry| &*entry.id == id)
            .map(|entry| &**entry)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn blog(&self) -> impl Iterator<Item = (&Entry, &BlogEntry)> {
        self.get(CollectionKind::Blog)
            .iter()
            .filter_map(|entry| entry.data.as_blog().map(|blog| (&**entry, blog)))
    }

    pub fn authors(&self) -> impl Iterator<Item = (&Entry, &AuthorEntry)> {
        self.get(CollectionKind::Author)
            .iter()
            .filter_map(|entry| entry.data.as_author().map(|author| (&**entry, author)))
    }

    pub fn published(&self) -> impl Iterator<Item = (&Entry, &BlogEntry)> {
        self.blog().filter(|(_, blog)| !blog.draft)
    }

    pub fn tags(&self) -> BTreeSet<&str> {
        self.blog()
            .flat_map(|(_, blog)| blog.tags().iter().map(String::as_str))
            .collect()
    }

    pub fn blog_by_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = (&'a Entry, &'a BlogEntry)> + 'a {
        self.blog()
            .filter(move |(_, blog)| blog.tags().iter().any(|t| t == tag))
    }

    pub fn author_of(&self, blog: &BlogEntry) -> Option<&AuthorEntry> {
        blog.author
            .as_deref()
            .and_then(|id| self.get_entry(CollectionKind::Author, id))
            .and_then(|entry| entry.data.as_author())
    }

    /// Serialized form handed to the render pipeline: `{"blog": [...], "author": [...]}`.
    pub fn to_json(&self, pretty: bool) -> Result<String, SiteErr> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    /// Every blog `author` has to name an existing author entry.
    pub fn check_references(&self) -> Result<(), SiteErr> {
        for (entry, blog) in self.blog() {
            if let Some(author) = blog.author.as_deref() {
                if self.get_entry(CollectionKind::Author, author).is_none() {
                    return Err(SiteErr::DanglingReference {
                        entry: entry.id.to_string(),
                        author: author.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn sort(kind: CollectionKind, entries: &mut [Arc<Entry>]) {
    match kind {
        CollectionKind::Blog => entries.sort_by(|a, b| {
            let date = |entry: &Arc<Entry>| entry.data.as_blog().map(|blog| blog.date);
            date(b).cmp(&date(a)).then_with(|| a.id.cmp(&b.id))
        }),
        CollectionKind::Author => entries.sort_by(|a, b| a.id.cmp(&b.id)),
    }
}

/// `blog/series/part-1.md` under the collection root becomes `series/part-1`.
fn entry_id(collection_path: &Path, path: &Path) -> Arc<str> {
    let relative = path.strip_prefix(collection_path).unwrap_or(path);
    let id = relative
        .with_extension("")
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Arc::from(id)
}

fn load_collection(
    config: &Config,
    validator: &Validator,
    collection_path: &Path,
    collections: &mut Collections,
    failures: &mut Vec<EntryError>,
) -> Result<(), SiteErr> {
    if !collection_path.is_dir() {
        debug!("no {} collection at {}", validator.kind(), collection_path.display());
        return Ok(());
    }

    for path in get_files_by_ext_deep(collection_path, &CONTENT_EXTENSIONS)? {
        debug!("validate {}", path.display());
        if path.extension().is_some_and(|ext| ext == "mdx") && !config.has(Integration::Mdx) {
            return Err(SiteErr::IntegrationMissing {
                integration: Integration::Mdx.to_string(),
                path,
            });
        }

        let content =
            read_to_string(&path).with_context(|| format!("content file: {}", path.display()))?;
        let document = frontmatter::parse(&path, &content)
            .with_context(|| format!("content file: {}", path.display()))?;

        match validator.validate(&document.data) {
            Ok(data) => collections.add(Entry {
                id: entry_id(collection_path, &path),
                collection: validator.kind(),
                data,
                body: document.body.into(),
            }),
            Err(err) => {
                error!("{}: {}", path.display(), err);
                failures.push(EntryError { path, error: err });
            }
        }
    }
    Ok(())
}

/// Loads and validates every collection under `<path>/<content_path>`.
///
/// Any invalid record fails the whole load; all of them are reported together.
pub fn init_from_path(path: &Path, config: &Config) -> Result<Collections, SiteErr> {
    let content_path = path.join(&config.content_path);
    info!(
        "load content from {} with schema {}",
        content_path.display(),
        config.schema
    );

    let defined = config.schema.collections();
    for kind in CollectionKind::ALL {
        if !defined.contains(&kind) && content_path.join(kind.as_str()).is_dir() {
            return Err(SiteErr::CollectionNotInSchema {
                kind: kind.to_string(),
                version: config.schema.to_string(),
            });
        }
    }

    let mut collections = Collections::new();
    let mut failures = vec![];
    for kind in defined {
        let validator = Validator::new(config.schema, kind)?;
        load_collection(
            config,
            &validator,
            &content_path.join(kind.as_str()),
            &mut collections,
            &mut failures,
        )?;
    }

    if !failures.is_empty() {
        return Err(SiteErr::InvalidEntries(failures));
    }
    collections.check_references()?;

    info!(
        "loaded {} blog posts and {} authors",
        collections.get(CollectionKind::Blog).len(),
        collections.get(CollectionKind::Author).len()
    );
    Ok(collections)
}
