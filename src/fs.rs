use std::{
    fs::{create_dir_all, read_dir, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{ContextExt, SiteErr};

/// Collects every file under `path` whose extension is one of `exts`, sorted by path.
pub fn get_files_by_ext_deep(path: &Path, exts: &[&str]) -> Result<Vec<PathBuf>, SiteErr> {
    let mut files = Vec::new();
    let mut dirs = vec![path.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        let entries =
            read_dir(&dir).with_context(|| format!("read directory: {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            } else if path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| exts.contains(&ext))
            {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

pub fn write_file(path: &Path, content: &[u8]) -> Result<(), SiteErr> {
    if let Some(prefix) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(prefix)
            .with_context(|| format!("create directory: {}", prefix.display()))?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("open file: {}", path.display()))?;
    file.write_all(content)
        .with_context(|| format!("write to file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn finds_content_files_recursively() {
        let files =
            get_files_by_ext_deep(Path::new("./test/fixtures/src/content/blog"), &["md", "mdx"])
                .unwrap();
        let names = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap().to_string())
            .collect::<Vec<String>>();
        assert_eq!(names, vec!["first-post.md", "second-post.mdx", "nested.md"]);
    }

    #[test]
    fn write_file_creates_parents_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dist/content/collections.json");

        write_file(&path, br#"{"blog":[],"author":[]}"#).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"blog":[],"author":[]}"#
        );

        write_file(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn missing_directory_has_context() {
        let err = get_files_by_ext_deep(Path::new("./test/fixtures/nope"), &["md"]).unwrap_err();
        assert!(err.to_string().starts_with("read directory: ./test/fixtures/nope"));
    }
}
