//! Name-to-file manifests for locally stored item images.
//!
//! The manifest is tab-delimited, one `name\tfile` pair per line, with file
//! paths relative to an image directory. An optional `name\tfile` header line
//! and `#` comment lines are ignored.

use std::path::{Path, PathBuf};

use horadric_catalog::{MatchPolicy, NameIndex};

use crate::error::{ParseError, SourceError};

/// Where a name's image lives, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    /// Mapped, and the file exists.
    Found(PathBuf),
    /// Mapped, but the file is absent on disk.
    Missing(PathBuf),
    /// No manifest entry matches the name.
    NotMapped,
}

/// A loaded manifest resolving item names to image files.
#[derive(Debug, Clone)]
pub struct ImageMap {
    image_dir: PathBuf,
    index: NameIndex<PathBuf>,
    /// Lines that could not be read.
    pub errors: Vec<ParseError>,
}

impl ImageMap {
    /// Load a manifest file. Relative paths resolve against `image_dir`.
    pub fn load(manifest: &Path, image_dir: &Path) -> Result<ImageMap, SourceError> {
        let content =
            std::fs::read_to_string(manifest).map_err(|e| SourceError::io(manifest, e))?;
        let name = manifest
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        Self::parse_str(&name, &content, image_dir)
    }

    /// Parse manifest content from a string.
    pub fn parse_str(
        manifest_name: &str,
        content: &str,
        image_dir: &Path,
    ) -> Result<ImageMap, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(content.as_bytes());

        let mut index = NameIndex::new();
        let mut errors = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    errors.push(ParseError::new(manifest_name, line, e.to_string()));
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let name = record.get(0).unwrap_or("").trim();
            let file = record.get(1).unwrap_or("").trim();

            if name.is_empty() && file.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case("name") && file.eq_ignore_ascii_case("file") {
                continue;
            }
            if name.is_empty() || file.is_empty() {
                errors.push(ParseError::new(
                    manifest_name,
                    line,
                    "expected 'name<TAB>file'",
                ));
                continue;
            }
            if !index.insert(name, PathBuf::from(file)) {
                log::debug!("{manifest_name}:{line}: duplicate entry for '{name}' ignored");
            }
        }

        Ok(ImageMap {
            image_dir: image_dir.to_path_buf(),
            index,
            errors,
        })
    }

    /// Resolve an item name to its image file. Names match exactly, then by
    /// containment.
    pub fn lookup(&self, name: &str) -> ImageLookup {
        let Some(found) = self.index.find(name, MatchPolicy::ExactOrSubstring) else {
            return ImageLookup::NotMapped;
        };
        let path = self.image_dir.join(found.value);
        if path.is_file() {
            ImageLookup::Found(path)
        } else {
            ImageLookup::Missing(path)
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/image_map_tests.rs"]
mod tests;
