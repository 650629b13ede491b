// file: src/source/walker.rs
// description: recursive directory walk producing one outcome per visited file
// reference: https://docs.rs/walkdir

use crate::config::FilesConfig;
use crate::error::Result;
use crate::extractor::{AutoDetectExtractor, Metadata};
use crate::models::Document;
use crate::utils::Validator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const AUTHOR_FIELD: &str = "author";
pub const TEXT_FIELD: &str = "text";

/// Result of visiting one filesystem entry.
#[derive(Debug)]
pub enum FileOutcome {
    Indexed {
        document: Document,
        metadata: Metadata,
    },
    /// Extraction failed; the file is skipped.
    Failed { path: PathBuf, reason: String },
    /// The walk itself could not read an entry (permissions, broken link, loop).
    WalkError {
        path: Option<PathBuf>,
        reason: String,
    },
}

/// A walk entry that passed the filters, before extraction.
#[derive(Debug)]
pub enum Candidate {
    /// A regular file, or a link that resolves to one.
    File(PathBuf),
    /// The walk could not read an entry (permissions, broken link, loop).
    Unreadable {
        path: Option<PathBuf>,
        reason: String,
    },
}

pub struct FileWalker {
    config: FilesConfig,
    extractor: Arc<AutoDetectExtractor>,
}

impl FileWalker {
    pub fn new(config: FilesConfig, extractor: Arc<AutoDetectExtractor>) -> Self {
        Self { config, extractor }
    }

    /// Lists the files a walk of `root` would extract, without reading them.
    /// Fails up front when `root` is missing or not a directory.
    pub fn candidates<'a>(&'a self, root: &Path) -> Result<Candidates<'a>> {
        Validator::validate_directory(root)?;
        info!("Walking directory: {}", root.display());

        let entries = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter();

        Ok(Candidates {
            walker: self,
            entries,
        })
    }

    /// Walks `root` and extracts each candidate on the calling thread.
    pub fn walk<'a>(&'a self, root: &Path) -> Result<Walk<'a>> {
        Ok(Walk {
            candidates: self.candidates(root)?,
        })
    }

    pub fn visit_candidate(&self, candidate: Candidate) -> FileOutcome {
        match candidate {
            Candidate::File(path) => self.visit(&path),
            Candidate::Unreadable { path, reason } => FileOutcome::WalkError { path, reason },
        }
    }

    /// Extracts one file and maps it into an index document.
    pub fn visit(&self, path: &Path) -> FileOutcome {
        let canonical = match fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(e) => {
                return FileOutcome::Failed {
                    path: path.to_path_buf(),
                    reason: format!("cannot resolve path: {}", e),
                };
            }
        };

        if self.config.dump_permissions {
            match fs::metadata(&canonical) {
                Ok(metadata) => info!(
                    "Permissions for {}: {}",
                    canonical.display(),
                    describe_permissions(&metadata)
                ),
                Err(e) => debug!("No permissions for {}: {}", canonical.display(), e),
            }
        }

        let content = match self.extractor.extract_file(&canonical) {
            Ok(content) => content,
            Err(e) => {
                return FileOutcome::Failed {
                    path: canonical,
                    reason: e.to_string(),
                };
            }
        };

        if self.config.dump_metadata {
            dump_metadata(&canonical, &content.metadata);
        }

        let mut document = Document::new(canonical.to_string_lossy());
        document.add_optional_field(AUTHOR_FIELD, content.author());
        document.add_field(TEXT_FIELD, content.text);

        FileOutcome::Indexed {
            document,
            metadata: content.metadata,
        }
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        self.config.skip_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                path_str.ends_with(suffix)
            } else {
                path_str.contains(pattern.trim_end_matches('*'))
            }
        })
    }

    fn exceeds_size_limit(&self, size: u64) -> bool {
        self.config.max_file_size_mb > 0 && size > self.config.max_file_size_mb * 1024 * 1024
    }
}

/// Owner, group and mode bits of a file.
#[cfg(unix)]
pub fn describe_permissions(metadata: &fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;

    format!(
        "owner={} group={} mode={:o}",
        metadata.uid(),
        metadata.gid(),
        metadata.mode() & 0o7777
    )
}

/// Only the read-only flag is portable off unix.
#[cfg(not(unix))]
pub fn describe_permissions(metadata: &fs::Metadata) -> String {
    format!("readonly={}", metadata.permissions().readonly())
}

fn dump_metadata(path: &Path, metadata: &Metadata) {
    info!("Metadata for {}:", path.display());
    for (name, value) in metadata.iter() {
        info!("  {}: {}", name, value);
    }
}

/// Lazy walk over the candidate files of one root.
pub struct Candidates<'a> {
    walker: &'a FileWalker,
    entries: walkdir::IntoIter,
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Candidate::Unreadable {
                        path: e.path().map(Path::to_path_buf),
                        reason: e.to_string(),
                    });
                }
            };

            let file_type = entry.file_type();
            let size = if file_type.is_file() {
                entry.metadata().ok().map(|m| m.len())
            } else if file_type.is_symlink() {
                // Only reached with follow_links off: file targets are read,
                // directory targets are never descended.
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => Some(target.len()),
                    Ok(_) => {
                        debug!("Skipping link to non-file: {}", entry.path().display());
                        continue;
                    }
                    Err(e) => {
                        return Some(Candidate::Unreadable {
                            path: Some(entry.into_path()),
                            reason: format!("broken link: {}", e),
                        });
                    }
                }
            } else {
                continue;
            };

            let path = entry.path();

            if self.walker.should_skip(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            if let Some(size) = size
                && self.walker.exceeds_size_limit(size)
            {
                debug!(
                    "Skipping large file ({} MB): {}",
                    size / 1024 / 1024,
                    path.display()
                );
                continue;
            }

            return Some(Candidate::File(entry.into_path()));
        }
    }
}

/// Lazy walk; each file is extracted when the iterator reaches it.
pub struct Walk<'a> {
    candidates: Candidates<'a>,
}

impl Iterator for Walk<'_> {
    type Item = FileOutcome;

    fn next(&mut self) -> Option<FileOutcome> {
        let candidate = self.candidates.next()?;
        Some(self.candidates.walker.visit_candidate(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::IngestError;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn walker_with(config: FilesConfig) -> FileWalker {
        FileWalker::new(config, Arc::new(AutoDetectExtractor::new()))
    }

    fn files_config() -> FilesConfig {
        let mut config = Config::default_config().files;
        config.skip_patterns.clear();
        config.max_file_size_mb = 0;
        config.dump_metadata = false;
        config.dump_permissions = false;
        config
    }

    fn indexed(outcomes: &[FileOutcome]) -> Vec<&Document> {
        outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Indexed { document, .. } => Some(document),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_walk_recurses_and_reports_failures() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        fs::write(temp.path().join("b.txt"), "beta").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/c.txt"), "gamma").unwrap();
        fs::write(temp.path().join("nested/d.zip"), b"PK\x03\x04\x00\x00").unwrap();

        let walker = walker_with(files_config());
        let outcomes: Vec<FileOutcome> = walker.walk(temp.path()).unwrap().collect();

        assert_eq!(outcomes.len(), 4);
        assert_eq!(indexed(&outcomes).len(), 3);

        let failures: Vec<&PathBuf> = outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].ends_with("nested/d.zip"));
    }

    #[test]
    fn test_document_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("essay.md");
        fs::write(&path, "---\nauthor: Grace Hopper\n---\n# Compilers\n\nBody").unwrap();
        fs::write(temp.path().join("plain.txt"), "no author here").unwrap();

        let walker = walker_with(files_config());
        let outcomes: Vec<FileOutcome> = walker.walk(temp.path()).unwrap().collect();
        let docs = indexed(&outcomes);

        let essay = docs.iter().find(|d| d.id().ends_with("essay.md")).unwrap();
        assert_eq!(
            essay.id(),
            fs::canonicalize(&path).unwrap().to_string_lossy()
        );
        assert_eq!(essay.get(AUTHOR_FIELD), Some("Grace Hopper"));
        assert!(essay.get(TEXT_FIELD).unwrap().contains("Body"));

        let plain = docs.iter().find(|d| d.id().ends_with("plain.txt")).unwrap();
        assert!(!plain.contains(AUTHOR_FIELD));
        assert_eq!(plain.get(TEXT_FIELD), Some("no author here"));
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let walker = walker_with(files_config());

        let result = walker.walk(&temp.path().join("absent"));
        assert!(matches!(result, Err(IngestError::Validation(_))));
    }

    #[test]
    fn test_skip_patterns() {
        let mut config = files_config();
        config.skip_patterns = vec!["*.lock".to_string(), ".git/*".to_string()];
        let walker = walker_with(config);

        assert!(walker.should_skip(Path::new("Cargo.lock")));
        assert!(walker.should_skip(Path::new("repo/.git/config")));
        assert!(!walker.should_skip(Path::new("notes.md")));
    }

    #[test]
    fn test_size_limit() {
        let mut config = files_config();
        assert!(!walker_with(config.clone()).exceeds_size_limit(u64::MAX));

        config.max_file_size_mb = 1;
        let walker = walker_with(config);
        assert!(!walker.exceeds_size_limit(1024 * 1024));
        assert!(walker.exceeds_size_limit(1024 * 1024 + 1));
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_link_loop_is_walk_error() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), "alpha").unwrap();
        std::os::unix::fs::symlink(temp.path(), dir.join("back")).unwrap();

        let mut config = files_config();
        config.follow_links = true;
        let walker = walker_with(config);
        let outcomes: Vec<FileOutcome> = walker.walk(temp.path()).unwrap().collect();

        assert_eq!(indexed(&outcomes).len(), 1);
        assert!(
            outcomes
                .iter()
                .any(|o| matches!(o, FileOutcome::WalkError { .. }))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_file_is_indexed_without_following_dirs() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("target.txt");
        fs::write(&target, "linked body").unwrap();
        fs::create_dir(outside.path().join("subdir")).unwrap();
        fs::write(outside.path().join("subdir/hidden.txt"), "not reached").unwrap();
        std::os::unix::fs::symlink(&target, temp.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("subdir"), temp.path().join("dirlink"))
            .unwrap();

        let walker = walker_with(files_config());
        let outcomes: Vec<FileOutcome> = walker.walk(temp.path()).unwrap().collect();
        let docs = indexed(&outcomes);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id(), fs::canonicalize(&target).unwrap().to_string_lossy());
        assert_eq!(docs[0].get(TEXT_FIELD), Some("linked body"));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_link_is_walk_error() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone.txt"), temp.path().join("dangling"))
            .unwrap();

        let walker = walker_with(files_config());
        let outcomes: Vec<FileOutcome> = walker.walk(temp.path()).unwrap().collect();

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            &outcomes[0],
            FileOutcome::WalkError { path: Some(path), .. } if path.ends_with("dangling")
        ));
    }

    #[test]
    fn test_candidates_do_not_extract() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        fs::write(temp.path().join("b.zip"), b"PK\x03\x04\x00\x00").unwrap();

        let walker = walker_with(files_config());
        let candidates: Vec<Candidate> = walker.candidates(temp.path()).unwrap().collect();

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| matches!(c, Candidate::File(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_describe_permissions_reports_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("secret.txt");
        fs::write(&path, "x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        let description = describe_permissions(&fs::metadata(&path).unwrap());

        assert!(description.starts_with("owner="));
        assert!(description.contains(" group="));
        assert!(description.ends_with("mode=640"));
    }

    #[test]
    fn test_permission_dump_keeps_file_indexed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();

        let mut config = files_config();
        config.dump_permissions = true;
        let walker = walker_with(config);
        let outcomes: Vec<FileOutcome> = walker.walk(temp.path()).unwrap().collect();

        assert_eq!(indexed(&outcomes).len(), 1);
    }
}
