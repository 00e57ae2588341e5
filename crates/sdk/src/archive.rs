use crate::error::{Result, SdkError};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use zip::ZipArchive;

/// A `-sources.jar`: Java sources laid out by package.
pub struct SourceArchive {
    path: PathBuf,
    /// Fully qualified names of the top-level classes, one per `.java` entry.
    classes: BTreeSet<String>,
    archive: Mutex<ZipArchive<File>>,
}

impl SourceArchive {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SdkError::MissingArchive(path.to_path_buf()));
        }
        let archive = ZipArchive::new(File::open(path)?)?;
        let classes = archive
            .file_names()
            .filter_map(|name| name.strip_suffix(".java"))
            .filter(|name| !name.starts_with("META-INF") && !name.ends_with("package-info"))
            .map(|name| name.replace('/', "."))
            .collect::<BTreeSet<_>>();
        tracing::debug!("Opened {} ({} classes)", path.display(), classes.len());
        Ok(Self {
            path: path.to_path_buf(),
            classes,
            archive: Mutex::new(archive),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level classes in name order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The top-level class whose file declares `fqn`. Nested classes live in
    /// the file of their outermost class.
    pub fn top_level_class(&self, fqn: &str) -> Option<&str> {
        let mut candidate = fqn;
        loop {
            if let Some(found) = self.classes.get(candidate) {
                return Some(found.as_str());
            }
            candidate = &candidate[..candidate.rfind('.')?];
        }
    }

    /// Entry name of the file declaring `fqn`.
    pub fn entry_name(&self, fqn: &str) -> Option<String> {
        self.top_level_class(fqn)
            .map(|top| format!("{}.java", top.replace('.', "/")))
    }

    /// Path reported for sources read from this archive: `<jar>!/<entry>`.
    pub fn entry_path(&self, entry: &str) -> PathBuf {
        PathBuf::from(format!("{}!/{}", self.path.display(), entry))
    }

    /// Source of the file declaring `fqn`, if the archive has one.
    pub fn read_source(&self, fqn: &str) -> Result<Option<(String, String)>> {
        let Some(entry) = self.entry_name(fqn) else {
            return Ok(None);
        };
        let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = archive.by_name(&entry)?;
        let mut source = String::new();
        file.read_to_string(&mut source)?;
        Ok(Some((entry, source)))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::write_jar;
    use super::*;

    fn archive() -> (tempfile::TempDir, SourceArchive) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("android-all-sources.jar");
        write_jar(
            &path,
            &[
                ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
                ("android/view/View.java", "package android.view; public class View {}"),
                ("android/view/package-info.java", "package android.view;"),
                ("android/app/Activity.java", "package android.app; public class Activity {}"),
            ],
        );
        let archive = SourceArchive::open(&path).unwrap();
        (dir, archive)
    }

    #[test]
    fn lists_top_level_classes() {
        let (_dir, archive) = archive();
        assert_eq!(
            archive.class_names().collect::<Vec<_>>(),
            vec!["android.app.Activity", "android.view.View"]
        );
    }

    #[test]
    fn nested_classes_map_to_the_outer_file() {
        let (_dir, archive) = archive();
        assert_eq!(
            archive.entry_name("android.view.View.MeasureSpec").as_deref(),
            Some("android/view/View.java")
        );
        assert_eq!(archive.top_level_class("android.view.Gone"), None);
    }

    #[test]
    fn reads_sources() {
        let (_dir, archive) = archive();
        let (entry, source) = archive.read_source("android.app.Activity").unwrap().unwrap();
        assert_eq!(entry, "android/app/Activity.java");
        assert!(source.contains("class Activity"));
        assert!(archive.read_source("java.lang.String").unwrap().is_none());
    }

    #[test]
    fn missing_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SourceArchive::open(&dir.path().join("absent.jar"));
        assert!(matches!(result, Err(SdkError::MissingArchive(_))));
    }
}
