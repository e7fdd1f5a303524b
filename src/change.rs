//! Source change detection by modification time. Pure query; the
//! caller decides whether to re-ingest.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Paths whose on-disk modification time is strictly after
/// `reference_time`. Missing files are skipped silently; any other
/// metadata error is logged and the path skipped.
pub fn stale_sources(paths: &[PathBuf], reference_time: DateTime<Utc>) -> Vec<PathBuf> {
    let mut stale = Vec::new();

    for path in paths {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot stat source");
                continue;
            }
        };
        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "no modification time");
                continue;
            }
        };

        if DateTime::<Utc>::from(modified) > reference_time {
            stale.push(path.clone());
        }
    }

    stale
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn only_files_modified_after_the_reference_are_returned() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.txt");
        std::fs::write(&old, "old").unwrap();

        std::thread::sleep(Duration::from_millis(20));
        let reference = Utc::now();
        std::thread::sleep(Duration::from_millis(20));

        let fresh = dir.path().join("fresh.txt");
        std::fs::write(&fresh, "fresh").unwrap();

        let stale = stale_sources(&[old, fresh.clone()], reference);
        assert_eq!(stale, vec![fresh]);
    }

    #[test]
    fn missing_paths_are_silently_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let stale = stale_sources(&[missing], Utc::now() - chrono::Duration::hours(1));
        assert!(stale.is_empty());
    }
}
