//! Bundling of captured screenshots into a single `.tgz` for upload.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<dir>.tgz`, the archive written for `dir`.
#[must_use]
pub fn archive_path_for(dir: &Path) -> PathBuf {
    let mut path = OsString::from(dir.as_os_str());
    path.push(".tgz");
    PathBuf::from(path)
}

/// Write every regular file directly inside `dir` to `<dir>.tgz`.
///
/// Entries are stored under their base names, sorted. Subdirectories are not
/// descended into.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or the archive cannot
/// be written.
pub fn archive_directory(dir: &Path) -> io::Result<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push((entry.path(), entry.file_name()));
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));

    let archive_path = archive_path_for(dir);
    write_archive(&archive_path, &files)?;

    debug!(
        "Archived {} files into {}",
        files.len(),
        archive_path.display()
    );
    Ok(archive_path)
}

/// Write `files` into a gzipped tar at `archive_path`.
///
/// A partially written archive is removed on failure.
fn write_archive(archive_path: &Path, files: &[(PathBuf, OsString)]) -> io::Result<()> {
    let result = (|| -> io::Result<()> {
        let encoder = GzEncoder::new(File::create(archive_path)?, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, name) in files {
            builder.append_path_with_name(path, name)?;
        }
        builder.into_inner()?.finish()?;
        Ok(())
    })();
    if result.is_err() && archive_path.is_file() {
        if let Err(e) = fs::remove_file(archive_path) {
            debug!("Could not remove {}: {}", archive_path.display(), e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn entries(archive: &Path) -> Vec<(String, Vec<u8>)> {
        let mut archive = tar::Archive::new(GzDecoder::new(File::open(archive).unwrap()));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let name = entry.path().unwrap().to_string_lossy().into_owned();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (name, data)
            })
            .collect()
    }

    #[test]
    fn test_archive_path_for() {
        assert_eq!(
            archive_path_for(Path::new("/tmp/xrandr_screens_test")),
            PathBuf::from("/tmp/xrandr_screens_test.tgz")
        );
    }

    #[test]
    fn test_archive_uses_base_names() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("xrandr_screens");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("2.jpg"), b"two").unwrap();
        fs::write(dir.join("1.jpg"), b"one").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("3.jpg"), b"three").unwrap();

        let archive = archive_directory(&dir).unwrap();
        assert_eq!(archive, tmp.path().join("xrandr_screens.tgz"));
        assert_eq!(
            entries(&archive),
            vec![
                ("1.jpg".to_string(), b"one".to_vec()),
                ("2.jpg".to_string(), b"two".to_vec()),
            ]
        );
    }

    #[test]
    fn test_archive_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("empty");
        fs::create_dir(&dir).unwrap();
        let archive = archive_directory(&dir).unwrap();
        assert!(entries(&archive).is_empty());
    }

    #[test]
    fn test_failed_archive_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let present = tmp.path().join("1.jpg");
        fs::write(&present, b"one").unwrap();
        let files = vec![
            (present, OsString::from("1.jpg")),
            (tmp.path().join("gone.jpg"), OsString::from("gone.jpg")),
        ];

        let archive = tmp.path().join("partial.tgz");
        assert!(write_archive(&archive, &files).is_err());
        assert!(!archive.exists());
    }

    #[test]
    fn test_archive_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(archive_directory(&tmp.path().join("missing")).is_err());
    }
}
