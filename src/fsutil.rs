//! Filesystem helpers shared by the backup and restore legs.
//!
//! Copies here preserve file modification times so a restored preference
//! tree looks untouched to the application that owns it.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Copy a file or directory, preserving file modification times.
///
/// Directories are copied recursively. The destination must not exist yet
/// for files; for directories it is created as needed.
///
/// # Errors
///
/// Returns the first I/O error encountered. A partially copied directory is
/// left in place.
pub fn copy_item(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_dir_recursive(src, dst)
    } else {
        copy_file(src, dst)
    }
}

fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    let metadata = fs::metadata(src)?;
    filetime::set_file_mtime(dst, FileTime::from_last_modification_time(&metadata))?;
    Ok(())
}

/// Recursively copy a directory tree.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dst_path = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &dst_path)?;
        } else {
            copy_file(&entry.path(), &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn copies_single_file_with_content() {
        let dir = TempDir::new().unwrap();
        let src = write_file(dir.path(), "a.xml", b"<settings/>");
        let dst = dir.path().join("b.xml");

        copy_item(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"<settings/>");
    }

    #[test]
    fn copy_preserves_mtime() {
        let dir = TempDir::new().unwrap();
        let src = write_file(dir.path(), "a.xml", b"x");
        let stamp = FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(&src, stamp).unwrap();

        let dst = dir.path().join("b.xml");
        copy_item(&src, &dst).unwrap();

        let copied = FileTime::from_last_modification_time(&fs::metadata(&dst).unwrap());
        assert_eq!(copied.unix_seconds(), stamp.unix_seconds());
    }

    #[test]
    fn copies_nested_directories() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("options");
        fs::create_dir_all(src.join("inner")).unwrap();
        write_file(&src, "other.xml", b"root");
        write_file(&src.join("inner"), "deep.xml", b"leaf");

        let dst = dir.path().join("copy");
        copy_item(&src, &dst).unwrap();

        assert_eq!(fs::read(dst.join("other.xml")).unwrap(), b"root");
        assert_eq!(fs::read(dst.join("inner").join("deep.xml")).unwrap(), b"leaf");
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("absent");
        let dst = dir.path().join("copy");

        assert!(copy_item(&src, &dst).is_err());
    }
}
