//! Filesystem helpers: existence checks, deletion, writes and append-line-if-missing.
//!
//! Checks are computed fresh on every call; nothing is cached.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Whether anything exists at `path`.
///
/// "Not found" is `Ok(false)`; any other stat failure (permissions, I/O) is
/// returned as an error.
pub fn dir_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io("stat", path, e)),
    }
}

/// Recursively delete a directory.
///
/// A missing directory is an error like any other; check with
/// [`dir_exists`] first if that matters.
pub fn delete_dir(path: &Path) -> Result<()> {
    log::info!("Deleting directory: {}", path.display());
    fs::remove_dir_all(path).map_err(|e| Error::io("delete", path, e))
}

/// Delete a single file.
pub fn delete_file(path: &Path) -> Result<()> {
    log::info!("Deleting file: {}", path.display());
    fs::remove_file(path).map_err(|e| Error::io("delete", path, e))
}

/// Whether `file` contains `line` exactly, as a whole line.
///
/// Stops at the first match. A trailing `\r` on a line is ignored. Fails if
/// the file cannot be opened or read.
pub fn is_line_in_file(file: &Path, line: &str) -> Result<bool> {
    let handle = File::open(file).map_err(|e| Error::io("open", file, e))?;
    let reader = BufReader::new(handle);

    for chunk in reader.split(b'\n') {
        let chunk = chunk.map_err(|e| Error::io("read", file, e))?;
        let current = chunk.strip_suffix(b"\r").unwrap_or(&chunk);
        if current == line.as_bytes() {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Append `line` to `file` unless it is already there.
///
/// Returns `true` if the line was written. The file must exist. When the file
/// does not end with a newline, one is written first so the new line stands
/// on its own. No locking: concurrent callers can race.
pub fn append_line_if_missing(file: &Path, line: &str) -> Result<bool> {
    if is_line_in_file(file, line)? {
        log::info!("Line is already in {}: {}", file.display(), line);
        return Ok(false);
    }

    let mut handle = OpenOptions::new()
        .read(true)
        .append(true)
        .open(file)
        .map_err(|e| Error::io("open", file, e))?;

    let mut content = String::with_capacity(line.len() + 2);
    if !ends_with_newline(&mut handle).map_err(|e| Error::io("read", file, e))? {
        content.push('\n');
    }
    content.push_str(line);
    content.push('\n');

    handle
        .write_all(content.as_bytes())
        .map_err(|e| Error::io("append to", file, e))?;

    log::info!("Added line to {}: {}", file.display(), line);
    Ok(true)
}

/// Write `content` to `file`, replacing whatever was there.
pub fn write_file(file: &Path, content: &str) -> Result<()> {
    log::info!("Writing file: {}", file.display());
    fs::write(file, content).map_err(|e| Error::io("write", file, e))
}

/// True for empty files and files whose last byte is `\n`.
fn ends_with_newline(handle: &mut File) -> io::Result<bool> {
    let len = handle.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }

    handle.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    handle.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_file(temp: &TempDir, name: &str) -> std::path::PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_dir_exists_false_for_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("never").join("existed");
        assert!(!dir_exists(&missing).unwrap());
    }

    #[test]
    fn test_dir_exists_true_after_create() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("created");
        fs::create_dir(&dir).unwrap();
        assert!(dir_exists(&dir).unwrap());
    }

    #[test]
    fn test_delete_dir_recursive() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("tree");
        fs::create_dir_all(dir.join("a").join("b")).unwrap();
        fs::write(dir.join("a").join("file"), "x").unwrap();

        delete_dir(&dir).unwrap();
        assert!(!dir_exists(&dir).unwrap());
    }

    #[test]
    fn test_delete_missing_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(delete_dir(&temp.path().join("nope")).is_err());
        assert!(delete_file(&temp.path().join("nope.txt")).is_err());
    }

    #[test]
    fn test_line_in_empty_file_is_false() {
        let temp = TempDir::new().unwrap();
        let file = empty_file(&temp, ".zshrc");

        assert!(!is_line_in_file(&file, "anything").unwrap());
        assert!(!is_line_in_file(&file, "").unwrap());
    }

    #[test]
    fn test_line_in_file_exact_match_only() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config");
        fs::write(&file, "export A=1\r\nexport B=2\n").unwrap();

        assert!(is_line_in_file(&file, "export A=1").unwrap());
        assert!(is_line_in_file(&file, "export B=2").unwrap());
        assert!(!is_line_in_file(&file, "export A").unwrap());
    }

    #[test]
    fn test_line_in_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(is_line_in_file(&temp.path().join("missing"), "x").is_err());
    }

    #[test]
    fn test_append_to_empty_file() {
        let temp = TempDir::new().unwrap();
        let file = empty_file(&temp, ".zshrc");

        assert!(append_line_if_missing(&file, "eval \"$(starship init zsh)\"").unwrap());
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "eval \"$(starship init zsh)\"\n"
        );
    }

    #[test]
    fn test_append_twice_leaves_one_occurrence() {
        let temp = TempDir::new().unwrap();
        let file = empty_file(&temp, ".zshrc");

        assert!(append_line_if_missing(&file, "source ~/.aliases").unwrap());
        assert!(!append_line_if_missing(&file, "source ~/.aliases").unwrap());

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content.matches("source ~/.aliases").count(), 1);
    }

    #[test]
    fn test_append_after_unterminated_last_line() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".bashrc");
        fs::write(&file, "alias ll='ls -l'").unwrap();

        append_line_if_missing(&file, "alias g=git").unwrap();
        append_line_if_missing(&file, "alias g=git").unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "alias ll='ls -l'\nalias g=git\n"
        );
    }

    #[test]
    fn test_append_to_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(append_line_if_missing(&temp.path().join("missing"), "x").is_err());
    }

    #[test]
    fn test_write_file_replaces_content() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(".editorconfig");

        write_file(&file, "root = true\n").unwrap();
        write_file(&file, "root = false\n").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "root = false\n");
    }

    #[test]
    fn test_write_file_missing_parent_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(write_file(&temp.path().join("nope").join("f"), "x").is_err());
    }
}
