//! Native platform: file-backed storage and a terminal display surface

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::display::{ButtonState, DisplaySurface};
use super::storage::Storage;
use crate::error::StorageError;
use crate::history::HistoryView;

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root`, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", file))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // tmp + rename: readers see the old or the new document, never a partial one
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Logs wheel activity and prints results and the history table to stdout
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    /// Answer `confirm` with yes without reading stdin
    pub assume_yes: bool,
    /// Print the history table on every re-render
    pub show_history: bool,
}

impl TerminalDisplay {
    pub fn new(assume_yes: bool, show_history: bool) -> Self {
        Self {
            assume_yes,
            show_history,
        }
    }
}

impl DisplaySurface for TerminalDisplay {
    fn rotate_to(&mut self, angle_deg: f64, duration_ms: u32) {
        log::info!("Wheel rotating to {:.1}° over {} ms", angle_deg, duration_ms);
    }

    fn set_button(&mut self, state: &ButtonState, _spinning: bool) {
        log::debug!("{} {}", state.icon, state.text);
    }

    fn show_result(&mut self, value: &str, _flash_ms: u32) {
        println!("🎉 {}", value);
    }

    fn render_history(&mut self, view: &HistoryView) {
        if !self.show_history {
            return;
        }
        match view {
            HistoryView::Empty { placeholder } => println!("  {}", placeholder),
            HistoryView::Rows(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    println!("  {:>2}. {}  {}", i + 1, row.time, row.result);
                }
            }
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim(), "y" | "Y" | "yes"),
            Err(e) => {
                log::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lottery-wheel-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_storage_round_trip() {
        let root = temp_root("roundtrip");
        let mut storage = FileStorage::open(&root).unwrap();
        assert!(storage.get("lottery_history").unwrap().is_none());

        storage.set("lottery_history", "[]").unwrap();
        assert_eq!(storage.get("lottery_history").unwrap().as_deref(), Some("[]"));

        // Another handle on the same directory sees it (restart)
        let reopened = FileStorage::open(&root).unwrap();
        assert_eq!(reopened.get("lottery_history").unwrap().as_deref(), Some("[]"));

        // Overwrite replaces, no tmp file left behind
        storage.set("lottery_history", "[1]").unwrap();
        assert_eq!(storage.get("lottery_history").unwrap().as_deref(), Some("[1]"));
        assert!(!root.join("lottery_history.json.tmp").exists());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_file_storage_key_sanitized() {
        let root = temp_root("keys");
        let storage = FileStorage::open(&root).unwrap();
        assert_eq!(storage.path_for("../etc/passwd"), root.join("___etc_passwd.json"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_assume_yes_confirms() {
        assert!(TerminalDisplay::new(true, false).confirm("clear?"));
    }
}
