//! Local "done" bookkeeping
//!
//! The backend does not track completion; the user's marks live in a JSON
//! file next to the session.

use crate::api::Task;
use crate::error::StorageError;
use crate::util::write_atomic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Completion mark for one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: u64,
    pub done: bool,
}

/// All completion marks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentBook {
    entries: Vec<Assignment>,
}

impl AssignmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the mark for `task_id`; an unmarked task becomes done
    ///
    /// Returns the new state.
    pub fn toggle(&mut self, task_id: u64) -> bool {
        match self.entries.iter_mut().find(|a| a.task_id == task_id) {
            Some(entry) => {
                entry.done = !entry.done;
                entry.done
            }
            None => {
                self.entries.push(Assignment {
                    task_id,
                    done: true,
                });
                true
            }
        }
    }

    pub fn is_done(&self, task_id: u64) -> bool {
        self.entries.iter().any(|a| a.task_id == task_id && a.done)
    }

    /// Number of `tasks` marked as done
    pub fn done_count(&self, tasks: &[Task]) -> usize {
        tasks.iter().filter(|t| self.is_done(t.task_id)).count()
    }

    /// Percentage of `tasks` done, rounded to the nearest whole percent
    pub fn progress(&self, tasks: &[Task]) -> u8 {
        if tasks.is_empty() {
            return 0;
        }
        let ratio = self.done_count(tasks) as f64 / tasks.len() as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }
}

/// JSON file holding an [`AssignmentBook`]
///
/// Saves replace the file atomically; clones share one lock so their
/// toggles do not overwrite each other.
#[derive(Debug, Clone)]
pub struct AssignmentFile {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl AssignmentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn read(&self) -> Result<AssignmentBook, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AssignmentBook::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.display().to_string(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Load the book for display; a missing or unreadable file is an empty book
    pub fn load(&self) -> AssignmentBook {
        self.read().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to load assignments");
            AssignmentBook::new()
        })
    }

    /// Replace the file with `book`
    pub fn save(&self, book: &AssignmentBook) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(book)?;
        write_atomic(&self.path, &json).map_err(|source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = book.entries.len(), "Assignments saved");
        Ok(())
    }

    /// Flip the stored mark for `task_id` and return the new state
    ///
    /// An unreadable file is an error here; its marks are never replaced by
    /// an empty book.
    pub fn toggle(&self, task_id: u64) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut book = self.read()?;
        let done = book.toggle(task_id);
        self.save(&book)?;
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn task(task_id: u64) -> Task {
        Task {
            task_id,
            user_id: None,
            week_id: 1,
            semester_id: 1,
            name: format!("Tugas {}", task_id),
            matkul: "Algoritma".to_string(),
            link: String::new(),
            deadline: "2025-06-01".to_string(),
        }
    }

    #[test]
    fn test_toggle_adds_then_flips() {
        let mut book = AssignmentBook::new();
        assert!(book.toggle(7));
        assert!(book.is_done(7));
        assert!(!book.toggle(7));
        assert!(!book.is_done(7));
        assert!(book.toggle(7));
        assert_eq!(book.entries().len(), 1);
    }

    #[test]
    fn test_progress_rounds() {
        let tasks = vec![task(1), task(2), task(3)];
        let mut book = AssignmentBook::new();
        assert_eq!(book.progress(&tasks), 0);

        book.toggle(1);
        assert_eq!(book.progress(&tasks), 33);

        book.toggle(2);
        assert_eq!(book.progress(&tasks), 67);

        book.toggle(3);
        assert_eq!(book.progress(&tasks), 100);
    }

    #[test]
    fn test_progress_ignores_marks_for_other_tasks() {
        let mut book = AssignmentBook::new();
        book.toggle(99);
        assert_eq!(book.done_count(&[task(1)]), 0);
        assert_eq!(book.progress(&[task(1)]), 0);
    }

    #[test]
    fn test_progress_of_no_tasks_is_zero() {
        let mut book = AssignmentBook::new();
        book.toggle(1);
        assert_eq!(book.progress(&[]), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let file = AssignmentFile::new(dir.path().join("state").join("assignments.json"));
        assert_eq!(file.load(), AssignmentBook::new());

        let mut book = AssignmentBook::new();
        book.toggle(3);
        book.toggle(5);
        book.toggle(5);
        file.save(&book).unwrap();

        let loaded = file.load();
        assert!(loaded.is_done(3));
        assert!(!loaded.is_done(5));
        assert_eq!(loaded, book);
    }

    #[test]
    fn test_file_format_is_plain_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assignments.json");
        std::fs::write(&path, r#"[{"task_id": 4, "done": true}]"#).unwrap();
        assert!(AssignmentFile::new(&path).load().is_done(4));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assignments.json");
        std::fs::write(&path, r#"{"task_id": 4}"#).unwrap();
        assert_eq!(AssignmentFile::new(&path).load(), AssignmentBook::new());
    }

    #[test]
    fn test_toggle_refuses_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assignments.json");
        std::fs::write(&path, "[{\"task_id\": 4, \"done\": tr").unwrap();

        let file = AssignmentFile::new(&path);
        assert!(matches!(file.toggle(5), Err(StorageError::Corrupt { .. })));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[{\"task_id\": 4, \"done\": tr"
        );
    }

    #[test]
    fn test_concurrent_toggles_keep_every_mark() {
        let dir = tempdir().unwrap();
        let file = AssignmentFile::new(dir.path().join("assignments.json"));

        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let file = file.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        file.toggle(worker * 100 + i).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let book = file.load();
        assert_eq!(book.entries().len(), 100);
        assert!((0..4u64).all(|w| (0..25).all(|i| book.is_done(w * 100 + i))));
    }
}
