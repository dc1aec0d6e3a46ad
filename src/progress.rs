// src/progress.rs

use chrono::Local;
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{info, warn};

/// Milestone log handed to every pipeline stage.
pub trait ProgressLog {
    fn log(&self, stage: &str, message: &str);
}

/// Appends `<YYYY-MM-DD HH:MM:SS> : <message>` lines to a text file.
pub struct FileProgressLog {
    path: PathBuf,
}

impl FileProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{} : {}", ts, message)
    }
}

impl ProgressLog for FileProgressLog {
    fn log(&self, stage: &str, message: &str) {
        info!(stage, "{}", message);
        // the milestone log is a side channel; losing a line never fails the run
        if let Err(e) = self.append(message) {
            warn!(path = %self.path.display(), error = %e, "could not append progress line");
        }
    }
}

/// Keeps `(stage, message)` pairs in memory.
#[derive(Default)]
pub struct MemoryProgressLog {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, m)| m).collect()
    }
}

impl ProgressLog for MemoryProgressLog {
    fn log(&self, stage: &str, message: &str) {
        info!(stage, "{}", message);
        let mut guard = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((stage.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tempfile::tempdir;

    #[test]
    fn file_log_appends_timestamped_lines() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("etl_project_log.txt");
        let log = FileProgressLog::new(&path);

        log.log("extract", "Starting extraction");
        log.log("extract", "Extraction complete: 10 rows");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let re = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} : (.+)$").unwrap();
        let caps = re.captures(lines[1]).expect("line format");
        assert_eq!(&caps[1], "Extraction complete: 10 rows");
    }

    #[test]
    fn file_log_survives_unwritable_path() {
        let tmp = tempdir().unwrap();
        // a directory cannot be opened for append
        let log = FileProgressLog::new(tmp.path());
        log.log("extract", "still running");
    }

    #[test]
    fn memory_log_keeps_stage_and_message() {
        let log = MemoryProgressLog::new();
        log.log("load", "CSV saved");
        assert_eq!(
            log.entries(),
            vec![("load".to_string(), "CSV saved".to_string())]
        );
    }
}
