use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Request log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the proxy request log (`~/.mvp-prompt/requests.jsonl`).
///
/// One line per handled request. Used for operational visibility and
/// surfaced by `mvp-prompt health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub latency_ms: u64,
    /// `"validation"`, `"backend"` or `"transport"` for failed requests.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl RequestLogEntry {
    pub fn new(
        method: &str,
        path: &str,
        status: u16,
        latency_ms: u64,
        error: Option<&AppError>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            method: method.to_string(),
            path: path.to_string(),
            status,
            latency_ms,
            error_kind: error.map(|e| e.kind().to_string()),
            error: error.map(|e| e.message().to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append an entry to the request log. Best-effort: failures are ignored.
pub fn log_request(entry: &RequestLogEntry) {
    let Some(path) = request_log_path() else {
        return;
    };
    let _ = append_entry(&path, entry);
}

fn append_entry(path: &PathBuf, entry: &RequestLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    // One write per line so concurrent appends never interleave.
    file.write_all(format!("{json}\n").as_bytes())?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from the request log.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries() -> Vec<RequestLogEntry> {
    let Some(path) = request_log_path() else {
        return Vec::new();
    };
    read_entries_from(&path)
}

fn read_entries_from(path: &PathBuf) -> Vec<RequestLogEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<RequestLogEntry>(&line).ok())
        .collect()
}

/// Return the path to the request log file.
pub fn request_log_path() -> Option<PathBuf> {
    crate::config::data_dir().map(|dir| dir.join("requests.jsonl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "mvp-prompt-{name}-{}.jsonl",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn entry_records_error_kind_and_message() {
        let err = AppError::Backend("rate limited".into());
        let entry = RequestLogEntry::new("POST", "/generate", 500, 12, Some(&err));
        assert_eq!(entry.error_kind.as_deref(), Some("backend"));
        assert_eq!(entry.error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn successful_entry_omits_error_fields() {
        let entry = RequestLogEntry::new("GET", "/health", 200, 0, None);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("error"));
        assert!(json.contains("\"status\":200"));
    }

    #[test]
    fn append_then_read_skips_garbage_lines() {
        let path = scratch_file("append");
        append_entry(&path, &RequestLogEntry::new("GET", "/stats", 200, 3, None)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "not json").unwrap();
        }
        append_entry(&path, &RequestLogEntry::new("POST", "/generate", 400, 0, None)).unwrap();

        let entries = read_entries_from(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "/stats");
        assert_eq!(entries[1].status, 400);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn concurrent_appends_keep_every_line_intact() {
        let path = scratch_file("concurrent");
        let threads = 8;
        let per_thread = 100;
        let long_error = AppError::Backend("x".repeat(4096));

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let path = path.clone();
                let err = long_error.clone();
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        let path_label = format!("/generate/{t}/{i}");
                        let entry = RequestLogEntry::new("POST", &path_label, 500, 1, Some(&err));
                        append_entry(&path, &entry).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = read_entries_from(&path);
        assert_eq!(entries.len(), threads * per_thread);
        assert!(entries.iter().all(|e| e.error.as_deref().map(str::len) == Some(4096)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let path = scratch_file("missing");
        assert!(read_entries_from(&path).is_empty());
    }
}
