//! Snapshot sources - bundled sample data or a snapshot file on disk
//!
//! Snapshot files hold an already normalised [`SchedulerSnapshot`] as JSON
//! (`.json`) or YAML (`.yml` / `.yaml`).

use crate::data::SchedulerSnapshot;
use crate::samples::sample_snapshot;
use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a snapshot
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON snapshot {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML snapshot {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported snapshot format {} (expected .json, .yml or .yaml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// On-disk snapshot encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Where the dashboard gets its scheduler data from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    Sample,
    File(PathBuf),
}

impl SnapshotSource {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Sample,
        }
    }

    /// Short description for status lines
    pub fn describe(&self) -> String {
        match self {
            Self::Sample => "sample".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Load a fresh snapshot
    pub async fn fetch(&self) -> Result<SchedulerSnapshot, SourceError> {
        match self {
            Self::Sample => Ok(sample_snapshot(Utc::now())),
            Self::File(path) => load_snapshot_file(path).await,
        }
    }
}

/// Read and decode a snapshot file
pub async fn load_snapshot_file(path: &Path) -> Result<SchedulerSnapshot, SourceError> {
    let format = SnapshotFormat::from_path(path)
        .ok_or_else(|| SourceError::UnsupportedFormat(path.to_path_buf()))?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut snapshot = parse_snapshot(&content, format, path)?;
    if snapshot.source.trim().is_empty() {
        snapshot.source = path.display().to_string();
    }
    log::debug!(
        "Loaded snapshot from {}: {} jobs, {} nodes, {} queues",
        path.display(),
        snapshot.jobs.len(),
        snapshot.nodes.len(),
        snapshot.queues.len()
    );
    Ok(snapshot)
}

fn parse_snapshot(
    content: &str,
    format: SnapshotFormat,
    path: &Path,
) -> Result<SchedulerSnapshot, SourceError> {
    match format {
        SnapshotFormat::Json => serde_json::from_str(content).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        }),
        SnapshotFormat::Yaml => serde_yaml::from_str(content).map_err(|source| SourceError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML_SNAPSHOT: &str = r#"
timestamp: "2024-05-10T12:00:00Z"
source: ""
jobs:
  - id: "7.pbs"
    name: sim
    user: alice
    queue: work
    state: R
    exec_host: "cn01/0*4+cn02/0*4"
"#;

    #[test]
    fn test_format_detection() {
        assert_eq!(SnapshotFormat::from_path(Path::new("a.json")), Some(SnapshotFormat::Json));
        assert_eq!(SnapshotFormat::from_path(Path::new("a.YML")), Some(SnapshotFormat::Yaml));
        assert_eq!(SnapshotFormat::from_path(Path::new("a.yaml")), Some(SnapshotFormat::Yaml));
        assert_eq!(SnapshotFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(SnapshotFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_fetch_sample() {
        let snapshot = tokio_test::block_on(SnapshotSource::Sample.fetch()).unwrap();
        assert_eq!(snapshot.source, "sample");
        assert!(!snapshot.jobs.is_empty());
    }

    #[test]
    fn test_fetch_yaml_file_defaults_source_to_path() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(YAML_SNAPSHOT.as_bytes()).unwrap();

        let source = SnapshotSource::File(file.path().to_path_buf());
        let snapshot = tokio_test::block_on(source.fetch()).unwrap();
        assert_eq!(snapshot.source, file.path().display().to_string());
        assert_eq!(snapshot.jobs[0].node_summary().count, Some(2));
    }

    #[test]
    fn test_fetch_errors() {
        let err = tokio_test::block_on(load_snapshot_file(Path::new("snapshot.txt"))).unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedFormat(_)));

        let err = tokio_test::block_on(load_snapshot_file(Path::new("/nonexistent/s.json")))
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = tokio_test::block_on(load_snapshot_file(file.path())).unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
        assert!(err.to_string().starts_with("invalid JSON snapshot"));
    }
}
