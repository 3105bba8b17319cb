use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tron_editor::{EditorSession, SessionError};
use tron_offer::SkippedRow;

/// Upload formats, picked by file extension
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Json,
    Csv,
}

impl UploadKind {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(UploadKind::Json),
            Some("csv") => Ok(UploadKind::Csv),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub kind: UploadKind,
    pub offers: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Read an uploaded file as text
pub fn read_upload(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a campaign file and load it into `session`
pub fn load_file(session: &mut EditorSession, path: &Path) -> Result<LoadReport, LoadError> {
    let kind = UploadKind::from_path(path)?;
    let text = read_upload(path)?;

    let skipped = match kind {
        UploadKind::Json => {
            session.load_json(&text)?;
            Vec::new()
        }
        UploadKind::Csv => session.load_csv(&text)?,
    };
    let offers = session.state().map_or(0, |state| state.campaign.len());

    tracing::info!(path = %path.display(), ?kind, offers, "Loaded campaign file");
    Ok(LoadReport { kind, offers, skipped })
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported campaign file: {0} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(UploadKind::from_path(Path::new("a/offers.CSV")).unwrap(), UploadKind::Csv);
        assert_eq!(UploadKind::from_path(Path::new("campaign.json")).unwrap(), UploadKind::Json);
        assert!(matches!(
            UploadKind::from_path(Path::new("campaign.xlsx")),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::default();

        let err = load_file(&mut session, &dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(session.state().is_none());
    }

    #[test]
    fn test_load_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offers.csv");
        fs::write(
            &path,
            "id;sfname;name;tariff;title_pl;period;cashback;fee\n1;SF;P1;G11;T;\\N;50;10\n2;SF;P2\n",
        )
        .unwrap();

        let mut session = EditorSession::default();
        let report = load_file(&mut session, &path).unwrap();

        assert_eq!(report.kind, UploadKind::Csv);
        assert_eq!(report.offers, 1);
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_bad_json_file_is_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.json");
        fs::write(&path, "{ \"campaignMetadata\": 1 }").unwrap();

        let mut session = EditorSession::default();
        let err = load_file(&mut session, &path).unwrap_err();
        assert!(matches!(err, LoadError::Session(_)));
    }
}
