use crate::state::messages::{LoadRequest, LoadResponse};
use bracket_geometry::Tournament;
use log::{debug, error};
use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

const EMBEDDED_BRACKET_JSON: &str = include_str!("../../fixtures/tournament.json");

/// Where the bracket dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Embedded,
    File(PathBuf),
}

impl DataSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(DataSource::File).unwrap_or(DataSource::Embedded)
    }

    pub fn label(&self) -> String {
        match self {
            DataSource::Embedded => "built-in fixture".to_string(),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error, String),
    Parsing(serde_json::Error, String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e, source) => write!(f, "could not read {source}: {e}"),
            LoadError::Parsing(e, source) => write!(f, "invalid bracket json in {source}: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

pub struct LoaderWorker {
    source: DataSource,
    requests: mpsc::Receiver<LoadRequest>,
    responses: mpsc::Sender<LoadResponse>,
}

impl LoaderWorker {
    pub fn new(
        source: DataSource,
        requests: mpsc::Receiver<LoadRequest>,
        responses: mpsc::Sender<LoadResponse>,
    ) -> Self {
        Self { source, requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let response = match request {
                LoadRequest::LoadBracket => match load_tournament(&self.source).await {
                    Ok(tournament) => LoadResponse::BracketLoaded {
                        tournament,
                        source: self.source.label(),
                    },
                    Err(err) => LoadResponse::Error { message: err.to_string() },
                },
            };

            debug!("load request complete");
            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send load response: {e}");
                break;
            }
        }
    }
}

pub async fn load_tournament(source: &DataSource) -> Result<Tournament, LoadError> {
    match source {
        DataSource::Embedded => {
            debug!("loading embedded bracket fixture");
            parse_tournament(EMBEDDED_BRACKET_JSON, &source.label())
        }
        DataSource::File(path) => {
            debug!("loading bracket from {}", path.display());
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LoadError::Io(e, source.label()))?;
            parse_tournament(&content, &source.label())
        }
    }
}

fn parse_tournament(content: &str, source: &str) -> Result<Tournament, LoadError> {
    serde_json::from_str(content).map_err(|e| LoadError::Parsing(e, source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedded_fixture_parses() {
        let t = load_tournament(&DataSource::Embedded)
            .await
            .expect("embedded fixture should parse");
        assert_eq!(t.title.as_deref(), Some("Club Championship"));
        let sizes: Vec<usize> = t.rounds.iter().map(|r| r.matches.len()).collect();
        assert_eq!(sizes, vec![8, 4, 2, 1]);
    }

    #[tokio::test]
    async fn missing_file_reports_io_error() {
        let source = DataSource::File(PathBuf::from("/definitely/not/here.json"));
        let err = load_tournament(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Io(..)));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = parse_tournament("{ \"rounds\": 3 }", "inline").unwrap_err();
        assert!(matches!(err, LoadError::Parsing(..)));
    }

    #[test]
    fn source_defaults_to_embedded() {
        assert_eq!(DataSource::from_path(None), DataSource::Embedded);
        assert_eq!(
            DataSource::from_path(Some(PathBuf::from("b.json"))),
            DataSource::File(PathBuf::from("b.json"))
        );
    }
}
