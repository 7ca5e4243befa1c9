//! Initial data source: a local file or a remote URL

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use rpg_gen_core::{CompilePolicy, GeneratorSet, LoadError};
use thiserror::Error;
use tracing::{debug, error};

/// Where the initial generator document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Local(PathBuf),
    Remote(String),
}

/// Failure to obtain or compile the initial document.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl DataSource {
    /// `http://` and `https://` values are remote; anything else is a path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Remote(value.to_string())
        } else {
            DataSource::Local(PathBuf::from(value))
        }
    }

    /// Read the raw document bytes.
    pub async fn read(&self, timeout: Duration) -> Result<Vec<u8>, SourceError> {
        match self {
            DataSource::Local(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            DataSource::Remote(url) => fetch(url, timeout).await,
        }
    }

    /// Read and compile the document.
    pub async fn load(
        &self,
        policy: &CompilePolicy,
        timeout: Duration,
    ) -> Result<GeneratorSet, SourceError> {
        let bytes = self.read(timeout).await?;
        debug!("Read {} bytes from {}", bytes.len(), self);
        Ok(GeneratorSet::from_slice(&bytes, policy)?)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Local(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => f.write_str(url),
        }
    }
}

async fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, SourceError> {
    let transport = |source: reqwest::Error| SourceError::Transport {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(transport)?;

    let response = client.get(url).send().await.map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Fetching {} returned {}: {}", url, status, body);
        return Err(SourceError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response.bytes().await.map_err(transport)?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            DataSource::parse("https://example.com/gen.yaml"),
            DataSource::Remote("https://example.com/gen.yaml".to_string())
        );
        assert_eq!(
            DataSource::parse("http://localhost:9000/gen.yaml"),
            DataSource::Remote("http://localhost:9000/gen.yaml".to_string())
        );
        assert_eq!(
            DataSource::parse("data/demo.yaml"),
            DataSource::Local(PathBuf::from("data/demo.yaml"))
        );
        // Only a URL scheme makes a source remote.
        assert_eq!(
            DataSource::parse("httpdata.yaml"),
            DataSource::Local(PathBuf::from("httpdata.yaml"))
        );
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "version: 1\ngenerators:\n  - name: colors\n    type: unweighted\n    entries: [red, blue]"
        )
        .unwrap();

        let source = DataSource::Local(file.path().to_path_buf());
        let set = source
            .load(&CompilePolicy::default(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["colors"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = DataSource::Local(PathBuf::from("/definitely/not/here.yaml"));
        let err = source
            .load(&CompilePolicy::default(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_document_is_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generators:\n  - name: x\n    type: bogus\n    entries: [a]").unwrap();

        let source = DataSource::Local(file.path().to_path_buf());
        let err = source
            .load(&CompilePolicy::default(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Load(LoadError::Compile(_))));
    }

    #[tokio::test]
    async fn test_unreachable_remote_fails() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let source = DataSource::parse("http://127.0.0.1:9/gen.yaml");
        let err = source
            .load(&CompilePolicy::default(), Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::Transport { .. } | SourceError::Status { .. }
        ));
    }
}
