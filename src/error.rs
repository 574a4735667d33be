use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: u16,
    },
    #[error("failed to decode {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl FetchError {
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_connect() || source.is_timeout(),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize json output: {0}")]
    JsonSerialize(#[from] serde_json::Error),
    #[error("failed to serialize yaml output: {0}")]
    YamlSerialize(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid args: {0}\n\nTip: run `dashkpi --help` to see usage and examples.")]
    InvalidArgs(String),
    #[error("config error: {0}\n\nTip: check the file passed via --config or DASHKPI_CONFIG.")]
    Config(#[from] ConfigError),
    #[error("fetch error: {0}\n\n{tip}", tip = fetch_tip(.0))]
    Fetch(#[from] FetchError),
    #[error("output error: {0}\n\nTip: supported formats are `table`, `json`, `yaml`.")]
    Output(#[from] OutputError),
    #[error("runtime error: {0}")]
    Runtime(#[source] std::io::Error),
}

fn fetch_tip(error: &FetchError) -> &'static str {
    match error {
        FetchError::Status { status: 404, .. } => {
            "Tip: the endpoint was not found. Check that --base-url points at the BI backend."
        }
        FetchError::InvalidUrl { .. } => "Tip: base url must look like `http://127.0.0.1:8000`.",
        error if error.is_unreachable() => {
            "Tip: the backend is unreachable. Check that it is running and that --base-url is right."
        }
        _ => "Tip: check the backend logs and retry.",
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, ConfigError, FetchError};

    #[test]
    fn status_404_contains_base_url_tip() {
        let err = CliError::Fetch(FetchError::Status {
            endpoint: "/stocks".to_string(),
            status: 404,
        });
        let rendered = err.to_string();
        assert!(rendered.contains("/stocks answered with status 404"));
        assert!(rendered.contains("--base-url"));
    }

    #[test]
    fn decode_error_contains_generic_tip() {
        let err = CliError::Fetch(FetchError::Decode {
            endpoint: "/equipes".to_string(),
            reason: "expected a JSON array".to_string(),
        });
        let rendered = err.to_string();
        assert!(rendered.contains("expected a JSON array"));
        assert!(rendered.contains("check the backend logs"));
    }

    #[test]
    fn invalid_url_shows_expected_shape() {
        let err = CliError::Fetch(FetchError::InvalidUrl {
            url: "localhost:8000".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        let rendered = err.to_string();
        assert!(rendered.contains("'localhost:8000'"));
        assert!(rendered.contains("http://127.0.0.1:8000"));
    }

    #[test]
    fn invalid_config_value_names_the_key() {
        let err = CliError::Config(ConfigError::Invalid {
            key: "page_size",
            reason: "must be greater than zero".to_string(),
        });
        let rendered = err.to_string();
        assert!(rendered.contains("'page_size'"));
        assert!(rendered.contains("DASHKPI_CONFIG"));
    }
}
