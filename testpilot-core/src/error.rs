use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error reading file {path}: {source}")]
    ReadFile {
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned {status}")]
    UpstreamStatus { status: reqwest::StatusCode },

    #[error("upstream response did not match the completions schema: {0}")]
    UpstreamDecode(#[source] reqwest::Error),

    #[error("upstream response contained no completion choices")]
    MissingCompletion,

    #[error("error deserializing TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    Xdg(#[from] xdg::BaseDirectoriesError),
}
