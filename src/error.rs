//! Configuration-time error handling
//!
//! The lookup path itself never surfaces errors to the caller; every
//! per-request failure degrades to fewer or zero suggestions. The one
//! fatal condition is a misconfigured dispatch table, which must fail
//! at engine construction rather than per request.

use thiserror::Error;

/// Errors raised while compiling the dispatch configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no normalizer registered for service '{service}' (vocabulary kind '{kind}')")]
    MissingNormalizer { kind: String, service: String },

    #[error("invalid endpoint URL for service '{service}': {source}")]
    InvalidEndpoint {
        service: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid HTTP method '{method}' for service '{service}'")]
    InvalidMethod { service: String, method: String },

    #[error("vocabulary kind '{0}' has no query plans")]
    EmptyKind(String),

    #[error("vocabulary kind '{0}' has no allowed locales")]
    NoLocales(String),

    #[error("failed to parse dispatch configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
