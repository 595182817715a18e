use thiserror::Error;

/// Coarse classification the UI surfaces to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Decode,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network { .. } | Self::Status { .. } => FetchErrorKind::Network,
            Self::Decode { .. } | Self::InvalidUrl { .. } => FetchErrorKind::Decode,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::InvalidUrl { url, .. } => url,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    #[error("failed to parse settings file '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_network_failures_share_network_kind() {
        let err = FetchError::Status {
            url: "http://x.test/episode/99".to_string(),
            status: 404,
            message: "Episode not found".to_string(),
        };
        assert_eq!(err.kind(), FetchErrorKind::Network);
        assert_eq!(err.url(), "http://x.test/episode/99");
        assert_eq!(
            err.to_string(),
            "http://x.test/episode/99 answered 404: Episode not found"
        );
    }

    #[test]
    fn malformed_body_is_decode_kind() {
        let source = serde_json::from_str::<u32>("nope").expect_err("not json");
        let err = FetchError::Decode {
            url: "http://x.test/episode".to_string(),
            source,
        };
        assert_eq!(err.kind(), FetchErrorKind::Decode);
    }
}
