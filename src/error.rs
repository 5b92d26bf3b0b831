use graphql_parser::schema::ParseError;

/// Failure of a generation pass. No partial document is ever returned alongside it.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("could not find filter type for {entity}; is this schema produced by the expected indexer pipeline?")]
    MissingFilterType { entity: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("unable to parse schema SDL: {0}")]
    Sdl(#[from] ParseError),
    #[error("unable to decode introspection response at {path}: {message}")]
    Introspection { path: String, message: String },
    #[error("endpoint returned errors: {0}")]
    Response(String),
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<serde_path_to_error::Error<serde_json::Error>> for SchemaLoadError {
    fn from(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
        SchemaLoadError::Introspection {
            path: error.path().to_string(),
            message: error.inner().to_string(),
        }
    }
}
