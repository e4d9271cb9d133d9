use std::io;

/// Represents the different types of errors that can occur in the categorizer.
#[derive(Debug, thiserror::Error)]
pub enum CategorizerError {
    /// The training corpus or configuration cannot produce a model
    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),
    /// The artifact location does not exist
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),
    /// The artifact bytes do not decode into a valid model
    #[error("Artifact corrupt: {0}")]
    ArtifactCorrupt(String),
    /// Labeled examples could not be read
    #[error("Dataset error: {0}")]
    Dataset(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<csv::Error> for CategorizerError {
    fn from(err: csv::Error) -> Self {
        CategorizerError::Dataset(err.to_string())
    }
}
