use std::collections::HashSet;

use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::CategorizerError;
use super::model::SoftmaxRegression;
use super::vectorizer::TfidfVectorizer;

pub(crate) const ARTIFACT_FORMAT: &str = "expense-categorizer";
pub(crate) const ARTIFACT_VERSION: u32 = 1;

/// Everything needed to reproduce inference: vocabulary, IDF weights, class
/// labels and classifier parameters.
///
/// An artifact is never modified once built. Retraining produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    vectorizer: TfidfVectorizer,
    model: SoftmaxRegression,
}

/// On-disk layout. Field names double as the structural schema checked on load.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactFile {
    format: String,
    version: u32,
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl ModelArtifact {
    pub(crate) fn new(vectorizer: TfidfVectorizer, model: SoftmaxRegression) -> Self {
        Self { vectorizer, model }
    }

    /// Class probabilities for `text`, in label order.
    pub fn probabilities(&self, text: &str) -> Array1<f64> {
        let features = self.vectorizer.transform(text);
        self.model.predict_proba(&features)
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &SoftmaxRegression {
        &self.model
    }

    pub fn labels(&self) -> &[String] {
        self.model.labels()
    }

    /// Serializes the artifact into a self-describing JSON blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CategorizerError> {
        let file = ArtifactFile {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            vocabulary: self.vectorizer.vocabulary().to_vec(),
            idf: self.vectorizer.idf().to_vec(),
            labels: self.model.labels().to_vec(),
            weights: self
                .model
                .weights()
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
            biases: self.model.biases().to_vec(),
        };
        serde_json::to_vec(&file).map_err(|e| {
            CategorizerError::ArtifactCorrupt(format!("Failed to encode artifact: {}", e))
        })
    }

    /// Decodes and validates an artifact produced by [`ModelArtifact::to_bytes`].
    ///
    /// # Errors
    /// `ArtifactCorrupt` if the bytes are not valid JSON, carry the wrong format
    /// tag or version, miss or add fields, or hold inconsistent parameters.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CategorizerError> {
        let file: ArtifactFile = serde_json::from_slice(bytes)
            .map_err(|e| CategorizerError::ArtifactCorrupt(format!("Failed to decode artifact: {}", e)))?;

        if file.format != ARTIFACT_FORMAT {
            return Err(CategorizerError::ArtifactCorrupt(format!(
                "Unexpected artifact format '{}'",
                file.format
            )));
        }
        if file.version != ARTIFACT_VERSION {
            return Err(CategorizerError::ArtifactCorrupt(format!(
                "Unsupported artifact version {} (expected {})",
                file.version, ARTIFACT_VERSION
            )));
        }
        if file.idf.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CategorizerError::ArtifactCorrupt(
                "IDF weights must be finite and non-negative".into(),
            ));
        }
        let mut params = file.weights.iter().flatten().chain(file.biases.iter());
        if params.any(|w| !w.is_finite()) {
            return Err(CategorizerError::ArtifactCorrupt(
                "Classifier parameters must be finite".into(),
            ));
        }
        let distinct: HashSet<&String> = file.labels.iter().collect();
        if distinct.len() != file.labels.len() || distinct.len() < 2 {
            return Err(CategorizerError::ArtifactCorrupt(
                "Class labels must be unique and at least 2".into(),
            ));
        }

        let n_features = file.vocabulary.len();
        let vectorizer = TfidfVectorizer::from_parts(file.vocabulary, file.idf).ok_or_else(|| {
            CategorizerError::ArtifactCorrupt("Vocabulary and IDF weights are inconsistent".into())
        })?;
        let model = SoftmaxRegression::from_parts(file.labels, file.weights, file.biases, n_features)
            .ok_or_else(|| {
                CategorizerError::ArtifactCorrupt(
                    "Classifier parameters do not match labels and vocabulary".into(),
                )
            })?;

        debug!(
            "Decoded artifact: {} terms, {} classes",
            vectorizer.len(),
            model.labels().len()
        );
        Ok(Self::new(vectorizer, model))
    }
}
