use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;
use serde::Serialize;

use super::artifact::ModelArtifact;
use super::builder::{CategorizerBuilder, LabeledExample};
use super::error::CategorizerError;
use super::utils::rank_indices;
use crate::TrainingConfig;

/// How many alternatives a [`Prediction`] lists.
pub const TOP_K: usize = 3;

/// One entry of a ranked shortlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCategory {
    pub category: String,
    /// Probability in `[0, 1]`
    pub probability: f64,
}

/// The result of categorizing one transaction description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// The most probable category
    pub category: String,
    /// Probability of `category` as a percentage in `[0, 100]`
    pub confidence: f64,
    /// At most [`TOP_K`] categories by descending probability; ties keep label order
    pub ranked: Vec<RankedCategory>,
}

/// A trained expense categorizer.
///
/// The model is immutable and held behind an `Arc`, so cloning is cheap and
/// a single instance can serve any number of threads without locking.
///
/// ```rust
/// # fn main() -> Result<(), expense_categorizer::CategorizerError> {
/// use expense_categorizer::Categorizer;
/// use std::sync::Arc;
/// use std::thread;
///
/// let categorizer = Arc::new(Categorizer::train(vec![
///     ("Swiggy order 450", "Food"),
///     ("Uber ride 300", "Travel"),
/// ])?);
///
/// let worker = Arc::clone(&categorizer);
/// thread::spawn(move || {
///     worker.predict("swiggy dinner");
/// }).join().unwrap();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Categorizer {
    artifact: Arc<ModelArtifact>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Categorizer>();
        assert_send_sync::<SharedCategorizer>();
    }
};

impl Categorizer {
    /// Creates a new CategorizerBuilder for fluent construction
    pub fn builder() -> CategorizerBuilder {
        CategorizerBuilder::new()
    }

    /// Trains a categorizer with the default configuration.
    ///
    /// # Errors
    /// `InvalidTrainingData` if `examples` is empty or has fewer than 2 distinct
    /// categories.
    pub fn train<I, E>(examples: I) -> Result<Self, CategorizerError>
    where
        I: IntoIterator<Item = E>,
        E: Into<LabeledExample>,
    {
        Self::train_with_config(examples, TrainingConfig::default())
    }

    pub fn train_with_config<I, E>(examples: I, config: TrainingConfig) -> Result<Self, CategorizerError>
    where
        I: IntoIterator<Item = E>,
        E: Into<LabeledExample>,
    {
        CategorizerBuilder::new()
            .with_config(config)
            .add_examples(examples)
            .build()
    }

    pub(crate) fn from_artifact(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Returns information about the trained model
    pub fn info(&self) -> super::CategorizerInfo {
        super::CategorizerInfo {
            num_classes: self.artifact.labels().len(),
            class_labels: self.artifact.labels().to_vec(),
            vocabulary_size: self.artifact.vectorizer().len(),
        }
    }

    /// Categorizes a transaction description.
    ///
    /// Text with no known terms, including the empty string, is not an error:
    /// the result then reflects only the class priors learned in the biases.
    pub fn predict(&self, text: &str) -> Prediction {
        let probabilities = self.artifact.probabilities(text);
        let labels = self.artifact.labels();
        let order = rank_indices(&probabilities);

        let ranked: Vec<RankedCategory> = order
            .iter()
            .take(TOP_K)
            .map(|&i| RankedCategory {
                category: labels[i].clone(),
                probability: probabilities[i],
            })
            .collect();

        // At least two classes always exist, so `ranked` is never empty.
        let top = order[0];
        Prediction {
            category: labels[top].clone(),
            confidence: probabilities[top] * 100.0,
            ranked,
        }
    }

    /// Categorizes each text in order; the output has the same length as the input.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Prediction> {
        debug!("Predicting batch of {} texts", texts.len());
        texts.iter().map(|t| self.predict(t.as_ref())).collect()
    }

    /// Probability per category; values sum to 1.
    pub fn scores(&self, text: &str) -> HashMap<String, f64> {
        let probabilities = self.artifact.probabilities(text);
        self.artifact
            .labels()
            .iter()
            .cloned()
            .zip(probabilities.iter().cloned())
            .collect()
    }

    /// Number of in-vocabulary term occurrences in `text`. Zero means the
    /// prediction carries no term signal.
    pub fn count_known_terms(&self, text: &str) -> usize {
        self.artifact.vectorizer().count_known_terms(text)
    }

    /// Serializes the model into a self-describing blob.
    pub fn save(&self) -> Result<Vec<u8>, CategorizerError> {
        self.artifact.to_bytes()
    }

    /// Restores a model saved with [`Categorizer::save`].
    ///
    /// # Errors
    /// `ArtifactCorrupt` if the bytes are not a valid artifact.
    pub fn load(bytes: &[u8]) -> Result<Self, CategorizerError> {
        let artifact = ModelArtifact::from_bytes(bytes)?;
        Ok(Self::from_artifact(Arc::new(artifact)))
    }

    /// Writes the model to `path`, replacing any existing file atomically.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), CategorizerError> {
        let path = path.as_ref();
        let bytes = self.save()?;
        crate::artifact_store::write_atomic(path, &bytes)?;
        info!("Saved model ({} bytes) to {:?}", bytes.len(), path);
        Ok(())
    }

    /// Reads a model from `path`.
    ///
    /// # Errors
    /// `ArtifactNotFound` if `path` does not exist, `ArtifactCorrupt` if its
    /// contents are not a valid artifact.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CategorizerError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                CategorizerError::ArtifactNotFound(path.display().to_string())
            }
            _ => CategorizerError::Io(e),
        })?;
        let categorizer = Self::load(&bytes)?;
        info!("Loaded model from {:?}", path);
        Ok(categorizer)
    }
}

/// A swappable handle to the categorizer currently in service.
///
/// Readers take a cheap `Arc` snapshot; replacing the model never disturbs a
/// prediction already running against the previous snapshot.
#[derive(Debug)]
pub struct SharedCategorizer {
    current: RwLock<Arc<Categorizer>>,
}

impl SharedCategorizer {
    pub fn new(categorizer: Categorizer) -> Self {
        Self {
            current: RwLock::new(Arc::new(categorizer)),
        }
    }

    /// Snapshot of the categorizer in service
    pub fn current(&self) -> Arc<Categorizer> {
        Arc::clone(&self.current.read())
    }

    /// Puts `next` in service and returns the one it replaced
    pub fn replace(&self, next: Categorizer) -> Arc<Categorizer> {
        let mut guard = self.current.write();
        std::mem::replace(&mut *guard, Arc::new(next))
    }

    /// Loads a model from `path` and swaps it in. On failure the current model
    /// stays in service.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<(), CategorizerError> {
        let next = Categorizer::load_from_file(path)?;
        self.replace(next);
        Ok(())
    }

    pub fn predict(&self, text: &str) -> Prediction {
        self.current().predict(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_categorizer() -> Categorizer {
        Categorizer::train(vec![
            ("Swiggy order biryani", "Food"),
            ("Zomato dinner", "Food"),
            ("Uber ride airport", "Travel"),
            ("Metro card recharge", "Travel"),
            ("Netflix subscription", "Entertainment"),
            ("PVR movie tickets", "Entertainment"),
            ("Electricity bill", "Utilities"),
        ])
        .expect("training should succeed")
    }

    #[test]
    fn test_predict_shape() {
        let categorizer = small_categorizer();
        let prediction = categorizer.predict("swiggy order");
        assert_eq!(prediction.ranked.len(), TOP_K);
        assert_eq!(prediction.category, prediction.ranked[0].category);
        assert!((prediction.confidence - prediction.ranked[0].probability * 100.0).abs() < 1e-9);
        assert!(prediction.confidence >= 0.0 && prediction.confidence <= 100.0);
    }

    #[test]
    fn test_ranked_is_truncated_to_class_count() {
        let categorizer = Categorizer::train(vec![("Swiggy order", "Food"), ("Uber ride", "Travel")]).unwrap();
        assert_eq!(categorizer.predict("swiggy").ranked.len(), 2);
    }

    #[test]
    fn test_scores_sum_to_one() {
        let categorizer = small_categorizer();
        let scores = categorizer.scores("uber to the airport");
        assert_eq!(scores.len(), 4);
        assert!((scores.values().sum::<f64>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_load_round_trip() {
        let categorizer = small_categorizer();
        let bytes = categorizer.save().unwrap();
        let loaded = Categorizer::load(&bytes).unwrap();
        assert_eq!(loaded.artifact(), categorizer.artifact());
        for text in ["swiggy order", "", "metro", "unknown words 123"] {
            assert_eq!(loaded.predict(text), categorizer.predict(text));
        }
    }

    #[test]
    fn test_shared_replace_keeps_old_snapshot() {
        let first = small_categorizer();
        let shared = SharedCategorizer::new(first);
        let snapshot = shared.current();

        let second = Categorizer::train(vec![("Gym membership", "Personal Care"), ("Uber ride", "Travel")]).unwrap();
        let previous = shared.replace(second);

        assert!(Arc::ptr_eq(&snapshot, &previous));
        assert_eq!(snapshot.info().num_classes, 4);
        assert_eq!(shared.current().info().num_classes, 2);
    }

    #[test]
    fn test_shared_reload_failure_keeps_current() {
        let shared = SharedCategorizer::new(small_categorizer());
        let err = shared.reload_from_file("/nonexistent/dir/model.json").unwrap_err();
        assert!(matches!(err, CategorizerError::ArtifactNotFound(_)));
        assert_eq!(shared.current().info().num_classes, 4);
    }
}
