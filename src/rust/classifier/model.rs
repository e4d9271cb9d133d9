use std::collections::BTreeSet;

use log::debug;
use ndarray::{Array1, Array2, Axis};

use super::error::CategorizerError;
use super::utils::softmax;
use crate::TrainingConfig;

/// Multinomial logistic regression over dense feature vectors.
///
/// Holds one weight row and one bias per class. Class order is the sorted
/// order of the labels seen during training.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxRegression {
    labels: Vec<String>,
    weights: Array2<f64>,
    biases: Array1<f64>,
}

impl SoftmaxRegression {
    /// Fits the model with full-batch gradient descent on L2-penalized
    /// cross-entropy.
    ///
    /// Stops once every gradient component is below `config.tolerance`, or after
    /// `config.max_iterations` steps with whatever parameters were reached.
    pub fn fit(
        features: &Array2<f64>,
        labels: &[String],
        config: &TrainingConfig,
    ) -> Result<Self, CategorizerError> {
        let (n_samples, n_features) = features.dim();
        if n_samples != labels.len() {
            return Err(CategorizerError::InvalidTrainingData(format!(
                "{} feature rows but {} labels",
                n_samples,
                labels.len()
            )));
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(CategorizerError::InvalidTrainingData(format!(
                "at least 2 distinct categories are required, found {}",
                classes.len()
            )));
        }

        let n_classes = classes.len();
        let mut targets = Array2::<f64>::zeros((n_samples, n_classes));
        for (row, label) in labels.iter().enumerate() {
            if let Ok(class) = classes.binary_search(label) {
                targets[[row, class]] = 1.0;
            }
        }

        let mut weights = Array2::<f64>::zeros((n_classes, n_features));
        let mut biases = Array1::<f64>::zeros(n_classes);
        let n = n_samples as f64;
        let alpha = 1.0 / (config.inverse_regularization * n);

        let mut converged = false;
        let mut iterations = 0;
        while iterations < config.max_iterations {
            iterations += 1;

            let logits = features.dot(&weights.t()) + &biases;
            let mut residual = logits;
            for mut row in residual.rows_mut() {
                let p = softmax(&row.to_owned());
                row.assign(&p);
            }
            residual -= &targets;

            let grad_w = residual.t().dot(features) / n + &weights * alpha;
            let grad_b = residual.sum_axis(Axis(0)) / n;

            let largest = grad_w
                .iter()
                .chain(grad_b.iter())
                .fold(0.0f64, |m, g| m.max(g.abs()));

            weights.scaled_add(-config.learning_rate, &grad_w);
            biases.scaled_add(-config.learning_rate, &grad_b);

            if largest < config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("Softmax regression converged after {} iterations", iterations);
        } else {
            debug!(
                "Softmax regression stopped at the iteration limit ({}) without converging",
                config.max_iterations
            );
        }

        Ok(Self {
            labels: classes,
            weights,
            biases,
        })
    }

    /// Rebuilds a model from stored parameters.
    ///
    /// Returns `None` unless there is one weight row and one bias per label and
    /// every row has `n_features` entries.
    pub(crate) fn from_parts(
        labels: Vec<String>,
        weights: Vec<Vec<f64>>,
        biases: Vec<f64>,
        n_features: usize,
    ) -> Option<Self> {
        if labels.len() != weights.len() || labels.len() != biases.len() {
            return None;
        }
        if weights.iter().any(|row| row.len() != n_features) {
            return None;
        }
        let flat: Vec<f64> = weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((labels.len(), n_features), flat).ok()?;
        Some(Self {
            labels,
            weights,
            biases: Array1::from(biases),
        })
    }

    /// Raw linear score per class.
    pub fn decision_function(&self, features: &Array1<f64>) -> Array1<f64> {
        self.weights.dot(features) + &self.biases
    }

    /// Class probabilities in label order; they sum to 1.
    pub fn predict_proba(&self, features: &Array1<f64>) -> Array1<f64> {
        softmax(&self.decision_function(features))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f64> {
        &self.biases
    }

    pub fn num_features(&self) -> usize {
        self.weights.ncols()
    }
}
