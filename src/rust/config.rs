use crate::CategorizerError;

/// Settings for fitting the vectorizer and the softmax regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Upper bound on vocabulary size (unigrams and bigrams)
    pub max_features: usize,
    /// Upper bound on gradient descent steps
    pub max_iterations: usize,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Inverse L2 regularization strength; larger means weaker regularization
    pub inverse_regularization: f64,
    /// Training stops once every gradient component is below this value
    pub tolerance: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_features: 100,
            max_iterations: 1000,
            learning_rate: 1.0,
            inverse_regularization: 1.0,
            tolerance: 1e-4,
        }
    }
}

impl TrainingConfig {
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that every setting is usable for training.
    pub fn validate(&self) -> Result<(), CategorizerError> {
        if self.max_features == 0 {
            return Err(CategorizerError::InvalidTrainingData(
                "max_features must be at least 1".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(CategorizerError::InvalidTrainingData(
                "max_iterations must be at least 1".into(),
            ));
        }
        let positive = [
            ("learning_rate", self.learning_rate),
            ("inverse_regularization", self.inverse_regularization),
            ("tolerance", self.tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CategorizerError::InvalidTrainingData(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
