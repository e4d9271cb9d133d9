use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info};
use ndarray::Array2;

use super::artifact::ModelArtifact;
use super::categorizer::Categorizer;
use super::error::CategorizerError;
use super::model::SoftmaxRegression;
use super::vectorizer::TfidfVectorizer;
use crate::TrainingConfig;

/// A raw transaction description paired with its category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LabeledExample {
    /// Raw, un-normalized transaction text
    #[serde(alias = "transaction")]
    pub text: String,
    pub category: String,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

impl<T: Into<String>, C: Into<String>> From<(T, C)> for LabeledExample {
    fn from((text, category): (T, C)) -> Self {
        Self::new(text, category)
    }
}

/// A category together with the transaction texts that belong to it.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The category name
    pub label: String,
    /// Example transaction texts for this category
    pub examples: Vec<String>,
}

impl ClassDefinition {
    /// Creates a category with no examples yet
    ///
    /// # Example
    /// ```
    /// use expense_categorizer::ClassDefinition;
    ///
    /// let food = ClassDefinition::new("Food")
    ///     .with_examples(vec!["Swiggy order 450", "Zomato payment 320"]);
    /// assert_eq!(food.examples.len(), 2);
    /// ```
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            examples: Vec::new(),
        }
    }

    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }
}

/// A builder for training a [`Categorizer`] with a fluent interface.
#[derive(Debug, Clone, Default)]
pub struct CategorizerBuilder {
    examples: Vec<LabeledExample>,
    config: TrainingConfig,
}

impl CategorizerBuilder {
    /// Creates an empty builder with the default [`TrainingConfig`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the training configuration
    ///
    /// # Example
    /// ```
    /// use expense_categorizer::{CategorizerBuilder, TrainingConfig};
    ///
    /// let builder = CategorizerBuilder::new()
    ///     .with_config(TrainingConfig::default().with_max_features(50));
    /// ```
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a single labeled example
    pub fn add_example(mut self, example: impl Into<LabeledExample>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Adds labeled examples in order
    pub fn add_examples<I, E>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<LabeledExample>,
    {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }

    /// Adds every example of a class definition
    ///
    /// # Errors
    /// `InvalidTrainingData` if the label is empty or the class has no examples.
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, CategorizerError> {
        if class.label.is_empty() {
            return Err(CategorizerError::InvalidTrainingData(
                "Class label cannot be empty".into(),
            ));
        }
        if class.examples.is_empty() {
            return Err(CategorizerError::InvalidTrainingData(format!(
                "Class '{}' must have at least one example",
                class.label
            )));
        }
        let label = class.label;
        self.examples.extend(
            class
                .examples
                .into_iter()
                .map(|text| LabeledExample::new(text, label.clone())),
        );
        Ok(self)
    }

    /// Fits the vectorizer and the classifier and returns the trained categorizer
    ///
    /// # Errors
    /// `InvalidTrainingData` if no examples were added, fewer than 2 distinct
    /// categories are present, or the configuration is invalid.
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), expense_categorizer::CategorizerError> {
    /// use expense_categorizer::{Categorizer, ClassDefinition};
    ///
    /// let categorizer = Categorizer::builder()
    ///     .add_class(ClassDefinition::new("Food").with_examples(vec!["Swiggy order 450"]))?
    ///     .add_class(ClassDefinition::new("Travel").with_examples(vec!["Uber ride 300"]))?
    ///     .build()?;
    /// assert_eq!(categorizer.info().num_classes, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Categorizer, CategorizerError> {
        self.config.validate()?;
        if self.examples.is_empty() {
            return Err(CategorizerError::InvalidTrainingData(
                "At least one training example is required".into(),
            ));
        }
        let distinct: BTreeSet<&str> = self.examples.iter().map(|e| e.category.as_str()).collect();
        if distinct.len() < 2 {
            return Err(CategorizerError::InvalidTrainingData(format!(
                "At least 2 distinct categories are required, found {}",
                distinct.len()
            )));
        }

        info!(
            "Training on {} examples across {} categories",
            self.examples.len(),
            distinct.len()
        );

        let texts: Vec<&str> = self.examples.iter().map(|e| e.text.as_str()).collect();
        let labels: Vec<String> = self.examples.iter().map(|e| e.category.clone()).collect();

        let vectorizer = TfidfVectorizer::fit(&texts, self.config.max_features);
        info!("Vocabulary built with {} terms", vectorizer.len());

        let mut features = Array2::<f64>::zeros((texts.len(), vectorizer.len()));
        for (i, text) in texts.iter().enumerate() {
            features.row_mut(i).assign(&vectorizer.transform(text));
        }
        debug!("Feature matrix shape: {:?}", features.dim());

        let model = SoftmaxRegression::fit(&features, &labels, &self.config)?;
        info!("Classifier trained for labels {:?}", model.labels());

        Ok(Categorizer::from_artifact(Arc::new(ModelArtifact::new(
            vectorizer, model,
        ))))
    }
}
