mod artifact;
pub mod builder;
mod categorizer;
mod error;
mod model;
mod text;
mod utils;
mod vectorizer;

pub use artifact::ModelArtifact;
pub use builder::{CategorizerBuilder, ClassDefinition, LabeledExample};
pub use categorizer::{Categorizer, Prediction, RankedCategory, SharedCategorizer, TOP_K};
pub use error::CategorizerError;
pub use model::SoftmaxRegression;
pub use text::normalize;
pub use vectorizer::TfidfVectorizer;

/// Information about a trained categorizer
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizerInfo {
    /// Number of categories the model distinguishes
    pub num_classes: usize,
    /// Category labels in class-index order
    pub class_labels: Vec<String>,
    /// Number of terms in the vocabulary
    pub vocabulary_size: usize,
}
