//! A thread-safe expense categorizer: TF-IDF features over transaction text and a
//! multinomial logistic regression model.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use expense_categorizer::{Categorizer, ClassDefinition};
//!
//! let categorizer = Categorizer::builder()
//!     .add_class(
//!         ClassDefinition::new("Food")
//!             .with_examples(vec!["Swiggy order 450", "Zomato payment 320", "Restaurant bill 850"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("Travel")
//!             .with_examples(vec!["Uber ride 300", "Metro card recharge 500", "Flight booking 8500"])
//!     )?
//!     .build()?;
//!
//! let prediction = categorizer.predict("Swiggy order biryani 450");
//! println!("{} ({:.2}%)", prediction.category, prediction.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! A trained model is a single artifact. `save` and `load` round-trip it
//! without changing any prediction:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use expense_categorizer::{Categorizer, dataset};
//!
//! let categorizer = Categorizer::train(dataset::sample_dataset())?;
//! let bytes = categorizer.save()?;
//! let restored = Categorizer::load(&bytes)?;
//! assert_eq!(restored.predict("Netflix"), categorizer.predict("Netflix"));
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `Categorizer` is immutable after training or loading and can be shared
//! across threads with `Arc`. Use [`SharedCategorizer`] to swap in a retrained
//! model while other threads keep predicting.

pub mod artifact_store;
pub mod classifier;
mod config;
pub mod dataset;
pub mod evaluation;

pub use artifact_store::ArtifactStore;
pub use classifier::{
    normalize, Categorizer, CategorizerBuilder, CategorizerError, CategorizerInfo,
    ClassDefinition, LabeledExample, ModelArtifact, Prediction, RankedCategory,
    SharedCategorizer, SoftmaxRegression, TfidfVectorizer, TOP_K,
};
pub use config::TrainingConfig;
pub use evaluation::{evaluate, train_test_split, EvaluationReport};

pub fn init_logger() {
    env_logger::init();
}
