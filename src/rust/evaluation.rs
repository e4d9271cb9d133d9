//! Held-out evaluation: stratified splitting and per-category metrics.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::{Categorizer, CategorizerError, LabeledExample};

/// Splits examples into `(train, test)` keeping each category's proportion.
///
/// Each category contributes `round(n * test_fraction)` examples to the test
/// set, but always leaves at least one in the training set. The split is
/// deterministic for a given `seed`.
///
/// # Errors
/// `InvalidTrainingData` if `test_fraction` is outside `[0, 1)`.
pub fn train_test_split(
    examples: &[LabeledExample],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<LabeledExample>, Vec<LabeledExample>), CategorizerError> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(CategorizerError::InvalidTrainingData(format!(
            "test fraction must be in [0, 1), got {}",
            test_fraction
        )));
    }

    let mut by_category: BTreeMap<&str, Vec<&LabeledExample>> = BTreeMap::new();
    for example in examples {
        by_category
            .entry(example.category.as_str())
            .or_default()
            .push(example);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for group in by_category.values_mut() {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64 * test_fraction).round() as usize)
            .min(group.len().saturating_sub(1));
        test.extend(group[..n_test].iter().map(|e| (*e).clone()));
        train.extend(group[n_test..].iter().map(|e| (*e).clone()));
    }

    log::debug!("Split {} examples into {} train / {} test", examples.len(), train.len(), test.len());
    Ok((train, test))
}

/// Precision, recall and F1 for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of test examples whose true category is `label`
    pub support: usize,
}

/// Outcome of scoring a categorizer against labeled test data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Fraction of test examples categorized correctly
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub total: usize,
}

/// Predicts every test example and compares against its true category.
pub fn evaluate(categorizer: &Categorizer, test: &[LabeledExample]) -> EvaluationReport {
    let texts: Vec<&str> = test.iter().map(|e| e.text.as_str()).collect();
    let predictions = categorizer.predict_batch(texts.as_slice());

    let labels: BTreeSet<&str> = test
        .iter()
        .map(|e| e.category.as_str())
        .chain(predictions.iter().map(|p| p.category.as_str()))
        .collect();

    let mut correct = 0;
    let mut classes = Vec::with_capacity(labels.len());
    for label in &labels {
        let mut tp = 0usize;
        let mut predicted = 0usize;
        let mut support = 0usize;
        for (example, prediction) in test.iter().zip(&predictions) {
            let is_true = example.category == *label;
            let is_pred = prediction.category == *label;
            support += is_true as usize;
            predicted += is_pred as usize;
            tp += (is_true && is_pred) as usize;
        }
        correct += tp;

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        classes.push(ClassMetrics {
            label: label.to_string(),
            precision,
            recall,
            f1,
            support,
        });
    }

    let n = classes.len().max(1) as f64;
    EvaluationReport {
        accuracy: ratio(correct, test.len()),
        macro_precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
        macro_recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
        macro_f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
        classes,
        total: test.len(),
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>9} {:>9} {:>9} {:>9}",
            "category", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:<20} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:<20} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        write!(
            f,
            "{:<20} {:>9.2} {:>9.2} {:>9.2} {:>9}",
            "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_dataset;

    #[test]
    fn test_split_is_stratified() {
        let data = sample_dataset();
        let (train, test) = train_test_split(&data, 0.2, 42).unwrap();
        assert_eq!(train.len(), 160);
        assert_eq!(test.len(), 40);
        let food = test.iter().filter(|e| e.category == "Food").count();
        assert_eq!(food, 4);
    }

    #[test]
    fn test_split_is_deterministic() {
        let data = sample_dataset();
        let a = train_test_split(&data, 0.2, 7).unwrap();
        let b = train_test_split(&data, 0.2, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_keeps_one_training_example() {
        let data = vec![
            LabeledExample::new("Swiggy", "Food"),
            LabeledExample::new("Uber", "Travel"),
        ];
        let (train, test) = train_test_split(&data, 0.9, 1).unwrap();
        assert_eq!(train.len(), 2);
        assert!(test.is_empty());
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        let data = sample_dataset();
        assert!(train_test_split(&data, 1.0, 0).is_err());
        assert!(train_test_split(&data, -0.1, 0).is_err());
    }

    #[test]
    fn test_evaluate_training_data() {
        let data = vec![
            LabeledExample::new("Swiggy order biryani", "Food"),
            LabeledExample::new("Zomato order dinner", "Food"),
            LabeledExample::new("Uber ride airport", "Travel"),
            LabeledExample::new("Ola cab ride", "Travel"),
        ];
        let categorizer = Categorizer::train(data.clone()).unwrap();
        let report = evaluate(&categorizer, &data);
        assert_eq!(report.total, 4);
        assert!((report.accuracy - 1.0).abs() < 1e-12);
        assert_eq!(report.classes.len(), 2);
        assert!(report.classes.iter().all(|c| c.support == 2));
        assert!(report.to_string().contains("macro avg"));
    }

    #[test]
    fn test_evaluate_empty_test_set() {
        let categorizer =
            Categorizer::train(vec![("Swiggy", "Food"), ("Uber", "Travel")]).unwrap();
        let report = evaluate(&categorizer, &[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy, 0.0);
        assert!(report.classes.is_empty());
    }
}
