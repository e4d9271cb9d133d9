use expense_categorizer::{normalize, Categorizer, LabeledExample, TOP_K};
use std::sync::Arc;
use std::thread;

fn food_travel_corpus() -> Vec<LabeledExample> {
    let food = [
        "Swiggy order 450", "Zomato payment 320", "Restaurant bill 850", "Swiggy dinner 300",
        "Zomato lunch 250", "Restaurant dinner 1200", "Swiggy biryani 400", "Zomato pizza 550",
        "Restaurant lunch buffet", "Swiggy breakfast 180", "Zomato pro 299", "Restaurant tip 100",
        "Swiggy genie 50", "Zomato dessert 220", "Restaurant brunch 900", "Swiggy instamart 650",
        "Zomato burger 300", "Restaurant family dinner", "Swiggy snacks 150", "Zomato coffee 180",
    ];
    let travel = [
        "Uber ride 300", "Metro card recharge 500", "Flight booking 8500", "Uber airport 800",
        "Metro ticket 40", "Flight to delhi 6500", "Uber moto 60", "Metro pass monthly",
        "Flight change fee", "Uber pool 150", "Metro smart card", "Flight baggage 1200",
        "Uber intercity 2500", "Metro token 30", "Flight return ticket", "Uber premier 650",
        "Metro recharge 200", "Flight checkin seat", "Uber auto 90", "Metro weekend pass",
    ];
    food.iter()
        .map(|t| LabeledExample::new(*t, "Food"))
        .chain(travel.iter().map(|t| LabeledExample::new(*t, "Travel")))
        .collect()
}

fn setup_test_categorizer() -> Categorizer {
    Categorizer::train(food_travel_corpus()).expect("Failed to train categorizer")
}

fn sample_texts() -> Vec<&'static str> {
    vec![
        "swiggy order biryani",
        "Uber to airport 800",
        "",
        "completely unknown words",
        "12345 !!!",
        "metro restaurant",
        "FLIGHT booking",
    ]
}

#[test]
fn test_food_scenario() {
    let categorizer = setup_test_categorizer();
    let prediction = categorizer.predict("swiggy order biryani");
    assert_eq!(prediction.category, "Food");
    assert!(prediction.confidence > 50.0, "confidence was {}", prediction.confidence);
}

#[test]
fn test_travel_scenario() {
    let categorizer = setup_test_categorizer();
    let prediction = categorizer.predict("Uber ride to metro station");
    assert_eq!(prediction.category, "Travel");
    assert!(prediction.confidence > 50.0);
}

#[test]
fn test_probabilities_sum_to_one() {
    let categorizer = setup_test_categorizer();
    for text in sample_texts() {
        let total: f64 = categorizer.scores(text).values().sum();
        assert!((total - 1.0).abs() < 1e-6, "sum was {} for {:?}", total, text);
    }
}

#[test]
fn test_ranked_ordering() {
    let categorizer = setup_test_categorizer();
    for text in sample_texts() {
        let prediction = categorizer.predict(text);
        assert!(prediction.ranked.len() <= TOP_K);
        assert!(prediction.ranked.len() <= categorizer.info().num_classes);
        assert_eq!(prediction.category, prediction.ranked[0].category);
        for pair in prediction.ranked.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
    }
}

#[test]
fn test_predict_is_idempotent() {
    let categorizer = setup_test_categorizer();
    for text in sample_texts() {
        assert_eq!(categorizer.predict(text), categorizer.predict(text));
    }
}

#[test]
fn test_empty_text_uses_prior() {
    let categorizer = setup_test_categorizer();
    let prediction = categorizer.predict("");
    assert_eq!(categorizer.count_known_terms(""), 0);
    // Balanced classes: the prior is close to uniform
    assert!((prediction.confidence - 50.0).abs() < 10.0, "confidence was {}", prediction.confidence);
    assert_eq!(prediction, categorizer.predict("9999 ###"));
}

#[test]
fn test_batch_preserves_order() {
    let categorizer = setup_test_categorizer();
    let inputs = [
        "Swiggy order",
        "Uber ride",
        "",
        "Flight booking",
        "Restaurant bill",
    ];
    let results = categorizer.predict_batch(&inputs);
    assert_eq!(results.len(), 5);
    for (input, result) in inputs.iter().zip(&results) {
        assert_eq!(result, &categorizer.predict(input));
    }
    assert_eq!(results[0].category, "Food");
    assert_eq!(results[1].category, "Travel");
    assert_eq!(results[3].category, "Travel");
    assert_eq!(results[4].category, "Food");
}

#[test]
fn test_empty_batch() {
    let categorizer = setup_test_categorizer();
    let empty: [&str; 0] = [];
    assert!(categorizer.predict_batch(&empty).is_empty());
}

#[test]
fn test_save_load_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let categorizer = setup_test_categorizer();
    let restored = Categorizer::load(&categorizer.save()?)?;
    assert_eq!(restored.info(), categorizer.info());
    for text in sample_texts() {
        assert_eq!(restored.predict(text), categorizer.predict(text));
        assert_eq!(restored.scores(text), categorizer.scores(text));
    }
    Ok(())
}

#[test]
fn test_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.json");
    let categorizer = setup_test_categorizer();
    categorizer.save_to_file(&path)?;

    let restored = Categorizer::load_from_file(&path)?;
    for text in sample_texts() {
        assert_eq!(restored.predict(text), categorizer.predict(text));
    }
    Ok(())
}

#[test]
fn test_normalize_idempotent() {
    let inputs = [
        "Swiggy order biryani 450",
        "McDonald's 250",
        "  tabs\tand\nnewlines ",
        "₹1,299.00 — Amazon!!",
        "",
    ];
    for s in inputs {
        assert_eq!(normalize(&normalize(s)), normalize(s));
    }
}

#[test]
fn test_thread_safety() {
    let categorizer = Arc::new(setup_test_categorizer());
    let expected = categorizer.predict("swiggy order");
    let mut handles = vec![];

    for _ in 0..4 {
        let categorizer = Arc::clone(&categorizer);
        let expected = expected.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                assert_eq!(categorizer.predict("swiggy order"), expected);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_labels_are_sorted() {
    let categorizer = Categorizer::train(vec![
        ("Netflix", "Entertainment"),
        ("Uber", "Travel"),
        ("Swiggy", "Food"),
    ])
    .unwrap();
    assert_eq!(
        categorizer.info().class_labels,
        vec!["Entertainment", "Food", "Travel"]
    );
}
