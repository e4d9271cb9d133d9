use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use expense_categorizer::{
    dataset, evaluate, train_test_split, ArtifactStore, Categorizer, Prediction, TrainingConfig,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ModelArgs {
    /// Read or write the model at this path instead of the artifact store
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Artifact name inside the store
    #[arg(short, long, default_value = "default")]
    name: String,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model and save it
    Train {
        /// CSV file with `transaction,category` columns (defaults to the built-in sample)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Fraction of each category held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        /// Seed for the train/test split
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Maximum vocabulary size
        #[arg(long, default_value_t = 100)]
        max_features: usize,

        /// Maximum optimizer iterations
        #[arg(long, default_value_t = 1000)]
        max_iter: usize,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Categorize one or more transaction descriptions
    Predict {
        #[arg(required = true)]
        texts: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Categorize descriptions read line by line from stdin
    Interactive {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Show a summary of a saved model
    Info {
        #[command(flatten)]
        model: ModelArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            data,
            test_size,
            seed,
            max_features,
            max_iter,
            model,
        } => {
            let config = TrainingConfig::default()
                .with_max_features(max_features)
                .with_max_iterations(max_iter);
            train(data, test_size, seed, config, &model)
        }
        Command::Predict { texts, json, model } => {
            let categorizer = load_model(&model)?;
            let predictions = categorizer.predict_batch(texts.as_slice());
            if json {
                println!("{}", serde_json::to_string_pretty(&predictions)?);
            } else {
                for (text, prediction) in texts.iter().zip(&predictions) {
                    print_prediction(text, prediction);
                }
            }
            Ok(())
        }
        Command::Interactive { model } => interactive(&load_model(&model)?),
        Command::Info { model } => {
            let info = load_model(&model)?.info();
            println!("Classes ({}): {}", info.num_classes, info.class_labels.join(", "));
            println!("Vocabulary size: {}", info.vocabulary_size);
            Ok(())
        }
    }
}

fn train(
    data: Option<PathBuf>,
    test_size: f64,
    seed: u64,
    config: TrainingConfig,
    model: &ModelArgs,
) -> Result<()> {
    let examples = match &data {
        Some(path) => dataset::load_csv(path)?,
        None => dataset::sample_dataset(),
    };
    info!("Loaded {} labeled examples", examples.len());

    let (train_set, test_set) = train_test_split(&examples, test_size, seed)?;
    println!("Training samples: {}", train_set.len());
    println!("Testing samples: {}", test_set.len());

    let start = Instant::now();
    let categorizer = Categorizer::train_with_config(train_set, config)
        .context("Training failed")?;
    info!("Training took {:.2?}", start.elapsed());

    if !test_set.is_empty() {
        let report = evaluate(&categorizer, &test_set);
        println!("\nModel accuracy: {:.2}%\n", report.accuracy * 100.0);
        println!("{}", report);
    }

    let path = match &model.model {
        Some(path) => {
            categorizer.save_to_file(path)?;
            path.clone()
        }
        None => ArtifactStore::new_default()?.save(&model.name, &categorizer)?,
    };
    println!("\nModel saved to {}", path.display());
    Ok(())
}

fn load_model(model: &ModelArgs) -> Result<Categorizer> {
    let categorizer = match &model.model {
        Some(path) => Categorizer::load_from_file(path),
        None => ArtifactStore::new_default()?.load(&model.name),
    };
    categorizer.context("Failed to load model; run `expense-categorizer train` first")
}

fn print_prediction(text: &str, prediction: &Prediction) {
    println!("\nTransaction: {}", text);
    println!("  Category: {}", prediction.category);
    println!("  Confidence: {:.2}%", prediction.confidence);
    println!("  Top predictions:");
    for (i, ranked) in prediction.ranked.iter().enumerate() {
        println!("    {}. {}: {:.2}%", i + 1, ranked.category, ranked.probability * 100.0);
    }
}

fn interactive(categorizer: &Categorizer) -> Result<()> {
    println!("Enter transaction descriptions ('quit' to exit)");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if matches!(text.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        if text.is_empty() {
            continue;
        }
        print_prediction(text, &categorizer.predict(text));
    }
    Ok(())
}
