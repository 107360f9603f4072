//! Train command implementation.

use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Input text file(s); words are whitespace-separated ("-" for stdin)
    #[arg(short, long, num_args = 1.., required = true)]
    pub input: Vec<String>,

    /// Output directory for vocab.json and merges.txt
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size
    #[arg(long, default_value_t = 30_000)]
    pub vocab_size: usize,

    /// Minimum pair frequency required to commit a merge
    #[arg(long, default_value_t = 0)]
    pub min_frequency: u64,

    /// Special tokens given the first vocabulary IDs (repeatable)
    #[arg(long = "special-token")]
    pub special_tokens: Vec<String>,

    /// Cap on the initial character alphabet
    #[arg(long)]
    pub limit_alphabet: Option<usize>,

    /// Characters to force into the alphabet, as one string
    #[arg(long)]
    pub initial_alphabet: Option<String>,

    /// Prefix decorating a continuing subword (e.g. "##")
    #[arg(long)]
    pub continuing_subword_prefix: Option<String>,

    /// Suffix decorating an end-of-word subword (e.g. "</w>")
    #[arg(long)]
    pub end_of_word_suffix: Option<String>,

    /// Suppress the progress bar
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

use ahash::AHashMap;
use anyhow::{Context, Result as AnyhowResult};
use std::path::Path;
use subvoc_training::{BpeTrainer, ModelSaver, TrainerConfig};

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    let config = TrainerConfig {
        min_frequency: cmd.min_frequency,
        vocab_size: cmd.vocab_size,
        show_progress: !cmd.quiet,
        special_tokens: cmd.special_tokens.clone(),
        limit_alphabet: cmd.limit_alphabet,
        initial_alphabet: cmd
            .initial_alphabet
            .as_deref()
            .map(|s| s.chars().collect())
            .unwrap_or_default(),
        continuing_subword_prefix: cmd.continuing_subword_prefix.clone(),
        end_of_word_suffix: cmd.end_of_word_suffix.clone(),
    };
    config.validate()?;

    let mut trainer = BpeTrainer::new(config);

    // Count words across all inputs.
    let mut word_counts: AHashMap<String, u64> = AHashMap::new();
    for input in &cmd.input {
        let text = if input == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        } else {
            std::fs::read_to_string(input)
                .with_context(|| format!("failed to read input file {}", input))?
        };

        trainer.process_tokens(&mut word_counts, text.split_whitespace());
    }
    log::info!(
        "counted {} distinct words from {} input(s)",
        word_counts.len(),
        cmd.input.len()
    );

    let model = trainer.train(&word_counts)?;

    let output = Path::new(&cmd.output);
    ModelSaver::new(&model).save(output)?;

    println!(
        "Trained vocabulary of {} tokens ({} merges) -> {}",
        model.vocab.len(),
        model.merges.len(),
        output.display()
    );

    Ok(())
}
