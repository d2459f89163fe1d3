use sentcomp::{CorpusParser, PipelineConfig};
use sentcomp::encoding::{attach_targets, prepare_corpus, write_examples, CorpusFiles, LabelFallbackStats, TokenizedCorpus};
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Result, Context};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "tensor_builder")]
#[command(about = "Build dictionaries, encoded sequences and keep/delete targets from a materialized corpus")]
#[command(version)]
struct Args {
    /// Directory holding words.txt, tags.txt and labels.txt
    #[arg(short, long, default_value = "./corpus")]
    corpus_dir: PathBuf,

    /// Original corpus files, in the order they were materialized
    #[arg(short, long, required = true, num_args = 1..)]
    records: Vec<PathBuf>,

    /// Directory for the persisted vocabulary and dictionaries
    #[arg(short, long, default_value = "./assets")]
    assets: PathBuf,

    /// Output file for training examples (JSON lines)
    #[arg(short, long, default_value = "./examples.jsonl")]
    output: PathBuf,

    /// Pipeline configuration file (optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print_fallbacks(stats: &LabelFallbackStats) {
    println!("\n=== Dependency Label Fallbacks ===");
    println!("Normalized: {}", stats.normalized_count());
    for (label, count) in &stats.normalized {
        println!("  {:<12} {}", label, count);
    }
    println!("Defaulted: {}", stats.defaulted_count());
    for (label, count) in &stats.defaulted {
        println!("  {:<12} {}", label, count);
    }
    for sample in stats.samples.iter().take(5) {
        println!(
            "  sentence {} position {}: '{}' -> '{}'",
            sample.sentence, sample.position, sample.label, sample.resolved_to
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let start_time = Instant::now();
    let config = PipelineConfig::load_or_default(args.config.as_deref())?;
    let files = CorpusFiles::in_dir(&args.corpus_dir);

    let corpus = TokenizedCorpus::read(&files, &config)
        .with_context(|| format!("Failed to read flat corpus from {}", args.corpus_dir.display()))?;
    info!("Read {} sentences", corpus.len());

    let prepared = prepare_corpus(&corpus, &config).context("Corpus preparation aborted")?;
    prepared.dictionaries.save(&args.assets)?;

    let records = CorpusParser::new().parse_files(&args.records)?;
    let examples = attach_targets(&prepared.sentences, &records).context("Target alignment aborted")?;
    let written = write_examples(&args.output, &examples)?;

    println!("\n=== Preparation Statistics ===");
    println!("Sentences: {}", corpus.len());
    println!("Word vocabulary: {} (out-of-vocabulary id {})", prepared.dictionaries.word_vocab.len(), prepared.dictionaries.oov_id());
    println!("Tags: {}", prepared.dictionaries.tags.len());
    println!("Dependency labels: {}", prepared.dictionaries.labels.len());
    println!("Examples written: {} -> {}", written, args.output.display());
    println!("Dictionaries: {}", args.assets.display());
    println!("Total time: {:.2?}", start_time.elapsed());

    if !prepared.fallbacks.is_empty() {
        print_fallbacks(&prepared.fallbacks);
    }
    Ok(())
}
