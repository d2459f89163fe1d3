use sentcomp::{DictionarySet, PipelineConfig, SequenceEncoder};
use sentcomp::encoding::{compressed_text, decode_predictions, InferenceInput, LabelFallbackStats, ParsedSentence, DEFAULT_KEEP_THRESHOLD};
use std::fs;
use std::path::PathBuf;
use anyhow::{Result, anyhow};
use clap::Parser;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "sentence_encoder")]
#[command(about = "Encode a parsed sentence with persisted dictionaries and decode keep probabilities")]
#[command(version)]
struct Args {
    /// Directory holding the persisted vocabulary and dictionaries
    #[arg(short, long, default_value = "./assets")]
    assets: PathBuf,

    /// Parser output for one sentence: {"tokens": [...], "tags": [...], "dependencies": [[label, head, dependent], ...]}
    #[arg(short, long)]
    input: PathBuf,

    /// Per-position keep probabilities from the model (JSON array)
    #[arg(short, long)]
    probabilities: Option<PathBuf>,

    /// Keep threshold
    #[arg(short, long, default_value_t = DEFAULT_KEEP_THRESHOLD)]
    threshold: f32,

    /// Pipeline configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::init();
    }

    let config = PipelineConfig::load_or_default(args.config.as_deref())?;
    let dictionaries = DictionarySet::load(&args.assets)?;
    let encoder = SequenceEncoder::new(&dictionaries, &config);

    let parsed: ParsedSentence = serde_json::from_str(&fs::read_to_string(&args.input)?)
        .map_err(|e| anyhow!("Invalid parser output in {}: {}", args.input.display(), e))?;
    let input = InferenceInput::from_parsed(&parsed, &config)?;

    let mut stats = LabelFallbackStats::default();
    let encoded = input.encode(&encoder, &mut stats)?;

    let output = match &args.probabilities {
        Some(path) => {
            let probabilities: Vec<f32> = serde_json::from_str(&fs::read_to_string(path)?)?;
            let decisions = decode_predictions(&input, &encoded, &probabilities, &dictionaries, args.threshold)?;
            json!({
                "encoded": encoded,
                "decisions": decisions,
                "compressed": compressed_text(&decisions),
                "label_fallbacks": stats,
            })
        }
        None => json!({
            "encoded": encoded,
            "label_fallbacks": stats,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
