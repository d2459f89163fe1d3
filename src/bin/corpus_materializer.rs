use sentcomp::corpus::{self, FeatureSelection};
use sentcomp::data::{edge_order_irregularities, CorpusParser, CorpusRecord, TreeReader};
use sentcomp::encoding::{materialize_corpus, CorpusFiles};
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Result, anyhow, Context};
use clap::{Parser, ValueEnum};
use log::info;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "corpus_materializer")]
#[command(about = "Write flat word/tag/label/compression files from a sentence-compression corpus")]
#[command(version)]
struct Args {
    /// Corpus files (JSON, JSONL, or gzipped), processed in the given order
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output directory for words.txt, tags.txt, labels.txt and compressions.txt
    #[arg(short, long, default_value = "./corpus")]
    output_dir: PathBuf,

    /// Also write one interleaved file with the selected features
    #[arg(long)]
    combined: Option<PathBuf>,

    /// Features written to the combined file, in word/tag/label order
    #[arg(long, value_enum, default_values_t = [Feature::Word, Feature::Tag, Feature::Label])]
    features: Vec<Feature>,

    /// Report records whose edge order disagrees with word-id order
    #[arg(long)]
    check_order: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Feature {
    Word,
    Tag,
    Label,
}

fn selection(features: &[Feature]) -> FeatureSelection {
    FeatureSelection {
        word: features.contains(&Feature::Word),
        tag: features.contains(&Feature::Tag),
        label: features.contains(&Feature::Label),
    }
}

fn read_records(inputs: &[PathBuf], verbose: bool) -> Result<Vec<CorpusRecord>> {
    let parser = CorpusParser::new();
    let progress = if verbose {
        None
    } else {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    };

    let mut records = Vec::new();
    for path in inputs {
        if let Some(pb) = &progress {
            pb.set_message(format!("Reading: {}", path.display()));
        }
        let parsed = parser.parse_file(path)?;
        info!("{}: {} records", path.display(), parsed.len());
        records.extend(parsed);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Corpus read");
    }
    Ok(records)
}

fn write_combined(records: &[CorpusRecord], path: &Path, selection: FeatureSelection) -> Result<usize> {
    if selection.is_empty() {
        return Err(anyhow!("At least one feature must be selected for the combined file"));
    }
    corpus::truncate_outputs(&[path])?;
    let sentences = records
        .iter()
        .enumerate()
        .map(|(index, record)| TreeReader::new(index, record).segments())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(corpus::append_segments(path, sentences.iter().map(Vec::as_slice), selection)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if !args.output_dir.exists() {
        fs::create_dir_all(&args.output_dir)?;
        info!("Created output directory: {}", args.output_dir.display());
    }

    let records = read_records(&args.input, args.verbose)?;
    if records.is_empty() {
        return Err(anyhow!("No corpus records found in the given inputs"));
    }

    if args.check_order {
        let flagged = edge_order_irregularities(&records);
        println!("Edge order irregularities: {} of {} records", flagged.len(), records.len());
    }

    let files = CorpusFiles::in_dir(&args.output_dir);
    let written = materialize_corpus(&records, &files)
        .with_context(|| format!("Failed to materialize corpus into {}", args.output_dir.display()))?;

    if let Some(path) = &args.combined {
        let lines = write_combined(&records, path, selection(&args.features))?;
        info!("Wrote {} combined lines to {}", lines, path.display());
    }

    println!("\n=== Materialization Statistics ===");
    println!("Input files: {}", args.input.len());
    println!("Sentences written: {}", written);
    println!("Total segments: {}", records.iter().map(CorpusRecord::edge_count).sum::<usize>());
    println!("Output directory: {}", args.output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_selection() {
        assert_eq!(selection(&[Feature::Word]), FeatureSelection::WORDS);
        assert_eq!(selection(&[Feature::Label, Feature::Tag]), FeatureSelection { word: false, tag: true, label: true });
        assert!(selection(&[]).is_empty());
    }
}
