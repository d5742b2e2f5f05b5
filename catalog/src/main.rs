use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use course_core::source::load_rows;
use course_core::{CorpusIndex, CourseRow, Query, RankingConfig, Recommender};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

mod clean;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Prepare and inspect the unified course catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Udemy,
    Coursera,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw provider export into the unified schema
    Clean {
        #[arg(long, value_enum)]
        provider: Provider,
        #[arg(long)]
        input: String,
        #[arg(long)]
        output: String,
    },
    /// Merge cleaned tables (files or directories of .csv) into one catalog
    Merge {
        #[arg(long, num_args = 1.., required = true)]
        input: Vec<String>,
        #[arg(long, default_value = "data/processed/unified_courses.csv")]
        output: String,
    },
    /// Print shape, columns, null counts and sample rows of a CSV table
    Inspect {
        #[arg(long)]
        input: String,
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Build the index and print recommendations for a query
    Query {
        #[arg(long, default_value = "data/processed/unified_courses.csv")]
        corpus: String,
        #[arg(long)]
        q: String,
        #[arg(long, default_value_t = 5)]
        top_n: usize,
        #[arg(long, default_value_t = 1.3)]
        boost_factor: f32,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { provider, input, output } => clean_file(provider, &input, &output),
        Commands::Merge { input, output } => merge(&input, &output),
        Commands::Inspect { input, rows } => inspect(&input, rows),
        Commands::Query { corpus, q, top_n, boost_factor } => query(&corpus, &q, top_n, boost_factor),
    }
}

fn clean_file(provider: Provider, input: &str, output: &str) -> Result<()> {
    let f = File::open(input)?;
    let rows = match provider {
        Provider::Udemy => clean::clean_udemy(f)?,
        Provider::Coursera => clean::clean_coursera(f)?,
    };
    write_rows(Path::new(output), &rows)?;
    tracing::info!(output, rows = rows.len(), "cleaned dataset saved");
    Ok(())
}

fn collect_csv_files(inputs: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        let p = Path::new(input);
        if p.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(p)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("csv"))
                .collect();
            found.sort();
            files.extend(found);
        } else if p.is_file() {
            files.push(p.to_path_buf());
        }
    }
    files
}

fn merge(inputs: &[String], output: &str) -> Result<()> {
    let files = collect_csv_files(inputs);
    if files.is_empty() { bail!("no input tables found"); }

    let mut merged: Vec<CourseRow> = Vec::new();
    for file in &files {
        let rows = load_rows(file)?;
        let name = file.display().to_string();
        clean::validate(&name, &rows)?;
        let dups = clean::count_duplicates(&rows)?;
        if dups > 0 {
            tracing::warn!(input = %name, dups, "dataset still has duplicates");
        }
        merged.extend(rows);
    }
    let merged = clean::dedup(merged)?;
    write_rows(Path::new(output), &merged)?;
    tracing::info!(output, inputs = files.len(), rows = merged.len(), "datasets merged");
    Ok(())
}

fn write_rows(path: &Path, rows: &[CourseRow]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut w = csv::Writer::from_path(path)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

fn inspect(input: &str, sample: usize) -> Result<()> {
    let mut rdr = csv::Reader::from_path(input)?;
    let headers = rdr.headers()?.clone();
    let mut nulls = vec![0usize; headers.len()];
    let mut head = Vec::new();
    let mut count = 0usize;
    for record in rdr.records() {
        let record = record?;
        for (i, field) in record.iter().enumerate().take(headers.len()) {
            if field.trim().is_empty() { nulls[i] += 1; }
        }
        if head.len() < sample { head.push(record); }
        count += 1;
    }

    println!("{input}: {count} rows x {} columns", headers.len());
    for (name, n) in headers.iter().zip(&nulls) {
        println!("  {name:<24} nulls={n}");
    }
    for record in head {
        println!("  {}", record.iter().collect::<Vec<_>>().join(" | "));
    }
    Ok(())
}

fn query(corpus: &str, q: &str, top_n: usize, boost_factor: f32) -> Result<()> {
    let rows = load_rows(Path::new(corpus))?;
    let index = CorpusIndex::build(rows)?;
    let recommender = Recommender::new(index, RankingConfig { boost_factor, top_n });
    println!("Top recommendations for: '{q}'");
    for hit in recommender.recommend(&Query::new(q, top_n)) {
        let course = hit.course_record;
        println!(
            "{} (Provider: {}, Similarity: {:.3})",
            course.title.as_deref().unwrap_or("Untitled"),
            course.provider.as_deref().unwrap_or("N/A"),
            hit.similarity_score
        );
    }
    Ok(())
}
