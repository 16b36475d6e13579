//! School Merger CLI
//!
//! Command-line tool for collapsing duplicate school rows in spreadsheet
//! exports: one row per school number, financial columns summed.

use chrono::Local;
use clap::{Parser, Subcommand};
use schoolmerge_core::{merge, parse_csv, MergeConfig, Table};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schoolmerge")]
#[command(about = "Merge duplicate school rows in spreadsheet exports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge duplicate rows and write the deduplicated table
    Merge {
        /// Input file (CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (default: merged_<name>_<timestamp> beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Path to a merge configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Grouping column name (overrides config)
        #[arg(short, long)]
        key: Option<String>,

        /// Columns to aggregate by sum (overrides config; repeatable)
        #[arg(long)]
        sum: Vec<String>,

        /// Columns to aggregate by text union (overrides config; repeatable)
        #[arg(long)]
        text: Vec<String>,

        /// Separator for text unions (overrides config)
        #[arg(long)]
        delimiter: Option<String>,

        /// Treat non-numeric cells in sum columns as zero instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Parse a file and display a preview
    Inspect {
        /// Path to the file
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Write a default merge configuration template
    CreateConfig {
        /// Output path for the configuration file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> schoolmerge_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            input,
            output,
            format,
            config,
            key,
            sum,
            text,
            delimiter,
            lenient,
        } => cmd_merge(
            &input, output, &format, config, key, sum, text, delimiter, lenient,
        ),
        Commands::Inspect { file, limit } => cmd_inspect(&file, limit),
        Commands::CreateConfig { output } => cmd_create_config(&output),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_merge(
    input: &PathBuf,
    output: Option<PathBuf>,
    format: &str,
    config_path: Option<PathBuf>,
    key: Option<String>,
    sum: Vec<String>,
    text: Vec<String>,
    delimiter: Option<String>,
    lenient: bool,
) -> schoolmerge_core::Result<()> {
    let mut config = match config_path {
        Some(path) => MergeConfig::load(path)?,
        None => MergeConfig::default(),
    };

    // Command-line overrides beat the config file
    if let Some(key) = key {
        config.key_column = key;
    }
    if !sum.is_empty() {
        config.sum_columns = sum;
    }
    if !text.is_empty() {
        config.text_columns = text;
    }
    if let Some(delimiter) = delimiter {
        config.delimiter = delimiter;
    }
    if lenient {
        config.lenient = true;
    }

    let table = parse_csv(input)?;
    table.require_column(&config.key_column)?;

    let merged = merge(&table, &config)?;

    let extension = match format.to_lowercase().as_str() {
        "json" => "json",
        _ => "csv",
    };
    let output = output.unwrap_or_else(|| timestamped_output(input, extension));

    let file = File::create(&output)?;
    let mut writer = BufWriter::new(file);

    match format.to_lowercase().as_str() {
        "csv" => write_csv(&mut writer, &merged)?,
        "json" => {
            let json = serde_json::to_string_pretty(&merged).map_err(schoolmerge_core::Error::Json)?;
            writeln!(writer, "{}", json)?;
        }
        _ => {
            eprintln!("Unknown format: {}. Supported formats: csv, json", format);
            std::process::exit(1);
        }
    }

    println!(
        "Processed {} rows into {} merged rows",
        table.row_count(),
        merged.row_count()
    );
    println!("Wrote {}", output.display());

    Ok(())
}

fn cmd_inspect(file: &PathBuf, limit: usize) -> schoolmerge_core::Result<()> {
    let table = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    // Print header
    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.cells.iter().map(|c| c.to_string_value()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }

    Ok(())
}

fn cmd_create_config(output: &PathBuf) -> schoolmerge_core::Result<()> {
    let config = MergeConfig::default();
    config.save(output)?;

    println!("Created configuration file: {}", output.display());
    println!("Key column: {}", config.key_column);
    println!("Sum columns: {}", config.sum_columns.len());
    println!();
    println!("Edit the file to adjust column roles, then run:");
    println!(
        "  schoolmerge merge --input <file> --config {}",
        output.display()
    );

    Ok(())
}

/// Build a timestamp-qualified output path next to the input file
fn timestamped_output(input: &PathBuf, extension: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = format!("merged_{}_{}.{}", stem, timestamp, extension);

    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

fn write_csv<W: Write>(writer: &mut W, table: &Table) -> schoolmerge_core::Result<()> {
    // Write header
    let header: Vec<String> = table.columns.iter().map(|c| escape_csv(&c.name)).collect();
    writeln!(writer, "{}", header.join(","))?;

    // Write rows
    for row in &table.rows {
        let values: Vec<String> = row
            .cells
            .iter()
            .map(|c| escape_csv(&c.to_string_value()))
            .collect();
        writeln!(writer, "{}", values.join(","))?;
    }

    Ok(())
}

/// Escape a value for CSV output
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
