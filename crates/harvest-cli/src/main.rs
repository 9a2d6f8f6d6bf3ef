//! gridharvest CLI
//!
//! Works over payload dumps: `.json` files holding either a captured
//! network event (`{url, method, body, looksTabular}`) or a bare response
//! body. Scans them, lists table candidates, assembles the best table, and
//! exports CSV/JSON.

use chrono::Utc;
use clap::{Parser, Subcommand};
use harvest_core::serialize::{serialize, OutputFormat};
use harvest_core::{
    assemble, find_candidates, suggest_filename, CaptureRecord, Error, RowRange, Table,
};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "harvest-cli")]
#[command(about = "Grid capture inspection and export", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directories for payload dumps and summarize them
    Scan {
        /// Files or directories holding payload dumps
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },

    /// List every table candidate found in the dumps
    Candidates {
        /// Files or directories holding payload dumps
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,
    },

    /// Assemble the best table and preview it
    Assemble {
        /// Files or directories holding payload dumps
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Assemble and write the table to a file or stdout
    Export {
        /// Files or directories holding payload dumps
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file, or a directory to auto-name into; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Row selection: N-M (1-indexed, inclusive) or a single row N
        #[arg(long)]
        rows: Option<String>,

        /// Metadata entries (key=value) emitted as a search-parameters block
        #[arg(short, long)]
        meta: Vec<String>,

        /// Label used when auto-naming the output file
        #[arg(long, default_value = "export")]
        label: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> harvest_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { root } => cmd_scan(&root),
        Commands::Candidates { root } => cmd_candidates(&root),
        Commands::Assemble { root, limit } => cmd_assemble(&root, limit),
        Commands::Export {
            root,
            format,
            output,
            rows,
            meta,
            label,
        } => cmd_export(&root, &format, output.as_deref(), rows.as_deref(), &meta, &label),
    }
}

/// A payload dump as written by the interception adapter
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadDump {
    url: String,
    #[serde(default = "default_method")]
    method: String,
    body: Value,
    #[serde(default)]
    looks_tabular: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Collect `.json` files under the given roots, in walk order
fn collect_dump_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path.to_path_buf());
            }
        }
    }
    files
}

/// Read one dump file as a capture record
///
/// A file holding a full capture event keeps its url/method/flag; a bare
/// response body is wrapped with the file path standing in for the URL.
fn load_dump(path: &Path) -> harvest_core::Result<CaptureRecord> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Ok(dump) = serde_json::from_str::<PayloadDump>(&content) {
        return Ok(CaptureRecord::new(
            dump.url,
            dump.method,
            dump.body,
            dump.looks_tabular,
        ));
    }

    let body: Value = serde_json::from_str(&content)?;
    Ok(CaptureRecord::new(
        path.display().to_string(),
        "GET",
        body,
        false,
    ))
}

fn load_dumps(roots: &[PathBuf]) -> harvest_core::Result<Vec<CaptureRecord>> {
    collect_dump_files(roots)
        .iter()
        .map(|p| load_dump(p))
        .collect()
}

fn cmd_scan(roots: &[PathBuf]) -> harvest_core::Result<()> {
    let files = collect_dump_files(roots);
    println!("Scanned {} root(s), found {} dump file(s)", roots.len(), files.len());
    println!();

    let mut with_candidates = 0;
    for path in &files {
        let record = load_dump(path)?;
        let candidates = find_candidates(&record.body);
        if !candidates.is_empty() {
            with_candidates += 1;
        }
        println!(
            "  {} [{}] {} candidate(s)",
            path.display(),
            if record.looks_tabular { "tabular" } else { "other" },
            candidates.len()
        );
    }

    println!();
    println!("{} of {} dumps contain table candidates", with_candidates, files.len());
    Ok(())
}

fn cmd_candidates(roots: &[PathBuf]) -> harvest_core::Result<()> {
    for path in collect_dump_files(roots) {
        let record = load_dump(&path)?;
        let candidates = find_candidates(&record.body);

        println!("{} ({})", path.display(), record.url);
        if candidates.is_empty() {
            println!("  no candidates");
        }
        for (i, c) in candidates.iter().enumerate() {
            println!(
                "  #{}: {} rows, key overlap {:.0}%",
                i + 1,
                c.length,
                c.key_overlap * 100.0
            );
        }
        println!();
    }
    Ok(())
}

fn cmd_assemble(roots: &[PathBuf], limit: Option<usize>) -> harvest_core::Result<()> {
    let records = load_dumps(roots)?;
    let table = assemble(&records)?;

    println!("Assembled {} columns x {} rows", table.column_count(), table.row_count());
    println!();
    print_table(&table, limit.unwrap_or(10));
    Ok(())
}

fn print_table(table: &Table, row_limit: usize) {
    println!("{}", table.headers.join("\t"));
    println!("{}", "-".repeat(table.headers.len() * 12));
    for row in table.rows.iter().take(row_limit) {
        println!("{}", row.join("\t"));
    }
    if table.row_count() > row_limit {
        println!("... ({} more rows)", table.row_count() - row_limit);
    }
}

fn cmd_export(
    roots: &[PathBuf],
    format: &str,
    output: Option<&Path>,
    rows: Option<&str>,
    meta: &[String],
    label: &str,
) -> harvest_core::Result<()> {
    let format = match format.to_lowercase().as_str() {
        "csv" => OutputFormat::Csv,
        "json" => OutputFormat::Json,
        _ => {
            eprintln!("Unknown format: {}. Supported formats: csv, json", format);
            std::process::exit(1);
        }
    };

    let metadata = parse_metadata(meta);

    let records = load_dumps(roots)?;
    let table = assemble(&records)?;

    let range = RowRange::parse(rows.unwrap_or_default())?;
    if let Some(r) = &range {
        r.validate(table.row_count())?;
    }

    let content = serialize(&table, format, range, metadata.as_deref())?;

    match output {
        None => println!("{}", content),
        Some(path) => {
            let path = resolve_output_path(path, label, format);
            fs::write(&path, &content).map_err(|e| Error::SinkFailure {
                path: path.clone(),
                source: e,
            })?;
            println!("Exported {} rows to {}", table.row_count(), path.display());
        }
    }

    Ok(())
}

fn parse_metadata(entries: &[String]) -> Option<Vec<(String, String)>> {
    if entries.is_empty() {
        return None;
    }
    let mut parsed = Vec::new();
    for entry in entries {
        match entry.split_once('=') {
            Some((key, value)) => parsed.push((key.to_string(), value.to_string())),
            None => {
                eprintln!("Invalid metadata entry '{}'; expected key=value", entry);
                std::process::exit(1);
            }
        }
    }
    Some(parsed)
}

/// A directory output gets a generated filename; a file path is used as-is
fn resolve_output_path(output: &Path, label: &str, format: OutputFormat) -> PathBuf {
    if output.is_dir() {
        output.join(suggest_filename(label, format, Utc::now().date_naive()))
    } else {
        output.to_path_buf()
    }
}
