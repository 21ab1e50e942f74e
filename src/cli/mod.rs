//! Command-line interface
//!
//! `serve` (the default) trains at startup and runs the HTTP server;
//! `train` runs the same load/select/train pipeline once and prints a report.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::data::{DatasetLoader, LoaderConfig};
use crate::server::{run_server, ServerConfig};
use crate::service::PredictionContext;
use crate::training::{ModelTrainer, TrainerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "exoplanet-detector")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Exoplanet disposition classifier with an HTTP prediction API")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train on the dataset and start the web server
    Serve {
        /// Server port
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Server host
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Local CSV used when the archive is unreachable
        #[arg(short, long, env = "DATASET_BACKUP")]
        backup: Option<PathBuf>,
    },

    /// Train once and print the evaluation report
    Train {
        /// Local CSV used when the archive is unreachable
        #[arg(short, long, env = "DATASET_BACKUP")]
        backup: Option<PathBuf>,

        /// Skip the archive and train from the backup file only
        #[arg(long)]
        offline: bool,

        /// Maximum tree depth
        #[arg(long, default_value = "5")]
        max_depth: usize,
    },
}

fn loader_for(backup: Option<PathBuf>) -> DatasetLoader {
    let config = match backup {
        Some(path) => LoaderConfig::default().with_backup_path(path),
        None => LoaderConfig::default(),
    };
    DatasetLoader::new(config)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_train(backup: Option<PathBuf>, offline: bool, max_depth: usize) -> anyhow::Result<()> {
    section("Train");

    let loader = loader_for(backup);
    step_run(if offline { "Loading backup dataset" } else { "Loading dataset" });
    let start = Instant::now();
    let raw = if offline { loader.load_backup()? } else { loader.load().await? };
    step_done(&format!("{} rows × {} cols in {:?}", raw.height(), raw.width(), start.elapsed()));

    let trainer = ModelTrainer::new(TrainerConfig { max_depth, ..TrainerConfig::default() });
    step_run("Training decision tree");
    let start = Instant::now();
    let (context, report) = PredictionContext::from_raw_table(raw, &trainer)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!("  {:<16} {}", muted("Features"), context.features().to_string().cyan());
    println!("  {:<16} {}", muted("Accuracy"), format!("{:.4}", report.accuracy).white().bold());
    println!("  {:<16} {}", muted("Train / test"), format!("{} / {}", report.n_train, report.n_test).white());
    println!("  {:<16} {}", muted("Depth"), format!("{} ({} leaves)", report.depth, report.n_leaves).white());
    println!("  {:<16} {}", muted("Labels"), report.classes.join(", ").white());
    println!();

    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16, backup: Option<PathBuf>) -> anyhow::Result<()> {
    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Exoplanet Detector".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Web UI ", &format!("http://{}:{}", host, port)));
    line_box(&kv("Predict", &format!("http://{}:{}/predict", host, port)));
    line_box(&kv("Health ", &format!("http://{}:{}/health", host, port)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig::default().with_host(host).with_port(port);
    run_server(config, loader_for(backup), ModelTrainer::default()).await
}
