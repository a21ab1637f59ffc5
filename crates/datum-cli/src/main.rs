//! datum CLI - evaluate scene documents and inspect references.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datum::scene::SceneDoc;
use datum::{anchor_names, history_summary};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datum")]
#[command(about = "Declarative part positioning engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a scene document and print final part positions
    Run {
        /// Path to a scene .json file
        file: PathBuf,
        /// Also print each part's transform history
        #[arg(short = 'H', long)]
        history: bool,
    },
    /// Resolve one reference against a scene document
    Resolve {
        /// Path to a scene .json file
        file: PathBuf,
        /// Reference to resolve: a name, `part.anchor`, or inline JSON
        reference: String,
    },
    /// List the auto-generated per-part anchor names
    Anchors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, history } => run(&file, history),
        Commands::Resolve { file, reference } => resolve(&file, &reference),
        Commands::Anchors => {
            for name in anchor_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load(file: &PathBuf) -> Result<datum::Assembly<datum::AnalyticBackend>> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let doc = SceneDoc::from_json(&json).with_context(|| format!("parsing {}", file.display()))?;
    doc.build().context("evaluating scene")
}

fn run(file: &PathBuf, history: bool) -> Result<()> {
    let asm = load(file)?;
    for name in asm.part_names() {
        let part = asm
            .part(&name)
            .context("part disappeared from its own registry")?;
        let p = part.current_position;
        println!("{name}: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
        if history {
            print!("{}", history_summary(part));
        }
    }
    Ok(())
}

fn resolve(file: &PathBuf, reference: &str) -> Result<()> {
    let asm = load(file)?;

    // Bare names are the common case; anything starting with a JSON
    // bracket or brace is parsed as an inline spec.
    let spec: datum::RefSpec = if reference.starts_with(['{', '[']) {
        serde_json::from_str(reference).context("parsing inline reference")?
    } else {
        datum::RefSpec::named(reference)
    };

    let resolved = asm.resolve(&spec)?;
    let p = resolved.position;
    println!("kind: {}", resolved.kind);
    println!("position: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
    if let Some(d) = resolved.direction() {
        println!("direction: ({:.3}, {:.3}, {:.3})", d.x, d.y, d.z);
    }
    Ok(())
}
