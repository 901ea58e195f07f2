//! examgrid - render a spreadsheet exercise from lesson data

mod config;

use anyhow::{Context, Result, bail};
use config::Config;
use examgrid_core::Exercise;
use examgrid_core::storage::write_markdown;
use examgrid_engine::builtins::RANGE_BUILTINS;
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: examgrid [OPTIONS] LESSON.csv");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  LESSON.csv                Lesson rows (columns name,val1,c,d,e)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --set <CELL=INPUT>        Edit a cell before rendering (can be repeated)");
    eprintln!("  --formulas                Show formulas instead of computed values");
    eprintln!("  --decimals <N>            Decimal places for non-integer results");
    eprintln!("  -o, --output <FILE>       Export to markdown file instead of stdout");
    eprintln!("  --config <FILE>           Load settings from this TOML file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Functions (use as FUNC(A1:C5) inside a formula):");
    for builtin in RANGE_BUILTINS {
        eprintln!("  {:<24}  {}", builtin.sheet_name, builtin.description);
    }
}

struct Args {
    lesson: PathBuf,
    edits: Vec<(String, String)>,
    formula_view: bool,
    decimals: Option<usize>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut lesson: Option<PathBuf> = None;
    let mut edits = Vec::new();
    let mut formula_view = false;
    let mut decimals = None;
    let mut output = None;
    let mut config = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--set" => {
                let Some(edit) = iter.next() else {
                    bail!("--set requires CELL=INPUT");
                };
                let Some((cell, input)) = edit.split_once('=') else {
                    bail!("--set expects CELL=INPUT, got '{}'", edit);
                };
                edits.push((cell.to_string(), input.to_string()));
            }
            "--formulas" => formula_view = true,
            "--decimals" => {
                let Some(n) = iter.next() else {
                    bail!("--decimals requires a value");
                };
                decimals = Some(n.parse().with_context(|| format!("invalid --decimals '{}'", n))?);
            }
            "-o" | "--output" => {
                let Some(path) = iter.next() else {
                    bail!("--output requires a file path");
                };
                output = Some(PathBuf::from(path));
            }
            "--config" => {
                let Some(path) = iter.next() else {
                    bail!("--config requires a file path");
                };
                config = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if lesson.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                lesson = Some(PathBuf::from(other));
            }
        }
    }

    let Some(lesson) = lesson else {
        bail!("missing lesson file");
    };
    Ok(Some(Args {
        lesson,
        edits,
        formula_view,
        decimals,
        output,
        config,
    }))
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    let mut exercise = Exercise::from_lesson_file(&args.lesson)
        .with_context(|| format!("loading lesson {}", args.lesson.display()))?;
    exercise.formula_view = args.formula_view || config.display.formula_view;
    exercise.decimals = args.decimals.unwrap_or(config.display.decimals);

    for (cell, input) in &args.edits {
        exercise
            .set_cell_by_name(cell, input)
            .with_context(|| format!("editing {}", cell))?;
    }

    match args.output {
        Some(path) => {
            exercise.export_markdown(&path)?;
            println!("Exported to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_markdown(&mut stdout.lock(), &exercise)?;
        }
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let parsed = match parse_args(&args) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(parsed) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
