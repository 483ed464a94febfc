use clap::{Parser, Subcommand};
use imgspec_compiler::batch::{self, BatchConfig, BatchResults};
use imgspec_compiler::config::{runtime, CompilerDefaults, LoggingPreferences};
use imgspec_compiler::utils::format_error;
use imgspec_compiler::{compile_clause, logging, CompileError, ImageCheckSpec};
use std::path::{Path, PathBuf};
use std::process;

/// Image check clause compiler.
#[derive(Parser)]
#[command(name = "imgspec", version, about = "Compile image verification clauses")]
struct Cli {
    /// Directory relative `file` paths are resolved against
    #[arg(long, global = true)]
    context: Option<String>,

    /// TOML file with an [image_spec] table of compiler defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print compiled specs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log to stderr at this level (error, warn, info, debug)
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<runtime::LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a single clause
    Compile {
        /// Clause text, e.g. "file: shot.png, tolerance: 5, stretch"
        clause: String,
    },

    /// Compile a file with one clause per line
    Batch {
        /// Clause file; blank lines and lines starting with '#' are skipped
        file: PathBuf,
        /// Worker threads (1 compiles sequentially)
        #[arg(long)]
        threads: Option<usize>,
        /// Stop at the first failing clause
        #[arg(long)]
        fail_fast: bool,
    },
}

fn parse_level(text: &str) -> Result<runtime::LogLevel, String> {
    runtime::parse_log_level(text).ok_or_else(|| format!("unknown log level '{}'", text))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.log_level)?;

    let defaults = match &cli.config {
        Some(path) => CompilerDefaults::load_from_file(path)?,
        None => CompilerDefaults::from_env(),
    };

    let succeeded = match &cli.command {
        Commands::Compile { clause } => run_compile(&cli, clause, &defaults)?,
        Commands::Batch {
            file,
            threads,
            fail_fast,
        } => {
            let mut config = BatchConfig {
                fail_fast: *fail_fast,
                context_path: cli.context.clone(),
                ..BatchConfig::default()
            };
            if let Some(threads) = threads {
                config.max_threads = *threads;
            }
            run_batch(&cli, file, &defaults, &config)?
        }
    };

    if !succeeded {
        process::exit(1);
    }
    Ok(())
}

fn init_logging(level: Option<runtime::LogLevel>) -> Result<(), String> {
    let mut preferences = LoggingPreferences::default();
    if let Some(level) = level {
        preferences.min_log_level = level;
        preferences.enable_console_logging = true;
    }
    logging::config::init_runtime_preferences(preferences)?;
    logging::init_global_logging()
}

fn run_compile(
    cli: &Cli,
    clause: &str,
    defaults: &CompilerDefaults,
) -> Result<bool, Box<dyn std::error::Error>> {
    match logging::with_clause_context("<command line>", 0, || {
        compile_clause(clause, cli.context.as_deref(), defaults)
    }) {
        Ok(spec) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&spec)?);
            } else {
                print!("{}", render_spec(&spec));
            }
            Ok(true)
        }
        Err(error) => {
            eprint!("{}", render_compile_error(clause, &error));
            Ok(false)
        }
    }
}

fn run_batch(
    cli: &Cli,
    file: &Path,
    defaults: &CompilerDefaults,
    config: &BatchConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let clauses = batch::read_clause_file(file)?;
    let results = batch::compile_batch(&clauses, defaults, config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&batch_json(&results))?);
    } else {
        for outcome in &results.outcomes {
            match &outcome.result {
                Ok(spec) => println!("{}: ok ({} images)", outcome.label, spec.image_paths.len()),
                Err(error) => println!("{}: error[{}]: {}", outcome.label, error.error_code(), error),
            }
        }
        println!("\n{}", results.summary());
    }

    Ok(results.failure_count() == 0)
}

fn batch_json(results: &BatchResults) -> serde_json::Value {
    let outcomes: Vec<serde_json::Value> = results
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(spec) => serde_json::json!({ "label": outcome.label, "spec": spec }),
            Err(error) => serde_json::json!({
                "label": outcome.label,
                "error": { "code": error.error_code().as_str(), "message": error.to_string() },
            }),
        })
        .collect();

    serde_json::json!({
        "outcomes": outcomes,
        "successful": results.success_count(),
        "failed": results.failure_count(),
        "skipped": results.skipped,
    })
}

fn render_spec(spec: &ImageCheckSpec) -> String {
    let mut out = String::new();
    for path in &spec.image_paths {
        out.push_str(&format!("image: {}\n", path));
    }
    out.push_str(&format!("error: {}\n", spec.error_rate));
    out.push_str(&format!("tolerance: {}\n", spec.tolerance));
    if let Some(offset) = spec.analyze_offset {
        out.push_str(&format!("analyze-offset: {}\n", offset));
    }
    if let Some(area) = spec.selected_area {
        out.push_str(&format!("area: {}\n", area));
    }
    if spec.stretch {
        out.push_str("stretch\n");
    }
    if spec.crop_if_outside {
        out.push_str("crop-if-outside\n");
    }

    let chains = [
        ("original filters", &spec.original_filters),
        ("sample filters", &spec.sample_filters),
        ("map filters", &spec.map_filters),
    ];
    for (name, filters) in chains {
        if !filters.is_empty() {
            let list: Vec<String> = filters.iter().map(ToString::to_string).collect();
            out.push_str(&format!("{}: {}\n", name, list.join(", ")));
        }
    }
    out
}

/// Splitter errors point into the clause itself, so they get a caret diagnostic
fn render_compile_error(clause: &str, error: &CompileError) -> String {
    let message = format!("[{}] {}", error.error_code(), error);
    match (error, error.span()) {
        (CompileError::Split(_), Some(span)) => format_error(clause, &span, &message),
        _ => format!("error: {}\n", message),
    }
}
