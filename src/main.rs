// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use renextract::app_config::{self, Config};
use renextract::app_controller::{Controller, ExpectedCounts};
use renextract::errors::AppError;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tell a translation file apart from technical script code
    Classify {
        /// Candidate .rpy file
        file: PathBuf,
    },

    /// Check that a file looks like a Ren'Py script before extraction
    Check {
        /// Script to check
        file: PathBuf,
    },

    /// Compare a translated working file with the number of extracted lines
    Validate {
        /// Working file, e.g. script_dialogue.txt (numbered continuations are included)
        file: PathBuf,

        /// Number of units extraction produced
        #[arg(short, long)]
        expected: usize,
    },

    /// Validate every working file before rebuilding a script
    Gate {
        /// File base of the source script (e.g. "script" for script.rpy)
        file_base: String,

        /// Extracted dialogue count
        #[arg(long, default_value_t = 0)]
        dialogue: usize,

        /// Extracted asterisk text count
        #[arg(long, default_value_t = 0)]
        asterix: usize,

        /// Extracted empty text count
        #[arg(long, default_value_t = 0)]
        empty: usize,

        /// Also check the duplicates file
        #[arg(long)]
        duplicates: bool,

        /// Temp-output root (defaults to the configured one)
        #[arg(long)]
        temp_root: Option<PathBuf>,
    },

    /// Repair quotes, guillemets, ellipses and percent signs in working files
    FixQuotes {
        /// Files to repair
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Report which scripts of a project have been reconstructed
    Progress {
        /// Project folder
        dir: PathBuf,
    },

    /// Mark a rebuilt script as reconstructed
    Stamp {
        /// Script to mark
        file: PathBuf,
    },

    /// Generate shell completions for renextract
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// RenExtract - validation tools for Ren'Py script translation
///
/// Checks working files produced by extraction before a translated
/// script is rebuilt.
#[derive(Parser, Debug)]
#[command(name = "renextract")]
#[command(version)]
#[command(about = "Validation tools for Ren'Py script translation")]
#[command(long_about = "RenExtract checks the text files extracted from Ren'Py scripts before a translated script is rebuilt.

EXAMPLES:
    renextract check game/script.rpy                     # Is this a Ren'Py script?
    renextract classify game/tl/french/script.rpy        # Translation or technical code?
    renextract validate script_dialogue.txt -e 120       # Line count matches extraction?
    renextract gate script --dialogue 120 --asterix 4    # All working files ready?
    renextract fix-quotes script_dialogue.txt            # Repair quotes before rebuilding
    renextract progress game/                            # Which scripts are done?
    renextract completions bash > renextract.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in renextract.json by default. You can specify a
    different file with --config. If the file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "renextract.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

fn print_messages(errors: &[String], warnings: &[String]) {
    for error in errors {
        println!("  error:   {}", error);
    }
    for warning in warnings {
        println!("  warning: {}", warning);
    }
}

fn main() -> Result<()> {
    // Info until the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "renextract", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    run(cli, config)
}

fn run(cli: CommandLineOptions, mut config: Config) -> Result<()> {
    if let Commands::Gate { duplicates: true, .. } = &cli.command {
        config.detect_duplicates = true;
    }
    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    match cli.command {
        Commands::Classify { file } => {
            let result = controller.classify(&file);
            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "{}: {} ({:.0}%) - {}",
                    file.display(),
                    result.file_type,
                    result.confidence,
                    result.reason
                );
            }
        }
        Commands::Check { file } => {
            let result = controller.check_script(&file);
            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "{}: {} ({:.1}%), patterns: {}",
                    file.display(),
                    if result.is_valid { "Ren'Py script" } else { "rejected" },
                    result.confidence,
                    result.patterns_found.join(", ")
                );
                print_messages(&result.errors, &result.warnings);
            }
            if !result.is_valid {
                return Err(AppError::Validation(format!("{} is not a valid Ren'Py script", file.display())).into());
            }
        }
        Commands::Validate { file, expected } => {
            let report = controller.validate_file(&file, expected);
            if cli.json {
                print_json(&report)?;
            } else {
                println!("{}: {}", file.display(), report.summary());
                print_messages(&report.errors, &report.warnings);
            }
            if !report.errors.is_empty() {
                return Err(AppError::Validation(format!("counts do not match for {}", file.display())).into());
            }
        }
        Commands::Gate {
            file_base,
            dialogue,
            asterix,
            empty,
            temp_root,
            ..
        } => {
            let counts = ExpectedCounts {
                dialogue,
                asterix,
                empty,
            };
            let result = controller.check_reconstruction(&file_base, counts, temp_root.as_deref());
            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "{}: {} ({} file(s) checked, {}/{} unit(s))",
                    file_base,
                    if result.overall_valid { "ready for reconstruction" } else { "NOT ready" },
                    result.summary.files_checked,
                    result.summary.total_found,
                    result.summary.total_expected
                );
                for (kind, report) in &result.files_validated {
                    println!("  {:<10} {}", kind, report.summary());
                }
                print_messages(&result.summary.errors, &result.summary.warnings);
            }
            if !result.overall_valid {
                return Err(AppError::Validation(format!("reconstruction of {} is not authorized", file_base)).into());
            }
        }
        Commands::FixQuotes { files } => {
            let outcomes = controller.fix_quotes(&files);
            let mut failures = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(counts) => println!("{}: {} correction(s)", outcome.path.display(), counts.total()),
                    Err(e) => {
                        failures += 1;
                        println!("{}: {}", outcome.path.display(), e);
                    }
                }
            }
            if failures > 0 {
                return Err(anyhow!("{} file(s) could not be repaired", failures));
            }
        }
        Commands::Progress { dir } => {
            let progress = controller.project_progress(&dir)?;
            if cli.json {
                print_json(&progress)?;
            } else {
                println!(
                    "{}/{} script(s) reconstructed ({:.0}%)",
                    progress.completed,
                    progress.total,
                    progress.percent()
                );
                for pending in &progress.pending {
                    println!("  pending: {}", pending.display());
                }
            }
        }
        Commands::Stamp { file } => {
            let changed = controller.stamp(&file)?;
            println!(
                "{}: {}",
                file.display(),
                if changed { "marked as reconstructed" } else { "already marked" }
            );
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
