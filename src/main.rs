use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use commit_journal::{
    hook, run_all, CollectContext, CollectError, CommitRecord, Config, CsvExporter,
    DailyNoteExporter, ExportKind, Exporter, JournalExporter,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "commit-journal")]
#[command(author, version, about = "Journal every git commit into your notes vault")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Commit message file (git passes this to commit-msg hooks)
    message_file: Option<PathBuf>,

    /// Config file (default: nearest .commit-journal.toml, then ~/.config/commit-journal/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip an exporter (repeatable)
    #[arg(long, value_enum)]
    skip: Vec<ExportKind>,

    /// Show what would be written without touching any file
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the commit record as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// Report each file written
    #[arg(short, long)]
    verbose: bool,

    /// Suppress warnings
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install the commit-msg hook in the current repository
    Install {
        /// Replace an existing commit-msg hook
        #[arg(long)]
        force: bool,

        /// Program the hook runs
        #[arg(long, default_value = "commit-journal")]
        program: String,
    },

    /// Remove the commit-msg hook written by `install`
    Uninstall,

    /// Print shell completions
    Completion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let args = Args::parse();

    // Handle subcommands first
    if let Some(cmd) = &args.command {
        if let Err(e) = run_command(cmd) {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
        return;
    }

    let Some(message_file) = args.message_file.clone() else {
        eprintln!("Usage: commit-journal <MESSAGE_FILE>");
        eprintln!("Run 'commit-journal --help' for more options.");
        std::process::exit(1);
    };

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        },
        None => Config::load().unwrap_or_else(|e| {
            if !args.quiet {
                println!("{} {} (using defaults)", "Warning:".yellow(), e);
            }
            Config::default()
        }),
    };

    if let Err(e) = journal_commit(&args, &message_file, &config) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_command(cmd: &Command) -> Result<(), String> {
    match cmd {
        Command::Install { force, program } => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("Could not get current directory: {}", e))?;
            hook::install(&cwd, program, *force).map_err(|e| e.to_string())?;
            println!("\n{}", "commit-msg hook installed".green().bold());
        }
        Command::Uninstall => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("Could not get current directory: {}", e))?;
            hook::uninstall(&cwd).map_err(|e| e.to_string())?;
        }
        Command::Completion { shell } => {
            clap_complete::generate(
                *shell,
                &mut Args::command(),
                "commit-journal",
                &mut std::io::stdout(),
            );
        }
    }
    Ok(())
}

/// Build the record and hand it to each exporter. Only a failure to build
/// the record is returned; exporter failures are printed as warnings.
fn journal_commit(
    args: &Args,
    message_file: &Path,
    config: &Config,
) -> Result<(), CollectError> {
    let cwd = std::env::current_dir().map_err(CollectError::CurrentDir)?;
    let record = CommitRecord::collect(&CollectContext {
        message_file,
        cwd: &cwd,
        now: Local::now().naive_local(),
        host: config.host(),
    })?;
    let paths = config.note_paths(&record.date);

    let daily = DailyNoteExporter::new(paths.daily.clone(), &config.entry.symbol, &config.daily);
    let csv = CsvExporter::new(paths.csv.clone());
    let journal = JournalExporter::new(paths.journal.clone(), &config.entry.symbol);

    let exporters: Vec<&dyn Exporter> = [&daily as &dyn Exporter, &csv, &journal]
        .into_iter()
        .filter(|e| !args.skip.contains(&e.kind()))
        .collect();

    if args.dry_run {
        print_dry_run(args.json, &record, config, &journal, &exporters);
        return Ok(());
    }

    for outcome in run_all(&exporters, &record) {
        match outcome.result {
            Ok(()) if args.verbose => {
                println!(
                    "   {} {} {}",
                    "Wrote".green(),
                    outcome.kind,
                    outcome.target.display()
                );
            }
            Ok(()) => {}
            Err(e) if !args.quiet => {
                println!("{} Failed to write {}: {}", "Warning:".yellow(), outcome.kind, e);
            }
            Err(_) => {}
        }
    }

    Ok(())
}

fn print_dry_run(
    json: bool,
    record: &CommitRecord,
    config: &Config,
    journal: &JournalExporter,
    exporters: &[&dyn Exporter],
) {
    if json {
        match serde_json::to_string_pretty(record) {
            Ok(out) => println!("{}", out),
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
        return;
    }

    println!("{}", "Commit record".cyan().bold());
    for (name, value) in record.fields() {
        println!("   {:<8} {}", name, value);
    }

    println!("\n{}", "Would write".cyan().bold());
    for exporter in exporters {
        let line = match exporter.kind() {
            ExportKind::Daily => record.entry_line(&config.entry.symbol),
            ExportKind::Csv => commit_journal::export::csv::row_line(record),
            ExportKind::Journal => journal.entry(record),
        };
        println!("   {} {}", exporter.kind().to_string().green(), exporter.target().display());
        println!("      {}", line);
    }
}
