use clap::{Args, Parser, Subcommand};
use getfit_core::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "getfit")]
#[command(about = "Personal exercise log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the save file
    #[arg(long, global = true)]
    save_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout and print its id
    Add(AddArgs),

    /// Show one entry as JSON
    Get {
        /// Entry id
        id: String,
    },

    /// List entries as JSON, optionally filtered and sorted
    List(FilterArgs),

    /// Delete an entry
    Remove {
        /// Entry id
        id: String,
    },

    /// Write entries to a CSV file
    Export {
        /// Destination CSV file
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Entry fields, passed through as text and validated by the core
#[derive(Args)]
struct AddArgs {
    /// Use this id instead of generating one
    #[arg(long)]
    id: Option<String>,

    #[arg(long)]
    title: String,

    #[arg(long)]
    comment: String,

    /// Date of the workout (YYYY-MM-DD)
    #[arg(long)]
    date: String,

    /// Duration in whole seconds
    #[arg(long, allow_hyphen_values = true)]
    duration: String,

    #[arg(long, allow_hyphen_values = true)]
    feeling: String,

    #[arg(long, allow_hyphen_values = true)]
    distance: String,

    #[arg(long, allow_hyphen_values = true)]
    max_heart_rate: String,

    /// STRENGTH, RUNNING, CYCLING or SWIMMING
    #[arg(long)]
    category: String,

    /// PUSH, PULL, LEGS (strength) or SHORT, LONG, HIGHINTENSITY, LOWINTENSITY
    #[arg(long)]
    sub_category: String,
}

#[derive(Args)]
struct FilterArgs {
    /// Only entries in this category
    #[arg(long)]
    category: Option<String>,

    /// Only entries in this subcategory
    #[arg(long)]
    sub_category: Option<String>,

    /// Only entries within an inclusive range (YYYY-MM-DD-YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Sort by date, title, duration, feeling, distance or maxHeartRate
    #[arg(long)]
    sort: Option<String>,

    /// Reverse the final order
    #[arg(long)]
    reverse: bool,
}

impl FilterArgs {
    fn to_spec(&self) -> Result<QuerySpec> {
        QueryParams {
            category: self.category.clone(),
            sub_category: self.sub_category.clone(),
            date: self.date.clone(),
            sort: self.sort.clone(),
            reverse: Some(self.reverse.to_string()),
        }
        .to_spec()
    }
}

fn main() -> ExitCode {
    // Keep stdout for command output; only warnings and up by default
    getfit_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let save_file = match cli.save_file {
        Some(path) => path,
        None => Config::load()?.data.save_file,
    };

    let mut manager = open_store(&save_file)?;

    match cli.command {
        Commands::Add(args) => cmd_add(&mut manager, &save_file, args),
        Commands::Get { id } => {
            let entry = manager.get_entry(&id)?;
            print_json(&EntryRecord::from(entry))
        }
        Commands::List(filter) => {
            let spec = filter.to_spec()?;
            let records: Vec<EntryRecord> = run_query(&manager, &spec)
                .into_iter()
                .map(EntryRecord::from)
                .collect();
            print_json(&records)
        }
        Commands::Remove { id } => {
            manager.remove_entry(&id)?;
            codec::save(&manager, &save_file)?;
            println!("Removed entry {}", id);
            Ok(())
        }
        Commands::Export { out, filter } => {
            let spec = filter.to_spec()?;
            let count = export_csv(run_query(&manager, &spec), &out)?;
            println!("Exported {} entries to {}", count, out.display());
            Ok(())
        }
    }
}

/// Restore the store from the save file, or start empty if there is none
fn open_store(save_file: &Path) -> Result<EntryManager> {
    let mut manager = EntryManager::new();
    if save_file.exists() {
        codec::load(&mut manager, save_file)?;
    } else {
        tracing::info!("No save file at {:?}, starting empty", save_file);
    }
    Ok(manager)
}

fn cmd_add(manager: &mut EntryManager, save_file: &Path, args: AddArgs) -> Result<()> {
    let record = EntryRecord {
        id: None,
        title: Some(args.title),
        comment: Some(args.comment),
        date: Some(args.date),
        duration: Some(args.duration),
        feeling: Some(args.feeling),
        distance: Some(args.distance),
        max_heart_rate: Some(args.max_heart_rate),
        exercise_category: Some(args.category),
        exercise_sub_category: Some(args.sub_category),
    };
    let draft = record.to_draft()?;

    let id = match args.id {
        Some(id) => {
            manager.add_entry_with_id(id.clone(), draft)?;
            id
        }
        None => manager.add_entry(draft)?,
    };

    codec::save(manager, save_file)?;
    println!("{}", id);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}

/// Process exit status for each error kind
fn exit_code(err: &Error) -> u8 {
    match err {
        Error::Validation { .. } => 2,
        Error::NotFound(_) => 3,
        Error::DuplicateId(_) => 4,
        Error::MalformedData(_) => 5,
        Error::Io(_) | Error::Csv(_) | Error::Toml(_) | Error::Config(_) => 1,
    }
}
