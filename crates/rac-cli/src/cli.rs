use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rac_core::{Category, Difficulty};

#[derive(Parser)]
#[command(name = "rac")]
#[command(about = "Log daily work activities and interactions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a new record
    #[command(alias = "new")]
    Add {
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Edit an existing record
    Edit {
        /// Record ID or unique ID prefix
        id: String,
        #[command(flatten)]
        record: RecordArgs,
        /// Drop the attached voice note
        #[arg(long, conflicts_with = "voice_note")]
        clear_voice_note: bool,
    },
    /// Delete a record
    Delete {
        /// Record ID or unique ID prefix
        id: String,
    },
    /// List records, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count records and estimate time spent
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export records (filters apply to CSV only)
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Replace every record with a JSON backup
    Import {
        /// Backup file
        path: PathBuf,
    },
    /// Manage the option lists
    Taxonomy {
        #[command(subcommand)]
        command: TaxonomyCommands,
    },
    /// Show or change CLI defaults
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Record fields shared by `add` and `edit`; omitted fields keep their value.
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    /// Organizational unit
    #[arg(long)]
    pub unit: Option<String>,
    /// Activity performed
    #[arg(long, conflicts_with = "interaction")]
    pub activity: Option<String>,
    /// Kind of interaction
    #[arg(long)]
    pub interaction: Option<String>,
    /// Counterparty of the interaction (repeat, up to 3)
    #[arg(long = "with", value_name = "NAME")]
    pub counterparties: Vec<String>,
    /// Duration label
    #[arg(long)]
    pub duration: Option<String>,
    /// Perceived difficulty
    #[arg(long, value_enum)]
    pub difficulty: Option<DifficultyArg>,
    /// Mark as urgent
    #[arg(long)]
    pub urgent: bool,
    /// Mark as not urgent
    #[arg(long, conflicts_with = "urgent")]
    pub not_urgent: bool,
    /// Date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// Time (HH:MM)
    #[arg(long, value_parser = parse_time_arg)]
    pub time: Option<NaiveTime>,
    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Audio file to attach as a voice note
    #[arg(long, value_name = "FILE")]
    pub voice_note: Option<PathBuf>,
}

/// Filters shared by `list`, `summary` and `export`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text search
    #[arg(long)]
    pub text: Option<String>,
    /// Only this unit (`all` for every unit)
    #[arg(long)]
    pub unit: Option<String>,
    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DifficultyArg {
    Low,
    Medium,
    High,
    VeryHigh,
    None,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Low => Self::Low,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::High => Self::High,
            DifficultyArg::VeryHigh => Self::VeryHigh,
            DifficultyArg::None => Self::Unset,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum TaxonomyCommands {
    /// Show option lists
    List {
        /// Only this category
        #[arg(value_parser = parse_category_arg)]
        category: Option<Category>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an option to a category
    Add {
        #[arg(value_parser = parse_category_arg)]
        category: Category,
        value: String,
    },
    /// Remove an option from a category
    Remove {
        #[arg(value_parser = parse_category_arg)]
        category: Category,
        value: String,
    },
    /// Export the option lists as JSON
    Export {
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Replace the option lists with a JSON file
    Import {
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current CLI defaults
    Show,
    /// Update CLI defaults for new records
    Set {
        /// Default unit for `rac add`
        #[arg(long)]
        unit: Option<String>,
        /// Default duration for `rac add`
        #[arg(long)]
        duration: Option<String>,
        /// Reset every default
        #[arg(long, conflicts_with_all = ["unit", "duration"])]
        clear: bool,
    },
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    rac_core::util::parse_date(value).map_err(|error| error.to_string())
}

fn parse_time_arg(value: &str) -> Result<NaiveTime, String> {
    rac_core::util::parse_time(value).map_err(|error| error.to_string())
}

fn parse_category_arg(value: &str) -> Result<Category, String> {
    value.parse().map_err(|error: rac_core::Error| error.to_string())
}
