use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "samovar", version, about = "Samovar spaced-repetition vocabulary trainer (CLI/TUI/API)")]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Learner whose deck to open
    #[arg(long, global = true, default_value = "default")]
    pub learner: String,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Add one word
    Add(CardAdd),
    /// Import words or a deck export
    #[command(subcommand)]
    Import(ImportCmd),
    /// Export the deck
    #[command(subcommand)]
    Export(ExportCmd),
    /// List cards
    List(ListCmd),
    /// Show one card with its schedule
    Show { card: String },
    /// Edit card content
    Edit(CardEditArgs),
    /// Delete a card
    Rm { card: String },
    /// Forget a card's progress
    Reset { card: String },
    /// Forget all progress in the deck
    ResetAll {
        #[arg(long)]
        yes: bool,
    },
    /// Print today's review queue
    Queue(QueueCmd),
    /// Study session (CLI)
    Review(ReviewCmd),
    /// Deck statistics
    Stats(StatsCmd),
    /// Show or change scheduling settings
    Settings(SettingsCmd),
    /// Launch Terminal UI
    Tui,
    /// Launch Axum HTTP API
    Api(ApiCmd),
}

#[derive(Debug, Args, Clone)]
pub struct CardAdd {
    pub source: String,
    pub target: String,
    #[arg(long)]
    pub transcription: Option<String>,
    #[arg(long)]
    pub example: Option<String>,
    #[arg(long)]
    pub example_translation: Option<String>,
    #[arg(long)]
    pub lesson: Option<String>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CardEditArgs {
    /// Card id or its source text
    pub card: String,
    #[arg(long)]
    pub target: Option<String>,
    #[arg(long, conflicts_with = "clear_transcription")]
    pub transcription: Option<String>,
    #[arg(long)]
    pub clear_transcription: bool,
    #[arg(long, conflicts_with = "clear_example")]
    pub example: Option<String>,
    #[arg(long, conflicts_with = "clear_example")]
    pub example_translation: Option<String>,
    #[arg(long)]
    pub clear_example: bool,
    #[arg(long, conflicts_with = "clear_lesson")]
    pub lesson: Option<String>,
    #[arg(long)]
    pub clear_lesson: bool,
    /// Replaces the tag list
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub clear_tags: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ListCmd {
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long)]
    pub lesson: Option<String>,
    /// Only cards due now
    #[arg(long)]
    pub due: bool,
}

#[derive(Debug, Args, Clone)]
pub struct QueueCmd {
    /// Leave new cards out
    #[arg(long)]
    pub no_new: bool,
    #[arg(long)]
    pub max: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct ReviewCmd {
    #[arg(long, default_value_t = samovar_core::DEFAULT_SESSION_SIZE)]
    pub size: usize,
}

#[derive(Debug, Args, Clone)]
pub struct StatsCmd {
    #[arg(long)]
    pub json: bool,
    /// Window for the retention figure
    #[arg(long, default_value_t = 7)]
    pub days: u32,
}

#[derive(Debug, Args, Clone)]
pub struct SettingsCmd {
    #[arg(long)]
    pub new_per_day: Option<u32>,
    #[arg(long)]
    pub reviews_per_day: Option<u32>,
    #[arg(long)]
    pub review_ratio: Option<u32>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ExportCmd {
    Json { path: PathBuf },
    Csv {
        path: PathBuf,
        #[arg(long)]
        lesson: Option<String>,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ImportCmd {
    /// A word list (array of records) or a deck export
    Json { path: PathBuf },
    Csv {
        path: PathBuf,
        /// Put every row in this lesson
        #[arg(long)]
        lesson: Option<String>,
    },
}

#[derive(Debug, Args, Clone)]
pub struct ApiCmd {
    /// Bind address (host:port)
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
}
