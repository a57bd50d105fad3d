//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "autokeywords")]
#[command(
    author,
    version,
    about = "SEO keyword extraction for your content with automatic model fallback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or change settings
    Config(ConfigArgs),

    /// Check that an API key is accepted
    TestKey(TestKeyArgs),

    /// Manage content items
    Item(ItemArgs),

    /// Generate keywords for one item
    Generate(GenerateArgs),

    /// Process many items at once
    Bulk(BulkArgs),

    /// Register an item's stored keywords as tags
    Tags(TagsArgs),

    /// Inspect the model catalog and exclusions
    Models(ModelsArgs),

    /// Show database status
    Status,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current settings
    Show,
    /// Change a setting (api_key, model, keyword_count, enabled_item_types, debug_log)
    Set { key: String, value: String },
}

#[derive(Args)]
pub struct TestKeyArgs {
    /// Key to test; defaults to the configured key
    pub key: Option<String>,
}

#[derive(Args)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub action: ItemAction,
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// Add a content item
    Add {
        #[arg(long = "type", default_value = "post")]
        item_type: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        alt_text: Option<String>,
        #[arg(long)]
        excerpt: Option<String>,
    },
    /// Show an item with its keywords and tags
    Show { id: i64 },
    /// Set an item's keywords by hand (comma-separated)
    Keywords { id: i64, value: String },
    /// List items
    #[command(alias = "ls")]
    List {
        #[arg(long = "type")]
        item_type: Option<String>,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Item id
    pub id: i64,

    /// Store the keywords on the item
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct BulkArgs {
    #[command(subcommand)]
    pub action: BulkAction,
}

#[derive(Subcommand)]
pub enum BulkAction {
    /// Generate and store keywords for many items
    Generate {
        /// Item ids (comma-separated); defaults to all items of enabled types
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,
        /// Item types to select when no ids are given
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<String>,
        /// Pause between items in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Register stored keywords as tags for many items
    Tags {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<String>,
    },
}

#[derive(Args)]
pub struct TagsArgs {
    /// Item id
    pub id: i64,
}

#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub action: ModelsAction,
}

#[derive(Subcommand)]
pub enum ModelsAction {
    /// All catalog models with exclusion state and error history
    #[command(alias = "ls")]
    List,
    /// Models that can currently be selected
    Available,
    /// Re-enable an excluded model
    Restore { model_id: String },
    /// Re-enable every excluded model
    RestoreAll,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
