use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "oasst")]
#[command(about = "Open Assistant companion: ask about pages, rank replies, manage chat settings")]
#[command(version)]
pub struct Cli {
    /// RON configuration file (default: ./oasst.ron when present)
    #[arg(long, global = true, env = "OASST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace, off
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Mirror the log to the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask the summarizer a question about a web page
    Ask(AskArgs),
    /// Rank assistant replies from the task backend
    Rank(RankArgs),
    /// Inspect or change the cached chat configuration
    Chat(ChatArgs),
    /// Browse the documentation index
    Docs(DocsArgs),
    /// Render a markdown message the way the chat shows it
    Render(RenderArgs),
    /// Show streamed drafts and their completion state
    Drafts(DraftsArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PageArgs {
    /// Page to fetch
    #[arg(long)]
    pub url: Option<String>,
    /// Local HTML file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    #[command(flatten)]
    pub page: PageArgs,
    /// Question appended to the page text
    #[arg(short, long)]
    pub question: Option<String>,
    /// Summarizer endpoint
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Maximum characters of page text per chunk
    #[arg(long)]
    pub chunk_budget: Option<usize>,
    /// Keep the widget open and read questions from stdin
    #[arg(short, long)]
    pub interactive: bool,
    /// Delay before the widget shows itself, in milliseconds
    #[arg(long)]
    pub reveal_delay_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Base URL of the task backend
    #[arg(long)]
    pub api_base: Option<String>,
    /// Submit this order (1-based reply numbers, best first) and exit
    #[arg(long)]
    pub ranking: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// JSON file with `model_infos` and `built_in_plugins`
    #[arg(long)]
    pub models: Option<PathBuf>,
    /// Cache file holding the form state
    #[arg(long)]
    pub cache: Option<PathBuf>,
    #[command(subcommand)]
    pub action: ChatAction,
}

#[derive(Debug, Subcommand)]
pub enum ChatAction {
    /// Print the current form
    Show,
    /// Print the settings sent with chat requests, as JSON
    Settings,
    /// Select a model
    Model { name: String },
    /// Select a preset (`__custom__` for hand-edited values)
    Preset { name: String },
    /// Set one sampling parameter
    Param { key: String, value: f64 },
    /// Switch one sampling parameter on or off
    Toggle { key: String, state: Switch },
    /// Manage plugins
    Plugin {
        #[command(subcommand)]
        action: PluginAction,
    },
    /// Save the current values as a named preset
    SavePreset { name: String },
}

#[derive(Debug, Subcommand)]
pub enum PluginAction {
    Enable { url: String },
    Disable { url: String },
    Add { url: String },
    Remove { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct DocsArgs {
    /// Docs JSON or the bundle embedding it
    #[arg(long)]
    pub index: PathBuf,
    #[command(subcommand)]
    pub action: DocsAction,
}

#[derive(Debug, Subcommand)]
pub enum DocsAction {
    /// List the links of a sidebar
    List {
        #[arg(long, default_value = "sidebar")]
        sidebar: String,
    },
    /// Show a document's title, description and breadcrumb
    Show { id: String },
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Markdown file
    pub file: PathBuf,
    /// Author shown above the message
    #[arg(long)]
    pub name: Option<String>,
    /// Print the raw content, as before the renderer has loaded
    #[arg(long)]
    pub plain: bool,
}

#[derive(Debug, Args)]
pub struct DraftsArgs {
    /// JSON with `drafts` (streamed text) and `messages` (draft records)
    pub file: PathBuf,
    /// Expand this draft (1-based) before printing
    #[arg(long)]
    pub expand: Option<usize>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            log_level: self.log_level.clone(),
            verbose: self.verbose,
            ..ConfigOverrides::default()
        };
        match &self.command {
            Command::Ask(args) => {
                overrides.ask_endpoint = args.endpoint.clone();
                overrides.chunk_budget = args.chunk_budget;
                overrides.reveal_delay_ms = args.reveal_delay_ms;
            }
            Command::Rank(args) => overrides.api_base_url = args.api_base.clone(),
            Command::Chat(args) => {
                overrides.cache_path = args.cache.clone();
                overrides.models_path = args.models.clone();
            }
            Command::Docs(_) | Command::Render(_) | Command::Drafts(_) => {}
        }
        overrides
    }
}
