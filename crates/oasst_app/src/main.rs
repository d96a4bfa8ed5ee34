mod cli;
mod config;
mod platform;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, Context};
use clap::Parser;
use oasst_core::{
    Avatar, ChatConfigMsg, DraftMessage, DraftViewer, MessageEntry, ParameterKey, PluginEntry,
    RankingMsg,
};
use oasst_engine::{load_docs_index, ConfigCacheStore, DeferredMarkdown, EngineHandle, PageSource};
use oasst_logging::{oasst_info, LogDestination};
use serde::Deserialize;

use cli::{
    AskArgs, ChatAction, ChatArgs, Cli, Command, DocsAction, DocsArgs, DraftsArgs, PluginAction,
    RankArgs, RenderArgs, Switch,
};
use config::AppConfig;
use platform::chat::{load_initial_data, ChatConfigSession};
use platform::ranking::{parse_order, RankingCommand, RankingSession};
use platform::render;
use platform::widget::AskWidget;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())?;
    init_logging(&config);
    oasst_info!("oasst {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Ask(args) => run_ask(&config, args),
        Command::Rank(args) => run_rank(&config, args),
        Command::Chat(args) => run_chat(&config, args),
        Command::Docs(args) => run_docs(args),
        Command::Render(args) => run_render(args),
        Command::Drafts(args) => run_drafts(args),
    }
}

fn init_logging(config: &AppConfig) {
    let level = oasst_logging::parse_level(&config.log_level).unwrap_or(log::LevelFilter::Info);
    let destination: LogDestination = config.log_destination();
    oasst_logging::initialize(destination, level);
}

fn run_ask(config: &AppConfig, args: AskArgs) -> anyhow::Result<()> {
    let page = match (args.page.url, args.page.file) {
        (Some(url), _) => PageSource::Url(url),
        (None, Some(file)) => PageSource::File(file),
        (None, None) => return Err(anyhow!("pass --url or --file")),
    };
    let engine = EngineHandle::new(config.engine_config())?;
    let mut widget = AskWidget::create(config.widget_settings(), config.reveal_delay(), page, engine);
    let timeout = config.ask_wait();

    if !args.interactive {
        let answer = widget.ask(args.question, timeout).display_text().to_string();
        println!("{answer}");
        widget.destroy();
        return Ok(());
    }

    widget.wait_until_visible();
    println!("Ask about this page (empty line repeats the question, \"close\" quits).");
    let mut question = args.question;
    let stdin = io::stdin();
    loop {
        print!("[{}] > ", question.as_deref().unwrap_or(widget.state().question()));
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("close") {
            widget.close();
            break;
        }
        if !line.is_empty() {
            question = Some(line.to_string());
        }
        println!("{}", widget.ask(question.take(), timeout).display_text());
    }
    widget.destroy();
    Ok(())
}

fn run_rank(config: &AppConfig, args: RankArgs) -> anyhow::Result<()> {
    let engine = EngineHandle::new(config.engine_config())?;
    let mut session = RankingSession::new(engine, config.request_timeout());
    session.dispatch(RankingMsg::Mounted);
    print!("{}", render::ranking(&session.view()));

    if let Some(order) = args.ranking {
        let order = parse_order(&order).map_err(|err| anyhow!(err))?;
        session.dispatch(RankingMsg::RankingChanged(order));
        session.dispatch(RankingMsg::SubmitClicked);
        print!("{}", render::ranking(&session.view()));
        return match session.state().last_error() {
            Some(err) => Err(anyhow!("ranking not submitted: {err}")),
            None => Ok(()),
        };
    }

    println!("{}", RankingCommand::HELP);
    let stdin = io::stdin();
    loop {
        print!("rank> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match RankingCommand::parse(&line) {
            Ok(RankingCommand::Quit) => break,
            Ok(RankingCommand::Help) => println!("{}", RankingCommand::HELP),
            Ok(command) => {
                if let Some(msg) = command.into_msg() {
                    session.dispatch(msg);
                }
                print!("{}", render::ranking(&session.view()));
            }
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}

fn run_chat(config: &AppConfig, args: ChatArgs) -> anyhow::Result<()> {
    let models = config
        .models_path
        .as_deref()
        .context("no model list configured; pass --models or set models_path")?;
    let initial = load_initial_data(models)?;
    let mut session = ChatConfigSession::open(initial, ConfigCacheStore::new(&config.cache_path));

    let msg = match args.action {
        ChatAction::Show => None,
        ChatAction::Settings => {
            let settings = session.state().chat_request_settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
        ChatAction::Model { name } => Some(ChatConfigMsg::ModelSelected(name)),
        ChatAction::Preset { name } => Some(ChatConfigMsg::PresetSelected(name)),
        ChatAction::Param { key, value } => Some(ChatConfigMsg::ParameterChanged {
            key: parameter_key(&key)?,
            value: Some(value),
        }),
        ChatAction::Toggle { key, state } => Some(ChatConfigMsg::ParameterToggled {
            key: parameter_key(&key)?,
            enabled: state == Switch::On,
        }),
        ChatAction::Plugin { action } => Some(match action {
            PluginAction::Enable { url } => ChatConfigMsg::PluginToggled { url, enabled: true },
            PluginAction::Disable { url } => ChatConfigMsg::PluginToggled { url, enabled: false },
            PluginAction::Add { url } => ChatConfigMsg::PluginAdded(PluginEntry::new(url, false)),
            PluginAction::Remove { url } => ChatConfigMsg::PluginRemoved(url),
        }),
        ChatAction::SavePreset { name } => Some(ChatConfigMsg::SavePreset(name)),
    };

    let outcome = match msg {
        Some(msg) => session.dispatch(msg),
        None => Ok(()),
    };
    print!("{}", render::chat_config(&session.state().view()));
    outcome.map_err(Into::into)
}

fn parameter_key(name: &str) -> anyhow::Result<ParameterKey> {
    ParameterKey::parse(name).ok_or_else(|| {
        let known: Vec<&str> = ParameterKey::ALL.iter().map(|k| k.as_str()).collect();
        anyhow!("unknown parameter {name:?}; expected one of {}", known.join(", "))
    })
}

fn run_docs(args: DocsArgs) -> anyhow::Result<()> {
    let index = load_docs_index(&args.index)?;
    match args.action {
        DocsAction::List { sidebar } => {
            if index.sidebar(&sidebar).is_none() {
                return Err(anyhow!("no sidebar named {sidebar:?}"));
            }
            print!("{}", render::docs_links(&index, &sidebar));
        }
        DocsAction::Show { id } => {
            let doc = index.doc(&id).with_context(|| format!("no document {id:?}"))?;
            println!("{}", doc.title);
            if let Some(description) = &doc.description {
                println!("{description}");
            }
            if let Some(crumbs) = index.breadcrumb(&id) {
                println!("in: {}", crumbs.join(" > "));
            }
        }
    }
    Ok(())
}

fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let content = read_text(&args.file)?;
    let renderer = DeferredMarkdown::new();
    if !args.plain {
        renderer.load();
    }
    let entry = MessageEntry::new(
        content,
        Avatar {
            name: args.name,
            src: None,
        },
    );
    print!("{}", render::message(&entry.render(&renderer)));
    Ok(())
}

#[derive(Debug, Deserialize)]
struct DraftsFile {
    #[serde(default)]
    drafts: Vec<String>,
    #[serde(default)]
    messages: Vec<DraftMessage>,
}

fn run_drafts(args: DraftsArgs) -> anyhow::Result<()> {
    let content = read_text(&args.file)?;
    let file: DraftsFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse drafts file {}", args.file.display()))?;
    let mut viewer = DraftViewer::new(file.drafts, file.messages);
    if let Some(position) = args.expand.and_then(|n| n.checked_sub(1)) {
        if !viewer.is_expanded(position) {
            viewer.toggle_expand(position);
        }
    }
    print!("{}", render::drafts(&viewer));
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
