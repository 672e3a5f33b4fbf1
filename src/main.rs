use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use vui_client::config::Config;
use vui_client::vui::client::format_vui_error;
use vui_client::{Agent, Platform, Platforms, VuiClient};

/// Navigate a VOLTTRON platform fleet through the web UI API
#[derive(Parser, Debug)]
#[command(name = "vui", version, about, long_about = None)]
struct Args {
    /// Authentication endpoint
    #[arg(long)]
    auth_url: Option<String>,

    /// Base URL for API links (defaults to the auth URL's origin)
    #[arg(long)]
    vui_url: Option<String>,

    /// Username to log in with
    #[arg(short, long)]
    username: Option<String>,

    /// Password to log in with
    #[arg(short, long, env = "VUI_PASSWORD", hide_env_values = true)]
    password: String,

    /// Persist auth URL, VUI URL and username to the config file
    #[arg(long)]
    save: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List platforms and their links
    Platforms,
    /// List installed agents of a platform
    Agents { platform: String },
    /// Status of every agent on a platform, or of one agent
    Status {
        platform: String,
        agent: Option<String>,
    },
    /// Show whether an agent is enabled and at which priority
    Enabled { platform: String, agent: String },
    /// Enable an agent
    Enable {
        platform: String,
        agent: String,
        #[arg(long)]
        priority: Option<i32>,
    },
    /// Disable an agent
    Disable { platform: String, agent: String },
    /// List the RPC functions of an agent
    Rpc { platform: String, agent: String },
    /// Execute an RPC function of an agent
    Call {
        platform: String,
        agent: String,
        function: String,
        /// Keyword arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Walk every platform and agent and print their configuration
    Tree,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("vui started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("vui-client").join("vui.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".vui-client").join("vui.log");
    }
    PathBuf::from("vui.log")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    if let Err(err) = run(args).await {
        match err.downcast_ref::<vui_client::Error>() {
            Some(vui_err) => eprintln!("Error: {}", format_vui_error(vui_err)),
            None => eprintln!("Error: {err:?}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();
    if let Some(url) = args.auth_url.as_ref() {
        config.auth_url = Some(url.clone());
    }
    if let Some(url) = args.vui_url.as_ref() {
        config.vui_url = Some(url.clone());
    }
    if let Some(username) = args.username.as_ref() {
        config.username = Some(username.clone());
    }

    let auth_url = config.effective_auth_url();
    let username = config
        .effective_username()
        .context("No username configured. Set VUI_USERNAME or use --username")?;

    let mut client = VuiClient::new(&auth_url)?;
    if let Some(vui_url) = config.effective_vui_url() {
        client = client.with_vui_url(&vui_url);
    }

    tracing::info!("Using auth URL: {}", auth_url);
    client.authenticate(&username, &args.password).await?;

    if args.save {
        config.save().context("Failed to save configuration")?;
    }

    let platforms = client.platforms().await?;

    match args.command {
        Command::Platforms => print_json(&platforms.list().await?),
        Command::Agents { platform } => {
            let platform = platforms.get_platform(&platform).await?;
            print_json(&platform.agents().await?)
        }
        Command::Status { platform, agent } => {
            let platform = platforms.get_platform(&platform).await?;
            match agent {
                Some(identity) => print_json(&platform.get_agent(&identity).await?.status().await?),
                None => print_json(&platform.status().await?),
            }
        }
        Command::Enabled { platform, agent } => {
            let agent = find_agent(&platforms, &platform, &agent).await?;
            print_json(&agent.configs().await?.enabled().await?)
        }
        Command::Enable {
            platform,
            agent,
            priority,
        } => {
            let agent = find_agent(&platforms, &platform, &agent).await?;
            let response = agent.configs().await?.set_enabled(true, priority).await?;
            print_json(&json!({ "status": response.status().as_u16() }))
        }
        Command::Disable { platform, agent } => {
            let agent = find_agent(&platforms, &platform, &agent).await?;
            let response = agent.configs().await?.set_enabled(false, None).await?;
            print_json(&json!({ "status": response.status().as_u16() }))
        }
        Command::Rpc { platform, agent } => {
            let agent = find_agent(&platforms, &platform, &agent).await?;
            let rpc = agent.configs().await?.rpc().await?;
            print_json(&rpc.functions())
        }
        Command::Call {
            platform,
            agent,
            function,
            args,
        } => {
            let kwargs: Value =
                serde_json::from_str(&args).context("--args is not valid JSON")?;
            let agent = find_agent(&platforms, &platform, &agent).await?;
            let rpc = agent.configs().await?.rpc().await?;
            match rpc.execute(&function, &kwargs).await? {
                Some(response) => print_json(&response),
                None => anyhow::bail!("RPC {} returned an unsuccessful response", function),
            }
        }
        Command::Tree => print_tree(&platforms).await,
    }
}

async fn find_agent(platforms: &Platforms, platform: &str, identity: &str) -> Result<Agent> {
    let platform = platforms.get_platform(platform).await?;
    Ok(platform.get_agent(identity).await?)
}

async fn print_tree(platforms: &Platforms) -> Result<()> {
    let mut tree = Vec::new();
    for platform in platforms.list().await? {
        tree.push(platform_tree(&platform).await?);
    }
    print_json(&tree)
}

async fn platform_tree(platform: &Platform) -> Result<Value> {
    let mut agents = Vec::new();
    for agent in platform.agents().await? {
        let configs = agent.configs().await?;
        let enabled = configs.enabled().await?;
        let running = configs.running().await?;
        agents.push(json!({
            "identity": agent.identity,
            "configs": configs,
            "enabled": enabled,
            "running": running,
        }));
    }

    Ok(json!({
        "name": platform.name,
        "links": platform.links,
        "agents": agents,
    }))
}
