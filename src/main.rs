use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};
use userguide::config::AppConfig;
use userguide::core::Dispatcher;
use userguide::host::{HttpBackend, SimulatedHost};
use userguide_core::HostEvent;
use userguide_types::{PanelClicked, Surface, WidgetAction};

/// userguide - user-guide video catalog for collaboration endpoint touch panels
#[derive(Parser, Debug, Clone)]
#[command(name = "userguide")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch the catalog from this URL instead of the configured content
    #[arg(long = "content-server", value_name = "URL")]
    content_server: Option<String>,

    /// Panel namespace override
    #[arg(long = "panel-id", value_name = "ID")]
    panel_id: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "dump-config")]
    dump_config: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long = "save-config")]
    save_config: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }),
    };
    if let Some(url) = &cli.content_server {
        config.content_server = Some(url.clone());
    }
    if let Some(panel_id) = &cli.panel_id {
        config.panel_id = panel_id.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    if cli.save_config {
        match &cli.config {
            Some(path) => config.save_to_path(path)?,
            None => config.save()?,
        }
        info!("Configuration saved");
        return Ok(());
    }

    info!("Starting userguide v{}", env!("CARGO_PKG_VERSION"));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let local = tokio::task::LocalSet::new();

    let host = Rc::new(SimulatedHost::new(HttpBackend::live()));
    host.attach_navigator();
    let dispatcher = Dispatcher::new(Rc::clone(&host), config.dispatcher_config());

    local.block_on(&rt, async move {
        tokio::task::spawn_local(dispatcher.run());
        if let Err(e) = drive_console(&host, &config.panel_id).await {
            error!("Console input failed: {}", e);
        }
    });
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  tap <n>          tap the n-th button (0-based)");
    println!("  open             open the panel (refreshes the catalog)");
    println!("  attach | detach  connect or remove the in-room navigator");
    println!("  dismiss <osd|controller>");
    println!("  status           show overlays and button states");
    println!("  quit");
}

fn print_status(host: &SimulatedHost, panel_id: &str) {
    for surface in Surface::ALL {
        match host.overlay_on(surface) {
            Some(overlay) => println!("{:<10} {}", surface, overlay.url),
            None => println!("{:<10} -", surface),
        }
    }
    for (n, widget) in host.widget_ids(panel_id).iter().enumerate() {
        let value = host
            .widget_value(widget)
            .map(|v| v.as_str())
            .unwrap_or("-");
        println!("[{}] {} {}", n, widget, value);
    }
}

/// Translate stdin commands into simulated user actions
async fn drive_console(host: &SimulatedHost, panel_id: &str) -> Result<()> {
    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("tap"), Some(n)) => {
                let widgets = host.widget_ids(panel_id);
                match n.parse::<usize>().ok().and_then(|n| widgets.get(n)) {
                    Some(widget) => {
                        host.emit(HostEvent::WidgetAction(WidgetAction::clicked(widget.clone())))
                    }
                    None => println!("no button {}", n),
                }
            }
            (Some("open"), None) => host.emit(HostEvent::PanelClicked(PanelClicked {
                panel_id: panel_id.to_string(),
            })),
            (Some("attach"), None) => host.attach_navigator(),
            (Some("detach"), None) => host.detach_navigators(),
            (Some("dismiss"), Some(surface)) => match surface.to_ascii_lowercase().as_str() {
                "osd" => host.dismiss(Surface::Osd),
                "controller" => host.dismiss(Surface::Controller),
                other => println!("unknown surface {}", other),
            },
            (Some("status"), None) => print_status(host, panel_id),
            (Some("quit"), None) => break,
            (None, _) => {}
            _ => print_help(),
        }
    }
    Ok(())
}
