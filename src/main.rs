mod app;
mod config;

use anyhow::Result;
use clap::Parser;

use farewatch::shared::types::PlausibilityWindow;

#[derive(Parser, Debug)]
#[command(version, about = "Highway bus fare monitor with webhook notifications")]
struct Args {
    /// Booking results page URL to monitor
    #[arg(long)]
    url: Option<String>,

    /// Discord webhook URL (omit to print notifications to the console)
    #[arg(long)]
    webhook_url: Option<String>,

    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Snapshot file path
    #[arg(long)]
    snapshot_file: Option<String>,

    /// History file path
    #[arg(long)]
    history_file: Option<String>,

    /// Polling interval in seconds
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Lower plausibility bound for extracted prices
    #[arg(long)]
    min_price: Option<u32>,

    /// Upper plausibility bound for extracted prices
    #[arg(long)]
    max_price: Option<u32>,

    /// History capacity (entries kept for trend rendering)
    #[arg(long)]
    history_capacity: Option<usize>,

    /// Run one check and exit
    #[arg(long)]
    once: bool,

    /// Serve generated markup instead of fetching the live site
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    // Load base configuration from file if provided
    let base_config = if let Some(config_path) = &args.config {
        Some(config::Config::from_file(config_path)?)
    } else {
        None
    };

    // Create AppCfg with priority: CLI args > Config file > Defaults
    let mut app_cfg = if let Some(cfg) = base_config {
        app::AppCfg::from_config(cfg, args.once)?
    } else {
        let url = match (&args.url, args.demo) {
            (Some(url), _) => url.clone(),
            // Demo runs never touch the network, any syntactically valid
            // URL will do
            (None, true) => "https://example.com/searchbus/tokyo_akita/".to_string(),
            (None, false) => {
                anyhow::bail!("--url is required when not using --config or --demo")
            }
        };
        app::AppCfg::from_cli_args(url, args.webhook_url.clone(), args.once, args.demo)?
    };

    // Override with CLI args if provided (CLI has higher priority)
    if let Some(url) = args.url {
        app_cfg.url = url;
    }
    if let Some(webhook_url) = args.webhook_url {
        app_cfg.webhook_url = Some(webhook_url);
    }
    if let Some(snapshot_file) = args.snapshot_file {
        app_cfg.snapshot_file = snapshot_file;
    }
    if let Some(history_file) = args.history_file {
        app_cfg.history_file = history_file;
    }
    if let Some(interval_secs) = args.interval_secs {
        app_cfg.interval_secs = interval_secs;
    }
    if let Some(history_capacity) = args.history_capacity {
        app_cfg.history_capacity = history_capacity;
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        let window = app_cfg.extractor.window;
        app_cfg.extractor.window = PlausibilityWindow::new(
            args.min_price.unwrap_or(window.min),
            args.max_price.unwrap_or(window.max),
        );
    }
    if args.demo {
        app_cfg.demo = true;
    }

    app::run(app_cfg).await
}
