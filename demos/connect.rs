//! Connects one pretend tab to a LiveReload server and logs what the
//! extension would do.
//!
//! Usage:
//!
//! ```text
//! cargo run --example connect -- http://localhost:8080/ [--debug]
//! ```
//!
//! Start any LiveReload server (e.g. `livereload .`) first, then edit a
//! watched file: the demo prints a reload line for tab 1.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use livereload_tab::{Indicator, ReloadOptions, Result, TabHost, TabId, TabInfo, TabManager};

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    url: String,
    debug: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let url = args
            .iter()
            .find(|a| !a.starts_with("--"))
            .cloned()
            .unwrap_or_else(|| "http://localhost/".to_string());
        Self {
            url,
            debug: args.iter().any(|a| a == "--debug"),
        }
    }
}

/// Host that prints instead of touching a browser.
struct ConsoleHost {
    url: String,
}

impl TabHost for ConsoleHost {
    fn set_indicator(&self, tab_id: TabId, indicator: &Indicator) {
        println!(
            "[tab {tab_id}] {} ({})",
            indicator.title,
            indicator.icon_path()
        );
    }

    fn reload(&self, tab_id: TabId, options: ReloadOptions) {
        println!(
            "[tab {tab_id}] reload (bypass_cache = {})",
            options.bypass_cache
        );
    }

    fn active_tab(&self) -> Option<TabInfo> {
        Some(TabInfo::new(1, self.url.clone()))
    }
}

// ============================================================================
// Functions
// ============================================================================

fn init_logging(debug: bool) {
    let filter = if debug {
        "livereload_tab=debug"
    } else {
        "livereload_tab=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let manager = TabManager::builder()
        .host(Arc::new(ConsoleHost {
            url: args.url.clone(),
        }))
        .build()?;

    match manager.activate(None) {
        Some(connector) => info!(target_url = %connector.target(), "Toggled tab 1"),
        None => {
            println!("No LiveReload target for {}", args.url);
            return Ok(());
        }
    }

    println!("Press Ctrl+C to exit...");
    tokio::signal::ctrl_c().await?;

    manager.shutdown();
    Ok(())
}
