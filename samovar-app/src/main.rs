mod api;
mod cli;
mod tui;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use cli::commands::{open_deck, open_store, run_cli};
use cli::opts::{Cli, Command};
use tui::app::TuiApp;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose, matches!(args.cmd, Command::Tui));

    match &args.cmd {
        Command::Tui => {
            let deck = open_deck(args.data_dir.clone(), &args.learner)?;
            let mut app = TuiApp::new(deck);
            app.run()
        }
        // Only the API needs a runtime
        Command::Api(api) => {
            let store = open_store(args.data_dir.clone())?;
            let addr: std::net::SocketAddr = api.addr.parse()?;
            let rt = Runtime::new()?;
            rt.block_on(api::server::run(store, addr))
        }
        _ => run_cli(args),
    }
}

/// Logs go to stderr. The TUI owns the terminal, so it stays silent unless
/// RUST_LOG asks otherwise.
fn init_tracing(verbose: bool, tui: bool) {
    let default = match (tui, verbose) {
        (true, _) => "off",
        (false, true) => "debug",
        (false, false) => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
