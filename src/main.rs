pub mod config;
mod blocks;
mod logging;
mod prompt;
mod render;
mod spinner;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use userblocks::{BoxedManagementClient, MockManagementClient};
use v_utils::prelude::*;

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
	#[clap(flatten)]
	settings_flags: config::SettingsFlags,
	#[arg(long, global = true, hide = true)]
	mock: bool,
	/// Don't show the progress spinner
	#[arg(long, global = true)]
	no_spinner: bool,
	/// Emit logs as JSON lines on stderr
	#[arg(long, global = true)]
	log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Manage users
	Users(blocks::UsersArgs),
}

#[tokio::main]
async fn main() {
	color_eyre::config::HookBuilder::default().capture_span_trace_by_default(false).install().unwrap();

	let cli = Cli::parse();
	logging::init(cli.log_json);

	match run(cli).await {
		Ok(()) => std::process::exit(0),
		Err(e) => {
			eprintln!("{e:?}");
			std::process::exit(1);
		}
	}
}

async fn run(cli: Cli) -> Result<()> {
	let client: BoxedManagementClient = if cli.mock {
		Arc::new(MockManagementClient::from_env()?)
	} else {
		let settings = config::Settings::load(&cli.settings_flags)?;
		Arc::new(settings.client()?)
	};

	let opts = blocks::RunOptions { spinner: !cli.no_spinner };
	match cli.command {
		Commands::Users(args) => blocks::main(client.as_ref(), args, opts).await,
	}
}

/// Token cancelled on the first Ctrl-C.
///
/// Installing the handler takes SIGINT's default action away for the rest of the process, so this is
/// only called once nothing blocking (like the identifier prompt) is left to run.
fn cancel_on_ctrl_c() -> CancellationToken {
	let cancel = CancellationToken::new();
	tokio::spawn({
		let cancel = cancel.clone();
		async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				tracing::warn!("interrupted, cancelling outstanding requests");
				cancel.cancel();
			}
		}
	});
	cancel
}
