#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "mayadoc", about = "Maya scene file inspection tools")]
struct Cli {
	/// Increase log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long = "verbose", action = ArgAction::Count, global = true)]
	verbosity: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Summarize container layout, header, and event counts.
	Info(cmd::info::Args),
	/// Print decoded scene events in file order.
	Events(cmd::events::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbosity);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	// RUST_LOG wins over -v when set.
	let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()));
	builder.format_timestamp(None).init();
}

fn run(command: Commands) -> mayadoc::scene::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Events(args) => cmd::events::run(args),
	}
}
