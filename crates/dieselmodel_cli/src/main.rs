#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use dieselmodel::script::{Result, ScriptError, ScriptState};

mod cmd;

#[derive(Parser)]
#[command(
	name = "dieselmodel",
	about = "Import and export Diesel .model files",
	long_about = "Import and export Diesel .model files.\n\n\
		Without arguments an interactive shell reads directives from stdin.\n\
		Otherwise the actions run in command-line order, e.g.\n  \
		--load=a.model --import=b.obj --root-point=Hips --import-pattern-uv=b_pattern.obj --save=c.model"
)]
struct Cli {
	/// Start the interactive shell.
	#[arg(short = 'g', long)]
	interactive: bool,
	/// Increase log verbosity.
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	verbose: u8,
	/// Decrease log verbosity.
	#[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
	quiet: u8,
	/// Base directory for relative paths.
	#[arg(short = 'C', long = "work-dir", value_name = "DIR")]
	work_dir: Option<PathBuf>,
	/// Print the section table of a file and exit.
	#[arg(long, value_name = "FILE")]
	info: Option<PathBuf>,
	/// Emit `--info` output as JSON.
	#[arg(long, requires = "info")]
	json: bool,
	#[command(flatten)]
	actions: cmd::pipeline::Actions,
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	if std::env::args_os().len() <= 1 {
		cmd::logging::init(cmd::logging::DEFAULT_VERBOSITY);
		return cmd::shell::run(ScriptState::new(current_dir()?));
	}

	let matches = Cli::command().get_matches();
	let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

	let items = cmd::pipeline::ordered_items(&matches);
	if cli.interactive && !items.is_empty() {
		return Err(ScriptError::InteractiveWithData);
	}
	let verbosity = cmd::logging::verbosity(cli.verbose, cli.quiet)?;
	cmd::logging::init(verbosity);

	if let Some(path) = cli.info {
		return cmd::info::run(&path, cli.json);
	}

	let work_dir = match cli.work_dir {
		Some(dir) => dir,
		None => current_dir()?,
	};
	let state = ScriptState::new(work_dir);
	if cli.interactive || items.is_empty() {
		return cmd::shell::run(state);
	}
	cmd::pipeline::run(state, &items)
}

fn current_dir() -> Result<PathBuf> {
	std::env::current_dir().map_err(|source| ScriptError::Io {
		path: PathBuf::from("."),
		source,
	})
}
