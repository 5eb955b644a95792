use dieselmodel::script::{Result, ScriptError};
use log::LevelFilter;

/// Environment variable whose filter overrides the verbosity flags.
pub const LOG_ENV: &str = "DIESELMODEL_LOG";
/// Info level.
pub const DEFAULT_VERBOSITY: i32 = 2;
/// Error level, the quietest.
pub const MAX_VERBOSITY: i32 = 4;

/// Net verbosity after `-v`/`-q`; 0 is trace, 4 is error.
pub fn verbosity(verbose: u8, quiet: u8) -> Result<i32> {
	let verbosity = DEFAULT_VERBOSITY - i32::from(verbose) + i32::from(quiet);
	if !(0..=MAX_VERBOSITY).contains(&verbosity) {
		return Err(ScriptError::Verbosity {
			verbosity,
			max: MAX_VERBOSITY,
		});
	}
	Ok(verbosity)
}

pub fn level_filter(verbosity: i32) -> LevelFilter {
	match verbosity {
		i32::MIN..=0 => LevelFilter::Trace,
		1 => LevelFilter::Debug,
		2 => LevelFilter::Info,
		3 => LevelFilter::Warn,
		_ => LevelFilter::Error,
	}
}

/// Install the stderr logger.
pub fn init(verbosity: i32) {
	let mut builder = env_logger::Builder::new();
	builder
		.filter_level(level_filter(verbosity))
		.format_timestamp(None)
		.parse_env(env_logger::Env::new().filter(LOG_ENV));
	if builder.try_init().is_err() {
		eprintln!("warning: logger already installed");
	}
}

#[cfg(test)]
mod tests {
	use log::LevelFilter;

	use super::{level_filter, verbosity};
	use crate::cmd::test_support::run_dieselmodel;

	#[test]
	fn verbosity_stays_in_range() {
		assert_eq!(verbosity(0, 0).expect("default"), 2);
		assert_eq!(verbosity(2, 0).expect("trace"), 0);
		assert_eq!(verbosity(0, 2).expect("error"), 4);
		assert!(verbosity(3, 0).is_err());
		assert!(verbosity(0, 3).is_err());
		assert_eq!(level_filter(2), LevelFilter::Info);
		assert_eq!(level_filter(4), LevelFilter::Error);
	}

	#[test]
	fn out_of_range_verbosity_exits_non_zero() {
		let output = run_dieselmodel(&["-qqq", "--new"]);
		assert!(!output.status.success());
		let stderr = String::from_utf8_lossy(&output.stderr);
		assert!(stderr.contains("cannot be that verbose or quiet"), "{stderr}");
	}
}
