use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

use dieselmodel_testkit::target_dir as workspace_target_dir;

static DIESELMODEL_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn path_arg(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

pub(crate) fn run_dieselmodel(args: &[&str]) -> Output {
	Command::new(dieselmodel_bin())
		.args(args)
		.env_remove("DIESELMODEL_LOG")
		.output()
		.expect("dieselmodel command executes")
}

pub(crate) fn run_dieselmodel_with_stdin(args: &[&str], input: &str) -> Output {
	let mut child = Command::new(dieselmodel_bin())
		.args(args)
		.env_remove("DIESELMODEL_LOG")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("dieselmodel command spawns");
	child
		.stdin
		.take()
		.expect("stdin is piped")
		.write_all(input.as_bytes())
		.expect("stdin accepts input");
	child.wait_with_output().expect("dieselmodel command finishes")
}

pub(crate) fn run_dieselmodel_json(args: &[&str]) -> serde_json::Value {
	let output = run_dieselmodel(args);
	assert!(
		output.status.success(),
		"dieselmodel command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn dieselmodel_bin() -> &'static PathBuf {
	DIESELMODEL_BIN.get_or_init(resolve_dieselmodel_bin)
}

fn resolve_dieselmodel_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_dieselmodel") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "dieselmodel.exe" } else { "dieselmodel" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "dieselmodel"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build dieselmodel binary at {}", bin.display());

	bin
}
