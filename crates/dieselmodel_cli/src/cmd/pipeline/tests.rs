use std::fs;
use std::path::PathBuf;

use clap::CommandFactory;
use dieselmodel::script::{ExportFileType, ScriptItem};
use dieselmodel_testkit::{ModelFile, scratch_dir};

use super::ordered_items;
use crate::cmd::test_support::{path_arg, run_dieselmodel};

fn items_for(args: &[&str]) -> Vec<ScriptItem> {
	let matches = crate::Cli::command()
		.try_get_matches_from(std::iter::once("dieselmodel").chain(args.iter().copied()))
		.expect("arguments parse");
	ordered_items(&matches)
}

#[test]
fn actions_keep_command_line_order() {
	let items = items_for(&[
		"--load=a.model",
		"-n",
		"--export-type=json",
		"--import=b.obj",
		"-r=Hips",
		"--import-pattern-uv=b_uv.obj",
		"--save=c.model",
		"-n=false",
		"--new",
		"--root-point",
		"--export",
		"d.obj",
	]);
	assert_eq!(
		items,
		vec![
			ScriptItem::LoadModel(PathBuf::from("a.model")),
			ScriptItem::CreateNewObjects(true),
			ScriptItem::SetDefaultType(ExportFileType::Json),
			ScriptItem::Import(PathBuf::from("b.obj")),
			ScriptItem::SetRootPoint(Some("Hips".to_owned())),
			ScriptItem::PatternUv(PathBuf::from("b_uv.obj")),
			ScriptItem::SaveModel(PathBuf::from("c.model")),
			ScriptItem::CreateNewObjects(false),
			ScriptItem::NewModel,
			ScriptItem::SetRootPoint(None),
			ScriptItem::Export(PathBuf::from("d.obj")),
		]
	);
}

#[test]
fn flags_alone_produce_no_items() {
	assert!(items_for(&["-v", "-C", "somewhere"]).is_empty());
}

#[test]
fn export_before_data_fails_before_any_io() {
	let dir = scratch_dir();
	ModelFile::sized().triangle_mesh(0x10, 1).write_to(&dir.path().join("a.model"));
	let output = run_dieselmodel(&["-C", &path_arg(dir.path()), "--export=early.obj", "--load=a.model", "--save=b.model"]);

	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("action 0:Export is run before a model is created or loaded"), "{stderr}");
	assert!(!dir.path().join("early.obj").exists());
	assert!(!dir.path().join("b.model").exists());
}

#[test]
fn load_export_save_runs_in_order() {
	let dir = scratch_dir();
	ModelFile::sized().triangle_mesh(0x10, 0x55).write_to(&dir.path().join("a.model"));
	let output = run_dieselmodel(&[
		"-q",
		"-C",
		&path_arg(dir.path()),
		"--load=a.model",
		"--export=a.obj",
		"--export-type=json",
		"--export=a_dump",
		"--save=copy.model",
	]);
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

	let obj = fs::read_to_string(dir.path().join("a.obj")).expect("obj written");
	assert!(obj.starts_with("o 0000000000000055\n"));
	let dump: serde_json::Value = serde_json::from_slice(&fs::read(dir.path().join("a_dump")).expect("dump")).expect("json");
	assert_eq!(dump["sections"].as_array().map(Vec::len), Some(7));
	assert_eq!(
		fs::read(dir.path().join("copy.model")).expect("copy"),
		fs::read(dir.path().join("a.model")).expect("original")
	);
}

#[test]
fn interactive_mode_rejects_actions() {
	let output = run_dieselmodel(&["-g", "--new"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("cannot process files in interactive mode"));
}

#[test]
fn unknown_option_exits_non_zero() {
	let output = run_dieselmodel(&["--frobnicate"]);
	assert!(!output.status.success());
}

#[test]
fn unsupported_export_type_fails_the_run() {
	let dir = scratch_dir();
	let output = run_dieselmodel(&["-C", &path_arg(dir.path()), "--new", "--export=scene.fbx"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("no exporter registered for fbx"));
}

#[test]
fn script_paths_resolve_against_script_directory() {
	let dir = scratch_dir();
	let jobs = dir.path().join("jobs");
	fs::create_dir_all(&jobs).expect("dir");
	ModelFile::plain().triangle_mesh(0x10, 1).write_to(&jobs.join("in.model"));
	fs::write(jobs.join("convert.txt"), "# convert one file\nload=in.model\nexport=out.obj\n").expect("script");

	let output = run_dieselmodel(&["-C", &path_arg(dir.path()), "--script=jobs/convert.txt"]);
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
	assert!(jobs.join("out.obj").is_file());
}

#[test]
fn batch_export_continues_past_corrupt_file() {
	let dir = scratch_dir();
	let levels = dir.path().join("levels");
	fs::create_dir_all(levels.join("sub")).expect("dirs");
	ModelFile::sized().triangle_mesh(0x10, 1).write_to(&levels.join("a.model"));
	ModelFile::sized().triangle_mesh(0x10, 2).write_to(&levels.join("sub/c.model"));
	fs::write(levels.join("b.model"), [1, 0, 0, 0, 9]).expect("corrupt");

	let output = run_dieselmodel(&["-C", &path_arg(dir.path()), "--export-type=json", "--batch-export=levels"]);
	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
	assert!(levels.join("a.json").is_file());
	assert!(levels.join("sub/c.json").is_file());
	assert!(!levels.join("b.json").exists());
	assert!(String::from_utf8_lossy(&output.stderr).contains("b.model"));
}
