use std::fs;
use std::sync::atomic::AtomicBool;

use dieselmodel_testkit::{ModelFile, scratch_dir};

use super::{batch_export, find_model_files};
use crate::script::{Adapters, ExportFileType, ScriptError};

fn seed(dir: &std::path::Path) {
	fs::create_dir_all(dir.join("props/crates")).expect("dirs");
	ModelFile::sized().triangle_mesh(0x10, 1).write_to(&dir.join("a.model"));
	ModelFile::plain().triangle_mesh(0x20, 2).write_to(&dir.join("props/crates/c.MODEL"));
	fs::write(dir.join("props/b.model"), [0xFF, 0xFF, 0xFF, 0xFF, 7, 0, 0, 0]).expect("corrupt file");
	fs::write(dir.join("props/notes.txt"), "not a model").expect("txt");
}

#[test]
fn discovery_is_recursive_and_sorted() {
	let dir = scratch_dir();
	seed(dir.path());
	let files = find_model_files(dir.path()).expect("scan");
	let names: Vec<_> = files.iter().map(|path| path.strip_prefix(dir.path()).expect("under root").to_path_buf()).collect();
	assert_eq!(
		names,
		vec![
			std::path::PathBuf::from("a.model"),
			std::path::PathBuf::from("props/b.model"),
			std::path::PathBuf::from("props/crates/c.MODEL"),
		]
	);
}

#[test]
fn one_corrupt_file_of_three_fails_alone() {
	let dir = scratch_dir();
	seed(dir.path());
	let report = batch_export(dir.path(), ExportFileType::Obj, &Adapters::builtin(), &AtomicBool::new(false)).expect("batch runs");

	assert_eq!(report.exported.len(), 2);
	assert_eq!(report.failures.len(), 1);
	assert!(!report.cancelled);
	assert!(report.failures[0].path.ends_with("props/b.model"));
	assert!(matches!(report.failures[0].error, ScriptError::Model(_)));

	assert!(dir.path().join("a.obj").is_file());
	assert!(dir.path().join("props/crates/c.obj").is_file());
	assert!(!dir.path().join("props/b.obj").exists());
}

#[test]
fn missing_exporter_fails_every_file_without_aborting() {
	let dir = scratch_dir();
	seed(dir.path());
	let report = batch_export(dir.path(), ExportFileType::Fbx, &Adapters::builtin(), &AtomicBool::new(false)).expect("batch runs");
	assert!(report.exported.is_empty());
	assert_eq!(report.failures.len(), 3);
}

#[test]
fn raised_stop_flag_exports_nothing() {
	let dir = scratch_dir();
	seed(dir.path());
	let report = batch_export(dir.path(), ExportFileType::Json, &Adapters::builtin(), &AtomicBool::new(true)).expect("batch runs");
	assert!(report.cancelled);
	assert!(report.exported.is_empty());
	assert!(!dir.path().join("a.json").exists());
}

#[test]
fn missing_directory_is_an_error() {
	let dir = scratch_dir();
	let err = batch_export(&dir.path().join("nope"), ExportFileType::Obj, &Adapters::builtin(), &AtomicBool::new(false)).expect_err("no dir");
	assert!(matches!(err, ScriptError::Io { .. }));
}
