use dieselmodel_testkit::scratch_dir;

use crate::cmd::test_support::{path_arg, run_dieselmodel_with_stdin};

#[test]
fn shell_validates_each_line_and_keeps_going() {
	let dir = scratch_dir();
	let input = "save=early.model\nnew\n# comment\nbogus=1\nsave=late.model\nexport=scene.gltf\nstatus\nquit\nnew\n";
	let output = run_dieselmodel_with_stdin(&["-g", "-C", &path_arg(dir.path())], input);

	assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
	let stdout = String::from_utf8_lossy(&output.stdout);
	let stderr = String::from_utf8_lossy(&output.stderr);

	assert!(stderr.contains("action 0:SaveModel is run before a model is created or loaded"), "{stderr}");
	assert!(stderr.contains("unknown directive \"bogus\""), "{stderr}");
	assert!(stderr.contains("no exporter registered for gltf"), "{stderr}");
	assert_eq!(stdout.matches("ok NewModel").count(), 1);
	assert!(stdout.contains("ok SaveModel"));
	assert!(stdout.contains("model: 0 sections"));

	assert!(!dir.path().join("early.model").exists());
	assert!(dir.path().join("late.model").is_file());
}

#[test]
fn shell_ends_at_end_of_input() {
	let dir = scratch_dir();
	let output = run_dieselmodel_with_stdin(&["-g", "-C", &path_arg(dir.path())], "new-objects+\nroot-point=Hips\nstatus\n");
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("new_objects: true"));
	assert!(stdout.contains("root_point: Hips"));
}
