#![allow(missing_docs)]

use std::fs;

use dieselmodel::model::sections::{Geometry, Model, PassthroughGp, Topology};
use dieselmodel::model::{HashName, ModelGraph, recompute_bounds};
use dieselmodel::script::{ScriptItem, ScriptState};
use dieselmodel_testkit::{ModelFile, mesh_ids, scratch_dir};
use glam::Vec3;

fn mesh_of(graph: &ModelGraph, model_id: u32) -> (&Model, &Geometry, &Topology) {
	let model = graph.require::<Model>(model_id).expect("model");
	let link = graph.resolve::<PassthroughGp>(model.as_full().expect("full layout").passthrough).expect("link");
	let geometry = graph.resolve::<Geometry>(link.geometry).expect("geometry");
	let topology = graph.resolve::<Topology>(link.topology).expect("topology");
	(model, geometry, topology)
}

#[test]
fn exported_obj_reimports_onto_the_same_model() {
	let dir = scratch_dir();
	let name = HashName::of("hull");
	ModelFile::sized()
		.triangle_mesh(0x100, name.0)
		.trailing(&[0xEE; 4])
		.write_to(&dir.path().join("ship.model"));

	let mut state = ScriptState::new(dir.path());
	state
		.execute_items(&[ScriptItem::LoadModel("ship.model".into()), ScriptItem::Export("ship.obj".into())])
		.expect("export runs");

	// Stretch the exported mesh along x and bring it back in.
	let obj = fs::read_to_string(dir.path().join("ship.obj")).expect("obj");
	let stretched = obj.replace("v 2 0 0", "v 8 0 0");
	fs::write(dir.path().join("ship_edit.obj"), stretched).expect("edited obj");

	state
		.execute_items(&[ScriptItem::Import("ship_edit.obj".into()), ScriptItem::SaveModel("ship_out.model".into())])
		.expect("import and save run");

	let graph = ModelGraph::open(dir.path().join("ship_out.model")).expect("saved file loads");
	assert_eq!(graph.len(), 7);
	assert_eq!(graph.trailing(), &[0xEE; 4]);

	let (model, geometry, topology) = mesh_of(&graph, 0x100 + mesh_ids::MODEL);
	assert_eq!(geometry.positions()[1], Vec3::new(8.0, 0.0, 0.0));
	assert_eq!(topology.triangle_count(), 1);
	let (min, max) = model.bounds();
	assert_eq!(min, Vec3::new(0.0, 0.0, -1.0));
	assert_eq!(max, Vec3::new(8.0, 3.0, 0.0));
	assert_eq!(model.as_full().expect("full").bounding_radius, 8.0);
}

#[test]
fn bounds_follow_transform_scale() {
	let bytes = ModelFile::sized().triangle_mesh(0x10, 5).build();
	let mut graph = ModelGraph::load(&bytes).expect("file loads");
	let model_id = 0x10 + mesh_ids::MODEL;

	let model = graph.get_as_mut::<Model>(model_id).expect("model");
	model.object.transform[0] = 3.0;
	model.object.transform[5] = 0.5;
	assert!(recompute_bounds(&mut graph, model_id).expect("recompute"));

	let (min, max) = graph.require::<Model>(model_id).expect("model").bounds();
	assert_eq!(min, Vec3::new(0.0, 0.0, -1.0));
	assert_eq!(max, Vec3::new(6.0, 1.5, 0.0));
}

#[test]
fn untouched_load_save_is_byte_identical() {
	let bytes = ModelFile::plain()
		.triangle_mesh(0x10, 1)
		.triangle_mesh(0x20, 2)
		.section(0xABCD_0001, 0x99, vec![0; 17])
		.build();
	let graph = ModelGraph::load(&bytes).expect("file loads");
	assert_eq!(graph.save().expect("saves"), bytes);
}
