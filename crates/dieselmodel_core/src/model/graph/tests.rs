use dieselmodel_testkit::{Body, IDENTITY, ModelFile, object_prefix};

use super::*;
use crate::model::sections::{Geometry, Material, Opaque, PassthroughGp, Topology};
use crate::model::tags;

const UNKNOWN_TAG: u32 = 0x1234_5678;

fn geometry_body() -> Vec<u8> {
	Body::new()
		.u32(3)
		.u32(1)
		.u32(3)
		.u32(1)
		.f32s(&[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, -4.0, 1.0])
		.u64(0x55)
		.raw(&[9, 9])
		.build()
}

fn topology_body() -> Vec<u8> {
	Body::new().u32(0).u32(3).u16(0).u16(1).u16(2).u32(0).u64(0x66).build()
}

fn model_body(passthrough: u32) -> Vec<u8> {
	object_prefix(0x77, IDENTITY, 0)
		.u32(3)
		.u32(passthrough)
		.u32(0)
		.u32(1)
		.u32(0)
		.u32(1)
		.u32(0)
		.u32(3)
		.u32(0)
		.u32(0)
		.u32(0)
		.u32(0)
		.f32s(&[0.0; 7])
		.u32(6)
		.u32(0)
		.build()
}

fn sample(file: ModelFile) -> Vec<u8> {
	file.section(tags::MODEL, 0x40, model_body(0x30))
		.section(tags::GEOMETRY, 0x10, geometry_body())
		.section(tags::TOPOLOGY, 0x20, topology_body())
		.section(tags::PASSTHROUGH_GP, 0x30, Body::new().u32(0x10).u32(0x20).build())
		.section(UNKNOWN_TAG, 0x50, vec![1, 2, 3, 4, 5])
		.build()
}

#[test]
fn sized_file_round_trips_byte_for_byte() {
	let bytes = sample(ModelFile::sized());
	let graph = ModelGraph::load(&bytes).expect("file loads");

	assert_eq!(graph.len(), 5);
	assert_eq!(graph.style(), PreambleStyle::Sized);
	assert_eq!(graph.ids(), &[0x40, 0x10, 0x20, 0x30, 0x50]);
	assert_eq!(graph.save().expect("file saves"), bytes);
}

#[test]
fn plain_preamble_and_trailing_bytes_survive() {
	let bytes = sample(ModelFile::plain().trailing(&[0xAB, 0xCD]));
	let graph = ModelGraph::load(&bytes).expect("file loads");

	assert_eq!(graph.style(), PreambleStyle::Plain);
	assert_eq!(graph.trailing(), &[0xAB, 0xCD]);
	assert_eq!(graph.save().expect("file saves"), bytes);
}

#[test]
fn unknown_tag_is_kept_opaque() {
	let graph = ModelGraph::load(&sample(ModelFile::sized())).expect("file loads");
	let section = graph.get(0x50).expect("opaque section");
	assert_eq!(section.kind(), "opaque");
	assert_eq!(section.tag(), UNKNOWN_TAG);
	let opaque = section.as_any().downcast_ref::<Opaque>().expect("opaque type");
	assert_eq!(opaque.bytes, vec![1, 2, 3, 4, 5]);
}

#[test]
fn forward_reference_resolves_after_load() {
	let graph = ModelGraph::load(&sample(ModelFile::sized())).expect("file loads");
	let model = graph.require::<Model>(0x40).expect("model");
	let link = graph.resolve::<PassthroughGp>(model.as_full().expect("full").passthrough).expect("passthrough resolves");
	let geometry = graph.resolve::<Geometry>(link.geometry).expect("geometry resolves");
	assert_eq!(geometry.vertex_count(), 3);
	assert_eq!(geometry.tail, vec![9, 9]);
	assert!(graph.resolve::<Topology>(link.topology).is_some());
}

#[test]
fn dangling_reference_loads_and_keeps_raw_id() {
	let bytes = ModelFile::sized().section(tags::MODEL, 0x40, model_body(0xDEAD)).build();
	let graph = ModelGraph::load(&bytes).expect("dangling reference is not fatal");

	let full = graph.require::<Model>(0x40).expect("model").as_full().expect("full");
	assert!(full.passthrough.is_dangling());
	assert!(graph.resolve::<PassthroughGp>(full.passthrough).is_none());
	assert_eq!(graph.save().expect("file saves"), bytes);
}

#[test]
fn mistyped_reference_resolves_to_none() {
	let graph = ModelGraph::load(&sample(ModelFile::sized())).expect("file loads");
	let link = graph.require::<PassthroughGp>(0x30).expect("passthrough");
	assert!(graph.resolve::<Material>(link.geometry).is_none());
	assert!(matches!(
		graph.require::<Material>(0x10),
		Err(ModelError::SectionKindMismatch {
			id: 0x10,
			expected: "material",
			got: "geometry"
		})
	));
}

#[test]
fn duplicate_id_is_rejected() {
	let bytes = ModelFile::sized()
		.section(tags::MATERIAL, 0x10, Body::new().u64(1).build())
		.section(tags::MATERIAL, 0x10, Body::new().u64(2).build())
		.build();
	let err = ModelGraph::load(&bytes).expect_err("duplicate ids");
	assert!(matches!(err, ModelError::DuplicateSectionId { id: 0x10, at: 32 }));
}

#[test]
fn section_past_end_is_rejected() {
	let mut bytes = ModelFile::plain().section(tags::MATERIAL, 0x10, Body::new().u64(1).build()).build();
	bytes.truncate(bytes.len() - 3);
	let err = ModelGraph::load(&bytes).expect_err("truncated body");
	assert!(matches!(err, ModelError::SectionOutOfRange { id: 0x10, size: 8, rem: 5, .. }));
}

#[test]
fn malformed_known_section_names_id_and_kind() {
	let bytes = ModelFile::sized().section(tags::GEOMETRY, 0x10, Body::new().u32(2).u32(1).u32(3).u32(1).f32s(&[1.0; 3]).build()).build();
	let err = ModelGraph::load(&bytes).expect_err("channel data cut short");
	match err {
		ModelError::MalformedSection { id, kind, source } => {
			assert_eq!((id, kind), (0x10, "geometry"));
			assert!(matches!(*source, ModelError::UnexpectedEof { need: 24, rem: 12, .. }));
		}
		other => panic!("unexpected error {other:?}"),
	}
}

#[test]
fn packed_channel_formats_round_trip() {
	let body = Body::new().u32(1).u32(1).u32(7).u32(15).raw(&[1, 2, 3, 4, 5, 6, 7, 8]).u64(0x99).build();
	let bytes = ModelFile::sized().section(tags::GEOMETRY, 0x10, body).build();

	let graph = ModelGraph::load(&bytes).expect("format 7 decodes");
	let geometry = graph.require::<Geometry>(0x10).expect("typed geometry");
	assert_eq!(geometry.vertex_count(), 1);
	assert_eq!(geometry.channels()[0].format, 7);
	assert_eq!(geometry.channels()[0].vertex_count(), 1);
	assert_eq!(geometry.hashname, HashName(0x99));
	assert_eq!(graph.save().expect("save"), bytes);
}

#[test]
fn unknown_component_format_keeps_body_opaque() {
	let body = Body::new().u32(1).u32(1).u32(9).u32(1).raw(&[0xAB; 12]).u64(0x99).build();
	let bytes = ModelFile::plain().section(tags::GEOMETRY, 0x10, body.clone()).build();

	let graph = ModelGraph::load(&bytes).expect("unknown format does not fail the load");
	assert!(graph.get_as::<Geometry>(0x10).is_none());
	let opaque = graph.get_as::<Opaque>(0x10).expect("kept opaque");
	assert_eq!(opaque.tag(), tags::GEOMETRY);
	assert_eq!(opaque.bytes, body);
	assert_eq!(graph.save().expect("save"), bytes);
}

#[test]
fn removed_target_resolves_to_none_and_id_is_reusable() {
	let mut graph = ModelGraph::load(&sample(ModelFile::sized())).expect("file loads");
	assert!(graph.remove(0x10).is_some());
	assert!(!graph.contains(0x10));

	let link = graph.require::<PassthroughGp>(0x30).expect("passthrough");
	assert!(graph.resolve::<Geometry>(link.geometry).is_none());

	graph
		.insert_with_id(0x10, Box::new(Material::new("replacement")))
		.expect("freed id is reusable");
	assert!(matches!(
		graph.insert_with_id(0x10, Box::new(Material::new("again"))),
		Err(ModelError::IdInUse { id: 0x10 })
	));
}

#[test]
fn allocate_id_probes_past_collisions() {
	let mut graph = ModelGraph::new();
	let first = graph.insert("cube", Material::new("cube")).expect("insert");
	assert_eq!(first, HashName::of("cube").low32());

	let second = graph.insert("cube", Material::new("cube")).expect("insert");
	assert_ne!(second, first);
	assert_eq!(second, first.wrapping_add(1).max(1));
	assert_eq!(graph.ids(), &[first, second]);
}

#[test]
fn new_graph_saves_loadable_file() {
	let mut graph = ModelGraph::new();
	let material = graph.insert("mat", Material::new("mat")).expect("insert");
	let bytes = graph.save().expect("file saves");

	let loaded = ModelGraph::load(&bytes).expect("file loads");
	assert_eq!(loaded.style(), PreambleStyle::Sized);
	assert_eq!(loaded.require::<Material>(material).expect("material").hashname, HashName::of("mat"));
	assert_eq!(loaded.save().expect("file saves"), bytes);
}

#[test]
fn find_model_matches_hashname() {
	let graph = ModelGraph::load(&sample(ModelFile::sized())).expect("file loads");
	assert_eq!(graph.find_model(HashName(0x77)), Some(0x40));
	assert_eq!(graph.find_node(HashName(0x77)), Some(0x40));
	assert_eq!(graph.find_model(HashName(0x78)), None);
}

#[test]
fn summaries_report_encoded_sizes() {
	let graph = ModelGraph::load(&sample(ModelFile::sized())).expect("file loads");
	let rows = graph.summaries().expect("summaries");
	let opaque = rows.iter().find(|row| row.id == 0x50).expect("opaque row");
	assert_eq!((opaque.kind, opaque.size), ("opaque", 5));
	assert_eq!(rows[0].kind, "model");
	assert!(rows.iter().all(|row| row.tag != 0));
}
