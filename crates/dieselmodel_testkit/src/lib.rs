//! Byte-level fixture builders shared by workspace tests.
//!
//! Builders here write the container layout directly, independent of the
//! codec under test.

use std::path::{Path, PathBuf};

/// Little-endian section body builder.
#[derive(Debug, Default, Clone)]
pub struct Body {
	bytes: Vec<u8>,
}

impl Body {
	/// Empty body.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a `u16`.
	pub fn u16(mut self, value: u16) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a `u32`.
	pub fn u32(mut self, value: u32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a `u64`.
	pub fn u64(mut self, value: u64) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append an `f32`.
	pub fn f32(mut self, value: f32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append several `f32` values.
	pub fn f32s(mut self, values: &[f32]) -> Self {
		for value in values {
			self = self.f32(*value);
		}
		self
	}

	/// Append raw bytes.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	/// Finished bytes.
	pub fn build(self) -> Vec<u8> {
		self.bytes
	}
}

/// Identity transform as stored on disk.
pub const IDENTITY: [f32; 16] = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];

/// Shared node prefix: hashname, no controllers, `transform`, zero position, `parent`.
pub fn object_prefix(hashname: u64, transform: [f32; 16], parent: u32) -> Body {
	Body::new().u64(hashname).u32(0).f32s(&transform).f32s(&[0.0, 0.0, 0.0]).u32(parent)
}

/// Raw section tags used by the fixtures.
pub mod tag {
	/// Scene node.
	pub const OBJECT3D: u32 = 0x0FFC_D100;
	/// Renderable node.
	pub const MODEL: u32 = 0x6221_2D88;
	/// Vertex buffer.
	pub const GEOMETRY: u32 = 0x7AB0_72D3;
	/// Index buffer.
	pub const TOPOLOGY: u32 = 0x4C50_7A13;
	/// Geometry/topology pair.
	pub const PASSTHROUGH_GP: u32 = 0xE3A3_B1CA;
	/// Index-buffer wrapper.
	pub const TOPOLOGY_IP: u32 = 0x03B6_34BD;
	/// Material list.
	pub const MATERIAL_GROUP: u32 = 0x2927_6B1D;
	/// Material.
	pub const MATERIAL: u32 = 0x3C54_609C;
}

/// Section ids written by [`ModelFile::triangle_mesh`], offset by its `base`.
pub mod mesh_ids {
	/// Geometry.
	pub const GEOMETRY: u32 = 0;
	/// Topology.
	pub const TOPOLOGY: u32 = 1;
	/// Topology wrapper.
	pub const TOPOLOGY_IP: u32 = 2;
	/// Passthrough link.
	pub const PASSTHROUGH_GP: u32 = 3;
	/// Material.
	pub const MATERIAL: u32 = 4;
	/// Material group.
	pub const MATERIAL_GROUP: u32 = 5;
	/// Model.
	pub const MODEL: u32 = 6;
}

/// Whole-file builder writing `(tag, id, size)` headers.
#[derive(Debug, Clone)]
pub struct ModelFile {
	sized: bool,
	sections: Vec<(u32, u32, Vec<u8>)>,
	trailing: Vec<u8>,
}

impl ModelFile {
	/// File using the `-1`/size/count preamble.
	pub fn sized() -> Self {
		Self {
			sized: true,
			sections: Vec::new(),
			trailing: Vec::new(),
		}
	}

	/// File using the bare count preamble.
	pub fn plain() -> Self {
		Self {
			sized: false,
			..Self::sized()
		}
	}

	/// Append a section.
	pub fn section(mut self, tag: u32, id: u32, body: Vec<u8>) -> Self {
		self.sections.push((tag, id, body));
		self
	}

	/// Append a complete one-triangle model chain with ids starting at `base`.
	///
	/// Vertices are `(0,0,0)`, `(2,0,0)`, `(0,3,-1)` with uvs; the model is
	/// version 3, stored with zero bounds, and named by `hashname`.
	pub fn triangle_mesh(self, base: u32, hashname: u64) -> Self {
		let geometry = Body::new()
			.u32(3)
			.u32(2)
			.u32(3)
			.u32(1)
			.u32(2)
			.u32(7)
			.f32s(&[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0, -1.0])
			.f32s(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
			.u64(hashname ^ 1)
			.build();
		let topology = Body::new().u32(0).u32(3).u16(0).u16(1).u16(2).u32(0).u64(hashname ^ 2).build();
		let model = object_prefix(hashname, IDENTITY, 0)
			.u32(3)
			.u32(base + mesh_ids::PASSTHROUGH_GP)
			.u32(base + mesh_ids::TOPOLOGY_IP)
			.u32(1)
			.u32(0)
			.u32(1)
			.u32(0)
			.u32(3)
			.u32(0)
			.u32(base + mesh_ids::MATERIAL_GROUP)
			.u32(0)
			.u32(1)
			.f32s(&[0.0; 7])
			.u32(6)
			.u32(0)
			.build();

		self.section(tag::GEOMETRY, base + mesh_ids::GEOMETRY, geometry)
			.section(tag::TOPOLOGY, base + mesh_ids::TOPOLOGY, topology)
			.section(tag::TOPOLOGY_IP, base + mesh_ids::TOPOLOGY_IP, Body::new().u32(base + mesh_ids::TOPOLOGY).build())
			.section(
				tag::PASSTHROUGH_GP,
				base + mesh_ids::PASSTHROUGH_GP,
				Body::new().u32(base + mesh_ids::GEOMETRY).u32(base + mesh_ids::TOPOLOGY).build(),
			)
			.section(tag::MATERIAL, base + mesh_ids::MATERIAL, Body::new().u64(hashname ^ 3).build())
			.section(
				tag::MATERIAL_GROUP,
				base + mesh_ids::MATERIAL_GROUP,
				Body::new().u32(1).u32(base + mesh_ids::MATERIAL).build(),
			)
			.section(tag::MODEL, base + mesh_ids::MODEL, model)
	}

	/// Append bytes after the section table.
	pub fn trailing(mut self, bytes: &[u8]) -> Self {
		self.trailing.extend_from_slice(bytes);
		self
	}

	/// Finished file bytes.
	pub fn build(self) -> Vec<u8> {
		let mut table = Vec::new();
		for (tag, id, body) in &self.sections {
			table.extend_from_slice(&tag.to_le_bytes());
			table.extend_from_slice(&id.to_le_bytes());
			table.extend_from_slice(&(body.len() as u32).to_le_bytes());
			table.extend_from_slice(body);
		}
		table.extend_from_slice(&self.trailing);

		let count = self.sections.len() as i32;
		let mut out = Vec::new();
		if self.sized {
			out.extend_from_slice(&(-1_i32).to_le_bytes());
			out.extend_from_slice(&((table.len() + 12) as u32).to_le_bytes());
		}
		out.extend_from_slice(&count.to_le_bytes());
		out.extend_from_slice(&table);
		out
	}

	/// Write the finished file to `path`.
	pub fn write_to(self, path: &Path) {
		std::fs::write(path, self.build()).expect("fixture file writes");
	}
}

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Fresh scratch directory removed on drop.
pub fn scratch_dir() -> tempfile::TempDir {
	tempfile::tempdir().expect("temp dir creates")
}
