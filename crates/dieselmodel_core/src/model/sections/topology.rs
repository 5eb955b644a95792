use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::{HashName, ModelError, Result, Section, SectionHeader, TypedSection, tags};

/// Triangle index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
	/// Unidentified leading word.
	pub unknown1: u32,
	/// Vertex indices, three per triangle.
	pub indices: Vec<u16>,
	/// Unidentified byte block following the indices.
	pub extra: Vec<u8>,
	/// Buffer name idstring.
	pub hashname: HashName,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl Topology {
	/// Topology built from triangles; every index must fit in 16 bits.
	pub fn from_triangles(name: &str, triangles: &[[u32; 3]]) -> Result<Self> {
		Ok(Self {
			unknown1: 0,
			indices: pack_indices(triangles)?,
			extra: Vec::new(),
			hashname: HashName::of(name),
			tail: Vec::new(),
		})
	}

	/// Number of whole triangles.
	pub fn triangle_count(&self) -> usize {
		self.indices.len() / 3
	}

	/// Triangle `idx` counted from `base_index`, if all three indices exist.
	pub fn triangle(&self, base_index: usize, idx: usize) -> Option<[u16; 3]> {
		let start = base_index.checked_add(idx.checked_mul(3)?)?;
		let slice = self.indices.get(start..start + 3)?;
		Some([slice[0], slice[1], slice[2]])
	}
}

/// Flatten triangles into 16-bit indices.
pub fn pack_indices(triangles: &[[u32; 3]]) -> Result<Vec<u16>> {
	let mut out = Vec::with_capacity(triangles.len() * 3);
	for index in triangles.iter().flatten() {
		let packed = u16::try_from(*index).map_err(|_| ModelError::IndexOverflow { index: *index })?;
		out.push(packed);
	}
	Ok(out)
}

impl TypedSection for Topology {
	const TAG: u32 = tags::TOPOLOGY;
	const KIND: &'static str = "topology";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		let unknown1 = cursor.read_u32()?;
		let count = cursor.read_count("index", 2)?;
		let mut indices = Vec::with_capacity(count as usize);
		for _ in 0..count {
			indices.push(cursor.read_u16()?);
		}
		let extra_len = cursor.read_count("topology extra byte", 1)?;
		let extra = cursor.read_exact(extra_len as usize)?.to_vec();
		let hashname = HashName(cursor.read_u64()?);

		Ok(Self {
			unknown1,
			indices,
			extra,
			hashname,
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for Topology {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_u32(self.unknown1);
		out.write_len("index list", self.indices.len())?;
		for index in &self.indices {
			out.write_u16(*index);
		}
		out.write_len("topology extra block", self.extra.len())?;
		out.write_bytes(&self.extra);
		out.write_u64(self.hashname.0);
		out.write_bytes(&self.tail);
		Ok(())
	}
}
