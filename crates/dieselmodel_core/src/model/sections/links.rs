use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::{DanglingRef, Result, Section, SectionHeader, SectionLookup, SectionRef, TypedSection, tags};

/// Pairs a [`crate::model::sections::Geometry`] with a [`crate::model::sections::Topology`].
#[derive(Debug, Clone, PartialEq)]
pub struct PassthroughGp {
	/// Vertex buffer.
	pub geometry: SectionRef,
	/// Index buffer.
	pub topology: SectionRef,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl PassthroughGp {
	/// Link between two existing sections.
	pub fn new(geometry: u32, topology: u32) -> Self {
		Self {
			geometry: SectionRef::to(geometry),
			topology: SectionRef::to(topology),
			tail: Vec::new(),
		}
	}
}

impl TypedSection for PassthroughGp {
	const TAG: u32 = tags::PASSTHROUGH_GP;
	const KIND: &'static str = "passthrough_gp";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		Ok(Self {
			geometry: SectionRef::unresolved(cursor.read_u32()?),
			topology: SectionRef::unresolved(cursor.read_u32()?),
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for PassthroughGp {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_u32(self.geometry.raw());
		out.write_u32(self.topology.raw());
		out.write_bytes(&self.tail);
		Ok(())
	}

	fn resolve_refs(&mut self, lookup: &SectionLookup) -> Vec<DanglingRef> {
		let mut dangling = Vec::new();
		dangling.extend(DanglingRef::check("geometry", &mut self.geometry, lookup, &[tags::GEOMETRY]));
		dangling.extend(DanglingRef::check("topology", &mut self.topology, lookup, &[tags::TOPOLOGY]));
		dangling
	}
}

/// Index-buffer wrapper around a [`crate::model::sections::Topology`].
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyIp {
	/// Wrapped index buffer.
	pub topology: SectionRef,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl TopologyIp {
	/// Wrapper for an existing topology.
	pub fn new(topology: u32) -> Self {
		Self {
			topology: SectionRef::to(topology),
			tail: Vec::new(),
		}
	}
}

impl TypedSection for TopologyIp {
	const TAG: u32 = tags::TOPOLOGY_IP;
	const KIND: &'static str = "topology_ip";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		Ok(Self {
			topology: SectionRef::unresolved(cursor.read_u32()?),
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for TopologyIp {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_u32(self.topology.raw());
		out.write_bytes(&self.tail);
		Ok(())
	}

	fn resolve_refs(&mut self, lookup: &SectionLookup) -> Vec<DanglingRef> {
		DanglingRef::check("topology", &mut self.topology, lookup, &[tags::TOPOLOGY]).into_iter().collect()
	}
}
