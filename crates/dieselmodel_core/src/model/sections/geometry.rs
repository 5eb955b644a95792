use glam::{Vec2, Vec3};

use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::{HashName, ModelError, Result, Section, SectionHeader, TypedSection, tags};

/// Well-known channel kinds.
pub mod kind {
	/// Vertex position, `vec3`.
	pub const POSITION: u32 = 1;
	/// Vertex normal.
	pub const NORMAL: u32 = 2;
	/// Primary texture coordinates, `vec2`.
	pub const UV: u32 = 7;
	/// Pattern texture coordinates, `vec2`.
	pub const PATTERN_UV: u32 = 8;
}

/// Bytes per vertex for a channel component format.
pub fn stride(format: u32) -> Option<usize> {
	match format {
		1..=4 => Some(4 * format as usize),
		5 | 6 => Some(4),
		7 => Some(8),
		8 => Some(12),
		_ => None,
	}
}

fn is_float_format(format: u32) -> bool {
	(1..=4).contains(&format)
}

/// Decoded per-vertex values of one channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
	/// Formats 1..=4: `format` floats per vertex, flattened.
	Floats(Vec<f32>),
	/// Packed formats 5..=8, kept verbatim.
	Packed(Vec<u8>),
}

/// One vertex attribute stream.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryChannel {
	/// Component format code.
	pub format: u32,
	/// Attribute kind, see [`kind`].
	pub kind: u32,
	/// Values for every vertex.
	pub data: ChannelData,
}

impl GeometryChannel {
	/// `vec3` float channel.
	pub fn vec3(kind: u32, values: &[Vec3]) -> Self {
		Self {
			format: 3,
			kind,
			data: ChannelData::Floats(values.iter().flat_map(|item| item.to_array()).collect()),
		}
	}

	/// `vec2` float channel.
	pub fn vec2(kind: u32, values: &[Vec2]) -> Self {
		Self {
			format: 2,
			kind,
			data: ChannelData::Floats(values.iter().flat_map(|item| item.to_array()).collect()),
		}
	}

	/// Number of vertices the data covers.
	pub fn vertex_count(&self) -> usize {
		match &self.data {
			ChannelData::Floats(values) => values.len() / (self.format as usize).max(1),
			ChannelData::Packed(bytes) => bytes.len() / stride(self.format).unwrap_or(4),
		}
	}

	/// Values as `vec3`, if the channel has format 3.
	pub fn as_vec3(&self) -> Option<Vec<Vec3>> {
		match (&self.data, self.format) {
			(ChannelData::Floats(values), 3) => Some(values.chunks_exact(3).map(Vec3::from_slice).collect()),
			_ => None,
		}
	}

	/// Values as `vec2`, if the channel has format 2.
	pub fn as_vec2(&self) -> Option<Vec<Vec2>> {
		match (&self.data, self.format) {
			(ChannelData::Floats(values), 2) => Some(values.chunks_exact(2).map(Vec2::from_slice).collect()),
			_ => None,
		}
	}
}

/// Vertex buffer section.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
	vertex_count: u32,
	channels: Vec<GeometryChannel>,
	/// Buffer name idstring.
	pub hashname: HashName,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl Geometry {
	/// Geometry with positions and optional uvs.
	pub fn new(name: &str, positions: &[Vec3], uvs: Option<&[Vec2]>) -> Result<Self> {
		let mut geometry = Self {
			vertex_count: 0,
			channels: Vec::new(),
			hashname: HashName::of(name),
			tail: Vec::new(),
		};
		geometry.rebuild(positions, uvs)?;
		Ok(geometry)
	}

	/// Vertices in every channel.
	pub fn vertex_count(&self) -> usize {
		self.vertex_count as usize
	}

	/// Channels in stored order.
	pub fn channels(&self) -> &[GeometryChannel] {
		&self.channels
	}

	/// First channel of `kind`.
	pub fn channel(&self, kind: u32) -> Option<&GeometryChannel> {
		self.channels.iter().find(|item| item.kind == kind)
	}

	/// Positions, or an empty list when the geometry has no `vec3` position channel.
	pub fn positions(&self) -> Vec<Vec3> {
		self.channel(kind::POSITION).and_then(GeometryChannel::as_vec3).unwrap_or_default()
	}

	/// Replace every channel with positions and optional uvs.
	pub fn rebuild(&mut self, positions: &[Vec3], uvs: Option<&[Vec2]>) -> Result<()> {
		let vertex_count = u32::try_from(positions.len()).map_err(|_| ModelError::LengthOverflow {
			what: "vertex list",
			len: positions.len(),
		})?;

		let mut channels = vec![GeometryChannel::vec3(kind::POSITION, positions)];
		if let Some(uvs) = uvs {
			if uvs.len() != positions.len() {
				return Err(ModelError::ChannelLengthMismatch {
					kind: kind::UV,
					expected: positions.len(),
					got: uvs.len(),
				});
			}
			channels.push(GeometryChannel::vec2(kind::UV, uvs));
		}

		self.vertex_count = vertex_count;
		self.channels = channels;
		Ok(())
	}

	/// Replace the channel of the same kind, or append it.
	pub fn set_channel(&mut self, channel: GeometryChannel) -> Result<()> {
		if channel.vertex_count() != self.vertex_count() {
			return Err(ModelError::ChannelLengthMismatch {
				kind: channel.kind,
				expected: self.vertex_count(),
				got: channel.vertex_count(),
			});
		}

		match self.channels.iter_mut().find(|item| item.kind == channel.kind) {
			Some(slot) => *slot = channel,
			None => self.channels.push(channel),
		}
		Ok(())
	}
}

impl TypedSection for Geometry {
	const TAG: u32 = tags::GEOMETRY;
	const KIND: &'static str = "geometry";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		let vertex_count = cursor.read_u32()?;
		let channel_count = cursor.read_count("geometry channel", 8)?;

		let mut layout = Vec::with_capacity(channel_count as usize);
		for _ in 0..channel_count {
			let format = cursor.read_u32()?;
			let kind = cursor.read_u32()?;
			let stride = stride(format).ok_or(ModelError::UnknownComponentFormat { format, kind })?;
			layout.push((format, kind, stride));
		}

		let mut channels = Vec::with_capacity(layout.len());
		for (format, kind, stride) in layout {
			let len = (vertex_count as usize).checked_mul(stride).ok_or(ModelError::CountOutOfRange {
				what: "vertex",
				count: vertex_count,
				rem: cursor.remaining(),
			})?;
			let raw = cursor.read_exact(len)?;
			let data = if !is_float_format(format) {
				ChannelData::Packed(raw.to_vec())
			} else {
				let mut floats = Cursor::new(raw);
				let mut values = Vec::with_capacity(len / 4);
				while floats.remaining() > 0 {
					values.push(floats.read_f32()?);
				}
				ChannelData::Floats(values)
			};
			channels.push(GeometryChannel { format, kind, data });
		}

		let hashname = HashName(cursor.read_u64()?);
		Ok(Self {
			vertex_count,
			channels,
			hashname,
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for Geometry {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_u32(self.vertex_count);
		out.write_len("geometry channel list", self.channels.len())?;
		for channel in &self.channels {
			out.write_u32(channel.format);
			out.write_u32(channel.kind);
		}
		for channel in &self.channels {
			match &channel.data {
				ChannelData::Floats(values) => out.write_f32s(values),
				ChannelData::Packed(bytes) => out.write_bytes(bytes),
			}
		}
		out.write_u64(self.hashname.0);
		out.write_bytes(&self.tail);
		Ok(())
	}
}
