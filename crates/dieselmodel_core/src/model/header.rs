use serde::Serialize;

use crate::model::bytes::{Cursor, Writer};
use crate::model::{ModelError, Result};

/// Marker stored in the leading count slot of sized-style files.
const SIZED_MARKER: i32 = -1;

/// How the file preamble records the section count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreambleStyle {
	/// Leading `i32` section count only.
	Plain,
	/// `-1` marker, total file size, then the section count.
	#[default]
	Sized,
}

/// Parsed file preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
	/// Encoding used by the source file.
	pub style: PreambleStyle,
	/// Number of sections in the table.
	pub section_count: u32,
	/// Total file size recorded by sized-style files.
	pub declared_size: Option<u32>,
}

impl FileHeader {
	/// Parse the preamble at the start of `cursor`.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let first = cursor.read_i32()?;
		if first == SIZED_MARKER {
			let declared_size = cursor.read_u32()?;
			let count = cursor.read_i32()?;
			let section_count = u32::try_from(count).map_err(|_| ModelError::InvalidSectionCount { count })?;
			return Ok(Self {
				style: PreambleStyle::Sized,
				section_count,
				declared_size: Some(declared_size),
			});
		}

		let section_count = u32::try_from(first).map_err(|_| ModelError::InvalidSectionCount { count: first })?;
		Ok(Self {
			style: PreambleStyle::Plain,
			section_count,
			declared_size: None,
		})
	}

	/// Encoded preamble length for `style`.
	pub fn encoded_len(style: PreambleStyle) -> usize {
		match style {
			PreambleStyle::Plain => 4,
			PreambleStyle::Sized => 12,
		}
	}

	/// Write a preamble for `section_count` sections in a file of `total_size` bytes.
	pub fn write(writer: &mut Writer, style: PreambleStyle, section_count: usize, total_size: usize) -> Result<()> {
		let count = i32::try_from(section_count).map_err(|_| ModelError::LengthOverflow {
			what: "section count",
			len: section_count,
		})?;
		match style {
			PreambleStyle::Plain => writer.write_i32(count),
			PreambleStyle::Sized => {
				writer.write_i32(SIZED_MARKER);
				writer.write_len("file", total_size)?;
				writer.write_i32(count);
			}
		}
		Ok(())
	}
}

/// One entry of the section table: `(tag, id, size)` on disk plus its file offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
	/// Unique section key within one file.
	pub id: u32,
	/// Variant selector.
	pub tag: u32,
	/// Body length in bytes, excluding this header.
	pub size: u32,
	/// File offset of the header itself.
	pub offset: usize,
}

impl SectionHeader {
	/// Encoded header length.
	pub const LEN: usize = 12;

	/// Parse a section header, recording the cursor position as its offset.
	pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
		let offset = cursor.pos();
		let tag = cursor.read_u32()?;
		let id = cursor.read_u32()?;
		let size = cursor.read_u32()?;
		Ok(Self { id, tag, size, offset })
	}

	/// File offset of the first body byte.
	pub fn body_offset(&self) -> usize {
		self.offset + Self::LEN
	}

	/// Write `(tag, id, size)`.
	pub fn write(writer: &mut Writer, tag: u32, id: u32, size: usize) -> Result<()> {
		writer.write_u32(tag);
		writer.write_u32(id);
		writer.write_len("section body", size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_plain_and_sized_preambles() {
		let plain = 3_i32.to_le_bytes();
		let header = FileHeader::parse(&mut Cursor::new(&plain)).expect("plain parses");
		assert_eq!(header.style, PreambleStyle::Plain);
		assert_eq!(header.section_count, 3);
		assert_eq!(header.declared_size, None);

		let mut sized = Vec::new();
		sized.extend_from_slice(&(-1_i32).to_le_bytes());
		sized.extend_from_slice(&96_u32.to_le_bytes());
		sized.extend_from_slice(&2_i32.to_le_bytes());
		let header = FileHeader::parse(&mut Cursor::new(&sized)).expect("sized parses");
		assert_eq!(header.style, PreambleStyle::Sized);
		assert_eq!(header.section_count, 2);
		assert_eq!(header.declared_size, Some(96));
	}

	#[test]
	fn rejects_negative_count() {
		let bytes = (-7_i32).to_le_bytes();
		let err = FileHeader::parse(&mut Cursor::new(&bytes)).expect_err("negative count fails");
		assert!(matches!(err, ModelError::InvalidSectionCount { count: -7 }));
	}

	#[test]
	fn section_header_records_offset() {
		let mut bytes = vec![0xAA; 4];
		bytes.extend_from_slice(&0x62212D88_u32.to_le_bytes());
		bytes.extend_from_slice(&17_u32.to_le_bytes());
		bytes.extend_from_slice(&40_u32.to_le_bytes());

		let mut cursor = Cursor::new(&bytes);
		cursor.read_exact(4).expect("skip");
		let head = SectionHeader::parse(&mut cursor).expect("header parses");
		assert_eq!(head.tag, 0x62212D88);
		assert_eq!(head.id, 17);
		assert_eq!(head.size, 40);
		assert_eq!(head.offset, 4);
		assert_eq!(head.body_offset(), 16);
	}
}
