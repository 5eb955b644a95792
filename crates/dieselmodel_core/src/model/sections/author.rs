use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::{HashName, Result, Section, SectionHeader, TypedSection, tags};

/// Exporter provenance: who wrote the file and from what source.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
	/// Author name idstring.
	pub hashname: HashName,
	/// Contact address bytes, without terminator.
	pub email: Vec<u8>,
	/// Source file path bytes, without terminator.
	pub source_file: Vec<u8>,
	/// Unidentified trailing word.
	pub unknown: u32,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl Author {
	/// Record for a newly written file.
	pub fn new(name: &str, email: &str, source_file: &str) -> Self {
		Self {
			hashname: HashName::of(name),
			email: email.as_bytes().to_vec(),
			source_file: source_file.as_bytes().to_vec(),
			unknown: 0,
			tail: Vec::new(),
		}
	}

	/// Email rendered lossily as text.
	pub fn email_text(&self) -> String {
		String::from_utf8_lossy(&self.email).into_owned()
	}

	/// Source file rendered lossily as text.
	pub fn source_file_text(&self) -> String {
		String::from_utf8_lossy(&self.source_file).into_owned()
	}
}

impl TypedSection for Author {
	const TAG: u32 = tags::AUTHOR;
	const KIND: &'static str = "author";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		Ok(Self {
			hashname: HashName(cursor.read_u64()?),
			email: cursor.read_cstring_bytes()?.to_vec(),
			source_file: cursor.read_cstring_bytes()?.to_vec(),
			unknown: cursor.read_u32()?,
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for Author {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_u64(self.hashname.0);
		out.write_cstring_bytes(&self.email);
		out.write_cstring_bytes(&self.source_file);
		out.write_u32(self.unknown);
		out.write_bytes(&self.tail);
		Ok(())
	}
}
