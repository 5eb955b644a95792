use std::any::Any;

use crate::model::bytes::Writer;
use crate::model::{Result, Section};

/// Section with an unregistered tag, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
	tag: u32,
	/// Entire body.
	pub bytes: Vec<u8>,
}

impl Opaque {
	/// Wrap a raw body.
	pub fn new(tag: u32, bytes: Vec<u8>) -> Self {
		Self { tag, bytes }
	}
}

impl Section for Opaque {
	fn tag(&self) -> u32 {
		self.tag
	}

	fn kind(&self) -> &'static str {
		"opaque"
	}

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_bytes(&self.bytes);
		Ok(())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
