use glam::Vec3;

use crate::model::{ModelError, Result};

/// Simple bounded little-endian cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(ModelError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Consume and return every unread byte.
	pub fn read_rest(&mut self) -> &'a [u8] {
		let start = self.pos.min(self.bytes.len());
		self.pos = self.bytes.len();
		&self.bytes[start..]
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f32`, preserving the exact bit pattern.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Read three consecutive `f32` values.
	pub fn read_vec3(&mut self) -> Result<Vec3> {
		Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
	}

	/// Read `N` consecutive `f32` values.
	pub fn read_f32s<const N: usize>(&mut self) -> Result<[f32; N]> {
		let mut out = [0.0_f32; N];
		for slot in &mut out {
			*slot = self.read_f32()?;
		}
		Ok(out)
	}

	/// Read a `u32` element count and check that `count * stride` bytes remain.
	pub fn read_count(&mut self, what: &'static str, stride: usize) -> Result<u32> {
		let count = self.read_u32()?;
		let need = (count as usize).checked_mul(stride);
		if need.is_none_or(|need| need > self.remaining()) {
			return Err(ModelError::CountOutOfRange {
				what,
				count,
				rem: self.remaining(),
			});
		}
		Ok(count)
	}

	/// Read a zero-terminated byte string without the terminator.
	pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
		let start = self.pos;
		let rem = &self.bytes[self.pos..];
		let Some(rel_end) = rem.iter().position(|byte| *byte == 0) else {
			return Err(ModelError::UnexpectedEof {
				at: self.pos,
				need: 1,
				rem: self.remaining(),
			});
		};

		let end = start + rel_end;
		self.pos = end + 1;
		Ok(&self.bytes[start..end])
	}
}

/// Growable little-endian output buffer mirroring [`Cursor`].
#[derive(Debug, Default)]
pub struct Writer {
	buf: Vec<u8>,
}

impl Writer {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bytes written so far.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Whether nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Finish writing and return the buffer.
	pub fn into_inner(self) -> Vec<u8> {
		self.buf
	}

	/// Append raw bytes.
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.buf.extend_from_slice(bytes);
	}

	/// Append a little-endian `u16`.
	pub fn write_u16(&mut self, value: u16) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `u32`.
	pub fn write_u32(&mut self, value: u32) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `i32`.
	pub fn write_i32(&mut self, value: i32) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `u64`.
	pub fn write_u64(&mut self, value: u64) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	/// Append a little-endian `f32`.
	pub fn write_f32(&mut self, value: f32) {
		self.buf.extend_from_slice(&value.to_le_bytes());
	}

	/// Append three `f32` values.
	pub fn write_vec3(&mut self, value: Vec3) {
		self.write_f32(value.x);
		self.write_f32(value.y);
		self.write_f32(value.z);
	}

	/// Append every `f32` in `values`.
	pub fn write_f32s(&mut self, values: &[f32]) {
		for item in values {
			self.write_f32(*item);
		}
	}

	/// Append a length as `u32`, failing when it does not fit.
	pub fn write_len(&mut self, what: &'static str, len: usize) -> Result<()> {
		let len = u32::try_from(len).map_err(|_| ModelError::LengthOverflow { what, len })?;
		self.write_u32(len);
		Ok(())
	}

	/// Append bytes followed by a zero terminator.
	pub fn write_cstring_bytes(&mut self, bytes: &[u8]) {
		self.buf.extend_from_slice(bytes);
		self.buf.push(0);
	}
}
