use std::fmt;

use serde::Serialize;

/// 64-bit Diesel idstring: Bob Jenkins' `lookup8` hash of a name, level 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct HashName(pub u64);

impl HashName {
	/// Hash a human-readable name.
	pub fn of(name: &str) -> Self {
		Self(lookup8(name.as_bytes(), 0))
	}

	/// Idstring for an object label.
	///
	/// Labels of exactly sixteen hex digits, the form [`HashName`] displays
	/// as, are taken as the raw hash so exported names map back to their
	/// models; every other label is hashed.
	pub fn from_label(label: &str) -> Self {
		let is_hex = label.len() == 16 && label.bytes().all(|byte| byte.is_ascii_hexdigit());
		match u64::from_str_radix(label, 16) {
			Ok(raw) if is_hex => Self(raw),
			_ => Self::of(label),
		}
	}

	/// Low 32 bits, used to seed section ids derived from names.
	pub fn low32(self) -> u32 {
		self.0 as u32
	}
}

impl fmt::Display for HashName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:016x}", self.0)
	}
}

fn mix(a: &mut u64, b: &mut u64, c: &mut u64) {
	macro_rules! step {
		($x:ident, $y:ident, $z:ident, >> $s:expr) => {
			*$x = $x.wrapping_sub(*$y).wrapping_sub(*$z);
			*$x ^= *$z >> $s;
		};
		($x:ident, $y:ident, $z:ident, << $s:expr) => {
			*$x = $x.wrapping_sub(*$y).wrapping_sub(*$z);
			*$x ^= *$z << $s;
		};
	}

	step!(a, b, c, >> 43);
	step!(b, c, a, << 9);
	step!(c, a, b, >> 8);
	step!(a, b, c, >> 38);
	step!(b, c, a, << 23);
	step!(c, a, b, >> 5);
	step!(a, b, c, >> 35);
	step!(b, c, a, << 49);
	step!(c, a, b, >> 11);
	step!(a, b, c, >> 12);
	step!(b, c, a, << 18);
	step!(c, a, b, >> 22);
}

fn le_word(bytes: &[u8]) -> u64 {
	let mut buf = [0_u8; 8];
	buf.copy_from_slice(&bytes[..8]);
	u64::from_le_bytes(buf)
}

fn lookup8(key: &[u8], level: u64) -> u64 {
	let mut a = level;
	let mut b = level;
	let mut c = 0x9e37_79b9_7f4a_7c13_u64;

	let mut chunks = key.chunks_exact(24);
	for chunk in &mut chunks {
		a = a.wrapping_add(le_word(&chunk[0..8]));
		b = b.wrapping_add(le_word(&chunk[8..16]));
		c = c.wrapping_add(le_word(&chunk[16..24]));
		mix(&mut a, &mut b, &mut c);
	}

	// The lowest byte of `c` is reserved for the length.
	c = c.wrapping_add(key.len() as u64);
	for (idx, byte) in chunks.remainder().iter().enumerate() {
		let byte = u64::from(*byte);
		match idx {
			0..=7 => a = a.wrapping_add(byte << (8 * idx)),
			8..=15 => b = b.wrapping_add(byte << (8 * (idx - 8))),
			_ => c = c.wrapping_add(byte << (8 * (idx - 15))),
		}
	}
	mix(&mut a, &mut b, &mut c);

	c
}
