use crate::scene::{Endianness, MayaError, Result};

/// Bounded cursor over an immutable byte slice.
///
/// Scalar reads use the cursor's byte-order mode, which the walker sets from the container magic.
/// Errors report absolute offsets: a cursor built with [`Cursor::at`] over a payload slice adds the
/// slice's position in the file to every offset it reports.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	base: usize,
	endianness: Endianness,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0 of a whole buffer.
	pub fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
		Self::at(bytes, 0, endianness)
	}

	/// Create a cursor over a sub-slice that starts at absolute offset `base`.
	pub fn at(bytes: &'a [u8], base: usize, endianness: Endianness) -> Self {
		Self {
			bytes,
			pos: 0,
			base,
			endianness,
		}
	}

	/// Return current position relative to the start of the slice.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return current absolute byte offset.
	pub fn offset(&self) -> usize {
		self.base + self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return the active byte order.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Move to a position relative to the start of the slice.
	pub fn seek(&mut self, pos: usize) -> Result<()> {
		if pos > self.bytes.len() {
			return Err(MayaError::OutOfBounds {
				at: self.base + pos,
				need: 0,
				rem: 0,
			});
		}
		self.pos = pos;
		Ok(())
	}

	/// Advance by `n` bytes without reading them.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_bytes(n)?;
		Ok(())
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(MayaError::OutOfBounds {
				at: self.offset(),
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read all remaining bytes.
	pub fn read_rest(&mut self) -> &'a [u8] {
		let start = self.pos.min(self.bytes.len());
		self.pos = self.bytes.len();
		&self.bytes[start..]
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_bytes(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read a `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read a `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read a `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		let buf = self.read_array()?;
		Ok(match self.endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an `i16`.
	pub fn read_i16(&mut self) -> Result<i16> {
		Ok(self.read_u16()? as i16)
	}

	/// Read an `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(self.read_u32()? as i32)
	}

	/// Read an `i64`.
	pub fn read_i64(&mut self) -> Result<i64> {
		Ok(self.read_u64()? as i64)
	}

	/// Read an IEEE-754 `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_bits(self.read_u32()?))
	}

	/// Read an IEEE-754 `f64`.
	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_bits(self.read_u64()?))
	}

	/// Advance to the next absolute offset that is a multiple of `alignment`.
	pub fn align_to(&mut self, alignment: usize) -> Result<()> {
		let skip = padding_for(self.offset(), alignment);
		self.skip(skip)
	}

	/// Read a zero-terminated byte string without the terminator.
	pub fn read_cstring(&mut self) -> Result<&'a [u8]> {
		let rem = self.bytes.get(self.pos..).unwrap_or(&[]);
		let Some(len) = rem.iter().position(|byte| *byte == 0) else {
			return Err(MayaError::OutOfBounds {
				at: self.offset(),
				need: rem.len() + 1,
				rem: rem.len(),
			});
		};

		let out = self.read_bytes(len)?;
		self.pos += 1;
		Ok(out)
	}

	/// Read a `u32` length-prefixed byte string.
	pub fn read_pstring(&mut self) -> Result<&'a [u8]> {
		let at = self.offset();
		let len = self.read_u32()?;
		let len = usize::try_from(len).map_err(|_| MayaError::OutOfBounds {
			at,
			need: usize::MAX,
			rem: self.remaining(),
		})?;
		self.read_bytes(len)
	}
}

/// Return how many bytes must follow `offset` to reach a multiple of `alignment`.
pub fn padding_for(offset: usize, alignment: usize) -> usize {
	if alignment <= 1 {
		return 0;
	}
	let rem = offset % alignment;
	if rem == 0 { 0 } else { alignment - rem }
}
