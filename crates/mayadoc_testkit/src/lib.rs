//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Parse command stdout as one JSON document.
pub fn parse_json_stdout(stdout: &[u8]) -> serde_json::Value {
	serde_json::from_slice(stdout).unwrap_or_else(|err| panic!("stdout is not JSON ({err}): {}", String::from_utf8_lossy(stdout)))
}

/// Chunk header flavor written by [`IffBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
	/// Classic IFF: `FORM`, 32-bit sizes, 2-byte alignment.
	Form,
	/// Maya 32-bit: `FOR4`, 32-bit sizes, 4-byte alignment.
	For4,
	/// Maya 64-bit: `FOR8`, tag padded to 8, 64-bit sizes, 8-byte alignment.
	For8,
}

impl Flavor {
	fn alignment(self) -> usize {
		match self {
			Self::Form => 2,
			Self::For4 => 4,
			Self::For8 => 8,
		}
	}

	fn group_tags(self) -> [&'static [u8; 4]; 2] {
		match self {
			Self::Form => [b"FORM", b"LIST"],
			Self::For4 => [b"FOR4", b"LIS4"],
			Self::For8 => [b"FOR8", b"LIS8"],
		}
	}
}

/// In-memory writer for IFF chunk trees.
///
/// Sizes are patched when a group ends, and every payload is followed by padding to the flavor's
/// alignment, so tests only describe structure. Use [`IffBuilder::raw`] to inject damaged bytes.
#[derive(Debug, Clone)]
pub struct IffBuilder {
	flavor: Flavor,
	little: bool,
	buf: Vec<u8>,
	open: Vec<(usize, usize)>,
}

impl IffBuilder {
	/// Start an empty big-endian container.
	pub fn new(flavor: Flavor) -> Self {
		Self {
			flavor,
			little: false,
			buf: Vec::new(),
			open: Vec::new(),
		}
	}

	/// Write tags and sizes in little-endian order.
	pub fn little_endian(mut self) -> Self {
		self.little = true;
		self
	}

	/// Open a form group with a type id.
	pub fn begin_form(&mut self, type_id: &[u8; 4]) -> &mut Self {
		let tag = self.flavor.group_tags()[0];
		self.begin_group(tag, type_id)
	}

	/// Open a list group with a type id.
	pub fn begin_list(&mut self, type_id: &[u8; 4]) -> &mut Self {
		let tag = self.flavor.group_tags()[1];
		self.begin_group(tag, type_id)
	}

	/// Close the innermost open group, patching its size.
	pub fn end(&mut self) -> &mut Self {
		let Some((size_at, payload_start)) = self.open.pop() else {
			panic!("end() without an open group");
		};
		let len = self.buf.len() - payload_start;
		self.patch_size(size_at, len as u64);
		self.pad();
		self
	}

	/// Append a leaf chunk with its payload and padding.
	pub fn leaf(&mut self, tag: &[u8; 4], payload: &[u8]) -> &mut Self {
		self.header(tag, payload.len() as u64);
		self.buf.extend_from_slice(payload);
		self.pad();
		self
	}

	/// Append a chunk header that declares `len` payload bytes without writing them.
	pub fn header_only(&mut self, tag: &[u8; 4], len: u64) -> &mut Self {
		self.header(tag, len);
		self
	}

	/// Append raw bytes.
	pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Current length of the written bytes.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Return `true` when nothing was written yet.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Close all open groups and return the container bytes.
	pub fn finish(&mut self) -> Vec<u8> {
		while !self.open.is_empty() {
			self.end();
		}
		std::mem::take(&mut self.buf)
	}

	fn begin_group(&mut self, tag: &[u8; 4], type_id: &[u8; 4]) -> &mut Self {
		self.header(tag, 0);
		let size_at = self.buf.len() - self.size_width();
		let payload_start = self.buf.len();
		self.write_tag(type_id);
		self.pad();
		self.open.push((size_at, payload_start));
		self
	}

	fn header(&mut self, tag: &[u8; 4], len: u64) {
		self.write_tag(tag);
		if self.flavor == Flavor::For8 {
			self.buf.extend_from_slice(&[0; 4]);
		}
		let at = self.buf.len();
		self.buf.resize(at + self.size_width(), 0);
		self.patch_size(at, len);
	}

	fn write_tag(&mut self, tag: &[u8; 4]) {
		let mut bytes = *tag;
		if self.little {
			bytes.reverse();
		}
		self.buf.extend_from_slice(&bytes);
	}

	fn size_width(&self) -> usize {
		if self.flavor == Flavor::For8 { 8 } else { 4 }
	}

	fn patch_size(&mut self, at: usize, len: u64) {
		let raw: Vec<u8> = match (self.flavor, self.little) {
			(Flavor::For8, false) => len.to_be_bytes().to_vec(),
			(Flavor::For8, true) => len.to_le_bytes().to_vec(),
			(_, false) => (len as u32).to_be_bytes().to_vec(),
			(_, true) => (len as u32).to_le_bytes().to_vec(),
		};
		self.buf[at..at + raw.len()].copy_from_slice(&raw);
	}

	fn pad(&mut self) {
		let align = self.flavor.alignment();
		let padded = self.buf.len().next_multiple_of(align);
		self.buf.resize(padded, 0);
	}
}

/// Builder for leaf payload bytes.
#[derive(Debug, Clone, Default)]
pub struct Payload {
	little: bool,
	buf: Vec<u8>,
}

impl Payload {
	/// Start a big-endian payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a little-endian payload.
	pub fn little_endian() -> Self {
		Self {
			little: true,
			buf: Vec::new(),
		}
	}

	/// Append a zero-terminated string.
	pub fn cstr(mut self, text: &str) -> Self {
		self.buf.extend_from_slice(text.as_bytes());
		self.buf.push(0);
		self
	}

	/// Append text without a terminator.
	pub fn chars(mut self, text: &str) -> Self {
		self.buf.extend_from_slice(text.as_bytes());
		self
	}

	/// Append one byte.
	pub fn u8(mut self, value: u8) -> Self {
		self.buf.push(value);
		self
	}

	/// Append an `i32`.
	pub fn i32(mut self, value: i32) -> Self {
		let raw = if self.little { value.to_le_bytes() } else { value.to_be_bytes() };
		self.buf.extend_from_slice(&raw);
		self
	}

	/// Append an `f32`.
	pub fn f32(mut self, value: f32) -> Self {
		let raw = if self.little { value.to_le_bytes() } else { value.to_be_bytes() };
		self.buf.extend_from_slice(&raw);
		self
	}

	/// Append an `f64`.
	pub fn f64(mut self, value: f64) -> Self {
		let raw = if self.little { value.to_le_bytes() } else { value.to_be_bytes() };
		self.buf.extend_from_slice(&raw);
		self
	}

	/// Append raw bytes.
	pub fn bytes(mut self, raw: &[u8]) -> Self {
		self.buf.extend_from_slice(raw);
		self
	}

	/// Return the payload bytes.
	pub fn build(self) -> Vec<u8> {
		self.buf
	}
}
