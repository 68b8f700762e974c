/// Pack a four-character code into the integer read from a big-endian tag field.
pub const fn fourcc(code: &[u8; 4]) -> u32 {
	u32::from_be_bytes(*code)
}

/// Parse one to four ASCII characters into a tag, padding short codes with spaces.
pub fn parse_tag(text: &str) -> Option<u32> {
	if text.is_empty() || text.len() > 4 || !text.is_ascii() {
		return None;
	}

	let mut out = [b' '; 4];
	out[..text.len()].copy_from_slice(text.as_bytes());
	Some(fourcc(&out))
}

/// Render a tag as printable text, replacing non-graphic bytes with `.`.
pub fn tag_label(tag: u32) -> String {
	let mut out = String::with_capacity(4);
	for byte in tag.to_be_bytes() {
		if byte.is_ascii_graphic() || byte == b' ' {
			out.push(char::from(byte));
		} else {
			out.push('.');
		}
	}
	out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
	use super::{fourcc, parse_tag, tag_label};

	#[test]
	fn short_codes_are_space_padded() {
		assert_eq!(parse_tag("STR"), Some(fourcc(b"STR ")));
		assert_eq!(parse_tag("Maya"), Some(0x4D61_7961));
		assert_eq!(parse_tag(""), None);
		assert_eq!(parse_tag("TOOLONG"), None);
	}

	#[test]
	fn labels_are_printable() {
		assert_eq!(tag_label(fourcc(b"STR ")), "STR");
		assert_eq!(tag_label(0x4100_0142), "A..B");
	}
}
