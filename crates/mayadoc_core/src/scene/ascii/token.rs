/// Lexical class of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// Command name, flag name, bare word, or node path.
	Identifier,
	/// Double-quoted string with escapes resolved.
	StringLiteral,
	/// Integer or decimal number, optionally signed.
	NumberLiteral,
	/// Any other single character, including the `-` that starts a flag.
	Punctuation,
	/// `;`
	StatementEnd,
}

/// One token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	/// Lexical class.
	pub kind: TokenKind,
	/// Token text; string literals hold their unescaped content.
	pub text: Box<str>,
	/// Absolute byte offset of the first character.
	pub offset: usize,
}

impl Token {
	/// Return the text of identifiers and string literals.
	pub fn word(&self) -> Option<&str> {
		match self.kind {
			TokenKind::Identifier | TokenKind::StringLiteral => Some(&self.text),
			_ => None,
		}
	}

	fn is_punct(&self, ch: char) -> bool {
		self.kind == TokenKind::Punctuation && self.text.len() == ch.len_utf8() && self.text.starts_with(ch)
	}

	pub(crate) fn is_flag_dash(&self) -> bool {
		self.is_punct('-')
	}
}

/// Lazy lexer over the ASCII command stream.
///
/// Whitespace, `//` line comments and `/* */` block comments are skipped. The sequence is finite and
/// can be restarted with [`Tokenizer::reset`].
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
	bytes: &'a [u8],
	start: usize,
	pos: usize,
}

impl<'a> Tokenizer<'a> {
	/// Create a tokenizer, skipping a leading UTF-8 byte order mark.
	pub fn new(bytes: &'a [u8]) -> Self {
		let start = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) { 3 } else { 0 };
		Self { bytes, start, pos: start }
	}

	/// Rewind to the first token.
	pub fn reset(&mut self) {
		self.pos = self.start;
	}

	/// Byte offset of the next unread character.
	pub fn offset(&self) -> usize {
		self.pos
	}

	fn peek(&self, ahead: usize) -> Option<u8> {
		self.bytes.get(self.pos + ahead).copied()
	}

	fn skip_trivia(&mut self) {
		loop {
			match (self.peek(0), self.peek(1)) {
				(Some(byte), _) if byte.is_ascii_whitespace() => self.pos += 1,
				(Some(b'/'), Some(b'/')) => {
					while let Some(byte) = self.peek(0) {
						self.pos += 1;
						if byte == b'\n' {
							break;
						}
					}
				}
				(Some(b'/'), Some(b'*')) => {
					self.pos += 2;
					loop {
						match (self.peek(0), self.peek(1)) {
							(Some(b'*'), Some(b'/')) => {
								self.pos += 2;
								break;
							}
							(Some(_), _) => self.pos += 1,
							(None, _) => break,
						}
					}
				}
				_ => return,
			}
		}
	}

	fn starts_number(&self) -> bool {
		let digit_at = |ahead: usize| self.peek(ahead).is_some_and(|byte| byte.is_ascii_digit());
		let unsigned_at = |ahead: usize| digit_at(ahead) || (self.peek(ahead) == Some(b'.') && digit_at(ahead + 1));
		match self.peek(0) {
			Some(b'-' | b'+') => unsigned_at(1),
			Some(_) => unsigned_at(0),
			None => false,
		}
	}

	fn lex_number(&mut self) {
		if matches!(self.peek(0), Some(b'-' | b'+')) {
			self.pos += 1;
		}
		self.eat_digits();
		if self.peek(0) == Some(b'.') {
			self.pos += 1;
			self.eat_digits();
		}
		if matches!(self.peek(0), Some(b'e' | b'E')) {
			let sign = usize::from(matches!(self.peek(1), Some(b'-' | b'+')));
			if self.peek(1 + sign).is_some_and(|byte| byte.is_ascii_digit()) {
				self.pos += 1 + sign;
				self.eat_digits();
			}
		}
	}

	fn eat_digits(&mut self) {
		while self.peek(0).is_some_and(|byte| byte.is_ascii_digit()) {
			self.pos += 1;
		}
	}

	fn lex_string(&mut self) -> String {
		self.pos += 1;
		let mut out = Vec::new();
		while let Some(byte) = self.peek(0) {
			self.pos += 1;
			match byte {
				b'"' => break,
				b'\\' => {
					let Some(escaped) = self.peek(0) else {
						out.push(b'\\');
						break;
					};
					self.pos += 1;
					match escaped {
						b'"' => out.push(b'"'),
						b'\\' => out.push(b'\\'),
						b'n' => out.push(b'\n'),
						b't' => out.push(b'\t'),
						b'r' => out.push(b'\r'),
						other => out.extend_from_slice(&[b'\\', other]),
					}
				}
				other => out.push(other),
			}
		}
		String::from_utf8_lossy(&out).into_owned()
	}
}

fn is_ident_start(byte: u8) -> bool {
	byte.is_ascii_alphabetic() || matches!(byte, b'_' | b':' | b'|')
}

fn is_ident_continue(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b':' | b'|' | b'.' | b'[' | b']')
}

impl Iterator for Tokenizer<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		self.skip_trivia();
		let offset = self.pos;
		let byte = self.peek(0)?;

		let (kind, text) = if byte == b';' {
			self.pos += 1;
			(TokenKind::StatementEnd, ";".to_owned())
		} else if byte == b'"' {
			(TokenKind::StringLiteral, self.lex_string())
		} else if self.starts_number() {
			self.lex_number();
			(TokenKind::NumberLiteral, String::from_utf8_lossy(&self.bytes[offset..self.pos]).into_owned())
		} else if is_ident_start(byte) {
			while self.peek(0).is_some_and(is_ident_continue) {
				self.pos += 1;
			}
			(TokenKind::Identifier, String::from_utf8_lossy(&self.bytes[offset..self.pos]).into_owned())
		} else {
			self.pos += 1;
			if !byte.is_ascii() {
				while self.peek(0).is_some_and(|next| next & 0xC0 == 0x80) {
					self.pos += 1;
				}
			}
			(TokenKind::Punctuation, String::from_utf8_lossy(&self.bytes[offset..self.pos]).into_owned())
		};

		Some(Token {
			kind,
			text: text.into_boxed_str(),
			offset,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::{TokenKind, Tokenizer};

	fn kinds_and_text(src: &str) -> Vec<(TokenKind, String)> {
		Tokenizer::new(src.as_bytes()).map(|token| (token.kind, token.text.into_string())).collect()
	}

	#[test]
	fn lexes_create_node_statement() {
		assert_eq!(
			kinds_and_text("createNode transform -n \"pCube1\";"),
			vec![
				(TokenKind::Identifier, "createNode".to_owned()),
				(TokenKind::Identifier, "transform".to_owned()),
				(TokenKind::Punctuation, "-".to_owned()),
				(TokenKind::Identifier, "n".to_owned()),
				(TokenKind::StringLiteral, "pCube1".to_owned()),
				(TokenKind::StatementEnd, ";".to_owned()),
			]
		);
	}

	#[test]
	fn semicolon_inside_string_is_not_a_terminator() {
		let tokens = kinds_and_text(r#"setAttr ".notes" -type "string" "a;b \"c;\"";"#);
		let ends = tokens.iter().filter(|(kind, _)| *kind == TokenKind::StatementEnd).count();
		assert_eq!(ends, 1);
		assert_eq!(tokens[5], (TokenKind::StringLiteral, "a;b \"c;\"".to_owned()));
	}

	#[test]
	fn escapes_are_resolved() {
		let tokens = kinds_and_text(r#""tab\there\nnew \\ \q""#);
		assert_eq!(tokens, vec![(TokenKind::StringLiteral, "tab\there\nnew \\ \\q".to_owned())]);
	}

	#[test]
	fn comments_and_whitespace_are_skipped() {
		let src = "//Maya ASCII 2016 scene\n/* block ; comment */\n\trequires maya \"2016\"; // trailing\n";
		assert_eq!(
			kinds_and_text(src),
			vec![
				(TokenKind::Identifier, "requires".to_owned()),
				(TokenKind::Identifier, "maya".to_owned()),
				(TokenKind::StringLiteral, "2016".to_owned()),
				(TokenKind::StatementEnd, ";".to_owned()),
			]
		);
	}

	#[test]
	fn numbers_take_sign_fraction_and_exponent() {
		let tokens = kinds_and_text("-1 .5 +2.25 1e-05 -0.5E3 3e");
		assert_eq!(
			tokens,
			vec![
				(TokenKind::NumberLiteral, "-1".to_owned()),
				(TokenKind::NumberLiteral, ".5".to_owned()),
				(TokenKind::NumberLiteral, "+2.25".to_owned()),
				(TokenKind::NumberLiteral, "1e-05".to_owned()),
				(TokenKind::NumberLiteral, "-0.5E3".to_owned()),
				(TokenKind::NumberLiteral, "3".to_owned()),
				(TokenKind::Identifier, "e".to_owned()),
			]
		);
	}

	#[test]
	fn identifiers_keep_paths_and_indices() {
		let tokens = kinds_and_text("|grp|ns:pCube1.iog[0].og[2] ._x");
		assert_eq!(tokens[0], (TokenKind::Identifier, "|grp|ns:pCube1.iog[0].og[2]".to_owned()));
		assert_eq!(tokens[1], (TokenKind::Punctuation, ".".to_owned()));
		assert_eq!(tokens[2], (TokenKind::Identifier, "_x".to_owned()));
	}

	#[test]
	fn offsets_skip_bom_and_reset_restarts() {
		let src = b"\xEF\xBB\xBFselect -ne :time1;";
		let mut tokens = Tokenizer::new(src);
		let first: Vec<_> = tokens.by_ref().collect();
		assert_eq!(first[0].offset, 3);
		assert_eq!(first[3].text.as_ref(), ":time1");
		assert!(tokens.next().is_none());

		tokens.reset();
		let second: Vec<_> = tokens.collect();
		assert_eq!(first, second);
	}

	#[test]
	fn unterminated_string_and_comment_end_the_stream() {
		let tokens = kinds_and_text("fileInfo \"key\" \"never closed; ");
		assert_eq!(tokens.len(), 3);
		assert_eq!(tokens[2], (TokenKind::StringLiteral, "never closed; ".to_owned()));
		assert!(kinds_and_text("/* open").is_empty());
	}

	#[test]
	fn non_ascii_punctuation_is_one_token() {
		let tokens = kinds_and_text("é;");
		assert_eq!(tokens, vec![(TokenKind::Punctuation, "é".to_owned()), (TokenKind::StatementEnd, ";".to_owned())]);
	}
}
