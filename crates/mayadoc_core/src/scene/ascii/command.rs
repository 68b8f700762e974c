use log::{debug, warn};

use crate::scene::ascii::{Token, TokenKind, Tokenizer};
use crate::scene::{SceneEvent, UnsupportedReason, Value, split_plug};

/// Flags that consume the following token, per recognized command.
fn value_flags(command: &str) -> Option<&'static [&'static str]> {
	Some(match command {
		"createNode" => &["n", "name", "p", "parent"],
		"setAttr" => &["k", "keyable", "l", "lock", "cb", "channelBox", "s", "size", "typ", "type", "ca", "caching", "ch", "capacityHint"],
		"connectAttr" => &["l", "lock", "rd", "referenceDest"],
		"requires" => &["nt", "nodeType", "dt", "dataType"],
		"file" => &[
			"rdi",
			"referenceDepthInfo",
			"ns",
			"namespace",
			"rfn",
			"referenceNode",
			"op",
			"options",
			"typ",
			"type",
			"dr",
			"deferReference",
			"shd",
			"sharedNodes",
			"gn",
			"groupName",
		],
		"fileInfo" => &[],
		"currentUnit" => &["l", "linear", "a", "angle", "t", "time"],
		"select" => &[],
		"parent" => &[],
		"namespace" => &["add", "set", "p", "parent"],
		_ => return None,
	})
}

struct Flag {
	name: Box<str>,
	value: Option<Token>,
}

/// Arguments of one statement, split into flags and positional tokens.
struct Args {
	flags: Vec<Flag>,
	positionals: Vec<Token>,
}

impl Args {
	fn parse(tokens: Vec<Token>, takes_value: &[&str]) -> Self {
		let mut flags = Vec::new();
		let mut positionals = Vec::new();
		let mut iter = tokens.into_iter().peekable();

		while let Some(token) = iter.next() {
			let is_flag = token.is_flag_dash() && iter.peek().is_some_and(|next| next.kind == TokenKind::Identifier && next.offset == token.offset + 1);
			if !is_flag {
				positionals.push(token);
				continue;
			}
			let Some(name) = iter.next().map(|next| next.text) else {
				continue;
			};
			let value = if takes_value.contains(&name.as_ref()) { iter.next() } else { None };
			flags.push(Flag { name, value });
		}

		Self { flags, positionals }
	}

	fn has(&self, names: &[&str]) -> bool {
		self.flags.iter().any(|flag| names.contains(&flag.name.as_ref()))
	}

	fn value(&self, names: &[&str]) -> Option<&Token> {
		self.flags.iter().rev().find(|flag| names.contains(&flag.name.as_ref())).and_then(|flag| flag.value.as_ref())
	}

	fn word(&self, names: &[&str]) -> Option<Box<str>> {
		self.value(names).and_then(Token::word).map(Into::into)
	}

	fn words(&self) -> Vec<&str> {
		self.positionals.iter().filter_map(Token::word).collect()
	}
}

type Outcome = std::result::Result<SceneEvent, &'static str>;

/// Statement-at-a-time interpreter for the ASCII command stream.
///
/// Each statement yields exactly one event. Unknown commands and malformed arguments become
/// [`SceneEvent::Unsupported`]; a statement cut off by end of input yields a final `Truncated` one.
#[derive(Debug, Clone)]
pub struct CommandInterpreter<'a> {
	tokens: Tokenizer<'a>,
	current_node: Option<Box<str>>,
}

impl<'a> CommandInterpreter<'a> {
	/// Create an interpreter over a whole `.ma` buffer.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self {
			tokens: Tokenizer::new(bytes),
			current_node: None,
		}
	}

	/// Byte offset of the next unread character.
	pub fn offset(&self) -> usize {
		self.tokens.offset()
	}

	/// Node targeted by relative `setAttr` plugs.
	pub fn current_node(&self) -> Option<&str> {
		self.current_node.as_deref()
	}

	fn interpret(&mut self, command: &str, args: Args) -> Outcome {
		match command {
			"createNode" => self.create_node(&args),
			"setAttr" => self.set_attr(&args),
			"connectAttr" => match args.words().as_slice() {
				[src, dst, ..] => Ok(SceneEvent::connection(src, dst)),
				_ => Err("connectAttr needs a source and a destination plug"),
			},
			"file" => file_reference(&args),
			"requires" => match args.words().as_slice() {
				["maya", version, ..] => Ok(SceneEvent::RequiresMaya { version: (*version).into() }),
				[plugin, version, ..] => Ok(SceneEvent::RequiresPlugin {
					plugin: (*plugin).into(),
					version: (*version).into(),
				}),
				_ => Err("requires needs a name and a version"),
			},
			"fileInfo" => match args.words().as_slice() {
				[key, value] => Ok(SceneEvent::FileInfo {
					key: (*key).into(),
					value: (*value).into(),
				}),
				_ => Err("fileInfo needs a key and a value"),
			},
			"currentUnit" => {
				let event = SceneEvent::CurrentUnit {
					angle: args.word(&["a", "angle"]),
					linear: args.word(&["l", "linear"]),
					time: args.word(&["t", "time"]),
				};
				match event {
					SceneEvent::CurrentUnit {
						angle: None,
						linear: None,
						time: None,
					} => Err("currentUnit without a unit"),
					event => Ok(event),
				}
			}
			"select" => {
				let Some(name) = args.words().first().map(|name| Box::<str>::from(*name)) else {
					return Err("select without a node");
				};
				self.current_node = Some(name.clone());
				Ok(SceneEvent::NodeSelected { node_name: name })
			}
			"parent" => parent(&args),
			"namespace" => namespace(&args),
			_ => Err("unrecognized command"),
		}
	}

	fn create_node(&mut self, args: &Args) -> Outcome {
		let type_name = args.positionals.first().and_then(Token::word).ok_or("createNode without a node type")?;
		let node_name = args.word(&["n", "name"]).ok_or("createNode without -n")?;
		self.current_node = Some(node_name.clone());
		Ok(SceneEvent::NodeCreated {
			type_name: type_name.into(),
			node_name,
			parent: args.word(&["p", "parent"]),
		})
	}

	fn set_attr(&self, args: &Args) -> Outcome {
		let (plug, values) = args.positionals.split_first().ok_or("setAttr without an attribute")?;
		let plug = plug.word().ok_or("setAttr attribute is not a name")?;
		let (node_name, attr_path): (Box<str>, &str) = match plug.strip_prefix('.') {
			Some(attr) => (self.current_node.clone().ok_or("relative attribute without a current node")?, attr),
			None => {
				let (node, attr) = split_plug(plug);
				(node.into(), attr)
			}
		};

		let value = match args.value(&["typ", "type"]).and_then(Token::word) {
			Some("string") => match values.first() {
				Some(token) if token.kind == TokenKind::StringLiteral => Value::String(token.text.clone()),
				_ => return Err("string attribute without a string literal"),
			},
			Some(kind) if kind.ends_with("Array") => {
				let (count, elements) = values.split_first().ok_or("array attribute without a count")?;
				if count.kind != TokenKind::NumberLiteral {
					return Err("array count is not a number");
				}
				Value::Vector(typed_elements(kind, elements)?)
			}
			Some(kind) => Value::from_elements(typed_elements(kind, values)?),
			None => Value::from_elements(values.iter().map(literal).collect::<std::result::Result<_, _>>()?),
		};

		Ok(SceneEvent::AttributeSet {
			node_name,
			attr_path: attr_path.into(),
			value,
		})
	}
}

fn file_reference(args: &Args) -> Outcome {
	if !args.has(&["r", "reference", "rdi", "referenceDepthInfo"]) {
		return Err("file command is not a reference");
	}
	let path = args
		.positionals
		.iter()
		.rev()
		.find(|token| token.kind == TokenKind::StringLiteral)
		.ok_or("file reference without a path")?;
	Ok(SceneEvent::FileReference { path: path.text.clone() })
}

fn parent(args: &Args) -> Outcome {
	let mut names: Vec<Box<str>> = args.words().into_iter().map(Into::into).collect();
	if args.has(&["w", "world"]) {
		if names.is_empty() {
			return Err("parent -w without a child");
		}
		return Ok(SceneEvent::NodeParented { children: names, parent: None });
	}
	if names.len() < 2 {
		return Err("parent needs a child and a parent");
	}
	let parent = names.pop();
	Ok(SceneEvent::NodeParented { children: names, parent })
}

fn namespace(args: &Args) -> Outcome {
	if let Some(name) = args.word(&["add"]) {
		return Ok(SceneEvent::NamespaceAdded {
			name,
			parent: args.word(&["p", "parent"]),
		});
	}
	if let Some(name) = args.word(&["set"]) {
		return Ok(SceneEvent::NamespaceSet { name });
	}
	Err("namespace without -add or -set")
}

/// Element type implied by a `-type` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
	Float32,
	Float64,
	Literal,
}

fn element_kind(type_name: &str) -> Element {
	if type_name.starts_with("double") || type_name.starts_with("matrix") {
		Element::Float64
	} else if type_name.starts_with("float") {
		Element::Float32
	} else {
		Element::Literal
	}
}

/// Parse the values of a typed `setAttr`.
///
/// Numeric data types fix the element kind. Bare words in structured data such as `polyFaces`
/// are kept as strings.
fn typed_elements(type_name: &str, tokens: &[Token]) -> std::result::Result<Vec<Value>, &'static str> {
	let element = element_kind(type_name);
	tokens
		.iter()
		.map(|token| {
			let value = match literal(token) {
				Err(_) if token.kind == TokenKind::Identifier => return Ok(Value::String(token.text.clone())),
				other => other?,
			};
			let converted = match (element, value.as_f64()) {
				(Element::Float64, Some(number)) => Value::Float64(number),
				(Element::Float32, Some(number)) => Value::Float32(number as f32),
				_ => value,
			};
			Ok(converted)
		})
		.collect()
}

/// Parse one literal `setAttr` value.
fn literal(token: &Token) -> std::result::Result<Value, &'static str> {
	match token.kind {
		TokenKind::NumberLiteral => number(&token.text).ok_or("unparsable number"),
		TokenKind::StringLiteral => Ok(Value::String(token.text.clone())),
		TokenKind::Identifier => match token.text.as_ref() {
			"yes" | "on" | "true" => Ok(Value::Bool(true)),
			"no" | "off" | "false" => Ok(Value::Bool(false)),
			_ => Err("bare word is not a value"),
		},
		TokenKind::Punctuation | TokenKind::StatementEnd => Err("punctuation is not a value"),
	}
}

fn number(text: &str) -> Option<Value> {
	let integral = !text.contains(['.', 'e', 'E']);
	match text.parse::<i64>() {
		Ok(value) if integral => Some(match i32::try_from(value) {
			Ok(small) => Value::Int32(small),
			Err(_) => Value::Int64(value),
		}),
		_ => text.parse::<f64>().ok().map(Value::Float64),
	}
}

impl Iterator for CommandInterpreter<'_> {
	type Item = SceneEvent;

	fn next(&mut self) -> Option<SceneEvent> {
		let command = loop {
			let token = self.tokens.next()?;
			if token.kind != TokenKind::StatementEnd {
				break token;
			}
		};

		let mut rest = Vec::new();
		let mut terminated = false;
		for token in self.tokens.by_ref() {
			if token.kind == TokenKind::StatementEnd {
				terminated = true;
				break;
			}
			rest.push(token);
		}

		if !terminated {
			warn!("statement '{}' at {} cut off by end of input", command.text, command.offset);
			return Some(SceneEvent::unsupported(command.text, command.offset, UnsupportedReason::Truncated));
		}

		let takes_value = match value_flags(&command.text) {
			Some(flags) if command.kind == TokenKind::Identifier => flags,
			_ => {
				debug!("skipping unknown command '{}' at {}", command.text, command.offset);
				return Some(SceneEvent::unsupported(command.text, command.offset, UnsupportedReason::UnknownCommand));
			}
		};

		let args = Args::parse(rest, takes_value);
		Some(match self.interpret(&command.text, args) {
			Ok(event) => event,
			Err(reason) => {
				warn!("statement '{}' at {}: {reason}", command.text, command.offset);
				SceneEvent::unsupported(command.text, command.offset, UnsupportedReason::Malformed)
			}
		})
	}
}

#[cfg(test)]
mod tests;
