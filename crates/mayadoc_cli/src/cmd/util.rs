use std::path::Path;

use mayadoc::scene::{DecodeOptions, Result, SceneEvent, SceneEvents, SceneFile, SceneFormat, TypeRegistry, Value};
use serde::Serialize;

/// Format selection accepted by `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
	/// Sniff the leading bytes.
	#[default]
	Auto,
	/// Force the binary chunk decoder.
	Binary,
	/// Force the ASCII command interpreter.
	Ascii,
}

impl FormatArg {
	fn forced(self) -> Option<SceneFormat> {
		match self {
			Self::Auto => None,
			Self::Binary => Some(SceneFormat::Binary),
			Self::Ascii => Some(SceneFormat::Ascii),
		}
	}
}

/// Open a scene file honoring a forced format.
pub(crate) fn open_scene(path: &Path, format: FormatArg) -> Result<SceneFile> {
	let bytes = std::fs::read(path)?;
	match format.forced() {
		Some(format) => SceneFile::with_format(bytes, format),
		None => SceneFile::from_bytes(bytes),
	}
}

/// Start an event stream with the bundled registry.
pub(crate) fn scene_events<'a>(scene: &'a SceneFile, max_depth: Option<usize>) -> Result<SceneEvents<'a>> {
	let mut options = DecodeOptions::default();
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	scene.events_with(TypeRegistry::bundled()?, options)
}

/// Print one JSON document to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// JSON form of an attribute value.
#[derive(Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub(crate) enum ValueJson {
	Int32(i32),
	Int64(i64),
	Float32(f32),
	Float64(f64),
	Bool(bool),
	String(String),
	Bytes(Vec<u8>),
	Vector(Vec<ValueJson>),
}

impl From<&Value> for ValueJson {
	fn from(value: &Value) -> Self {
		match value {
			Value::Int32(item) => Self::Int32(*item),
			Value::Int64(item) => Self::Int64(*item),
			Value::Float32(item) => Self::Float32(*item),
			Value::Float64(item) => Self::Float64(*item),
			Value::Bool(item) => Self::Bool(*item),
			Value::String(item) => Self::String(item.to_string()),
			Value::Bytes(item) => Self::Bytes(item.clone()),
			Value::Vector(items) => Self::Vector(items.iter().map(Self::from).collect()),
		}
	}
}

/// JSON form of a scene event, tagged by its kind label.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum EventJson {
	NodeCreated {
		type_name: String,
		node_name: String,
		parent: Option<String>,
	},
	AttributeSet {
		node_name: String,
		attr_path: String,
		value: ValueJson,
	},
	AttributeConnected {
		src_node: String,
		src_attr: String,
		dst_node: String,
		dst_attr: String,
	},
	FileReference {
		path: String,
	},
	RequiresMaya {
		version: String,
	},
	RequiresPlugin {
		plugin: String,
		version: String,
	},
	FileInfo {
		key: String,
		value: String,
	},
	CurrentUnit {
		angle: Option<String>,
		linear: Option<String>,
		time: Option<String>,
	},
	NodeSelected {
		node_name: String,
	},
	NodeParented {
		children: Vec<String>,
		parent: Option<String>,
	},
	NamespaceAdded {
		name: String,
		parent: Option<String>,
	},
	NamespaceSet {
		name: String,
	},
	Unsupported {
		what: String,
		offset: usize,
		reason: &'static str,
	},
}

fn owned(text: &str) -> String {
	text.to_owned()
}

fn owned_opt(text: &Option<Box<str>>) -> Option<String> {
	text.as_deref().map(owned)
}

impl From<&SceneEvent> for EventJson {
	fn from(event: &SceneEvent) -> Self {
		match event {
			SceneEvent::NodeCreated { type_name, node_name, parent } => Self::NodeCreated {
				type_name: owned(type_name),
				node_name: owned(node_name),
				parent: owned_opt(parent),
			},
			SceneEvent::AttributeSet { node_name, attr_path, value } => Self::AttributeSet {
				node_name: owned(node_name),
				attr_path: owned(attr_path),
				value: ValueJson::from(value),
			},
			SceneEvent::AttributeConnected {
				src_node,
				src_attr,
				dst_node,
				dst_attr,
			} => Self::AttributeConnected {
				src_node: owned(src_node),
				src_attr: owned(src_attr),
				dst_node: owned(dst_node),
				dst_attr: owned(dst_attr),
			},
			SceneEvent::FileReference { path } => Self::FileReference { path: owned(path) },
			SceneEvent::RequiresMaya { version } => Self::RequiresMaya { version: owned(version) },
			SceneEvent::RequiresPlugin { plugin, version } => Self::RequiresPlugin {
				plugin: owned(plugin),
				version: owned(version),
			},
			SceneEvent::FileInfo { key, value } => Self::FileInfo {
				key: owned(key),
				value: owned(value),
			},
			SceneEvent::CurrentUnit { angle, linear, time } => Self::CurrentUnit {
				angle: owned_opt(angle),
				linear: owned_opt(linear),
				time: owned_opt(time),
			},
			SceneEvent::NodeSelected { node_name } => Self::NodeSelected { node_name: owned(node_name) },
			SceneEvent::NodeParented { children, parent } => Self::NodeParented {
				children: children.iter().map(|child| owned(child)).collect(),
				parent: owned_opt(parent),
			},
			SceneEvent::NamespaceAdded { name, parent } => Self::NamespaceAdded {
				name: owned(name),
				parent: owned_opt(parent),
			},
			SceneEvent::NamespaceSet { name } => Self::NamespaceSet { name: owned(name) },
			SceneEvent::Unsupported { what, offset, reason } => Self::Unsupported {
				what: owned(what),
				offset: *offset,
				reason: reason.as_str(),
			},
		}
	}
}

/// Render a value as compact text.
pub(crate) fn render_value(value: &Value) -> String {
	match value {
		Value::Int32(item) => item.to_string(),
		Value::Int64(item) => item.to_string(),
		Value::Float32(item) => item.to_string(),
		Value::Float64(item) => item.to_string(),
		Value::Bool(item) => item.to_string(),
		Value::String(item) => format!("{item:?}"),
		Value::Bytes(item) => format!("<{} bytes>", item.len()),
		Value::Vector(items) => {
			let parts: Vec<_> = items.iter().map(render_value).collect();
			format!("[{}]", parts.join(", "))
		}
	}
}

fn opt_label(text: &Option<Box<str>>) -> &str {
	text.as_deref().unwrap_or("-")
}

/// Render an event as one text line.
pub(crate) fn render_event(event: &SceneEvent) -> String {
	let detail = match event {
		SceneEvent::NodeCreated { type_name, node_name, parent } => match parent {
			Some(parent) => format!("{node_name} ({type_name}) under {parent}"),
			None => format!("{node_name} ({type_name})"),
		},
		SceneEvent::AttributeSet { node_name, attr_path, value } => format!("{node_name}.{attr_path} = {}", render_value(value)),
		SceneEvent::AttributeConnected {
			src_node,
			src_attr,
			dst_node,
			dst_attr,
		} => format!("{src_node}.{src_attr} -> {dst_node}.{dst_attr}"),
		SceneEvent::FileReference { path } => path.to_string(),
		SceneEvent::RequiresMaya { version } => version.to_string(),
		SceneEvent::RequiresPlugin { plugin, version } => format!("{plugin} {version}"),
		SceneEvent::FileInfo { key, value } => format!("{key} = {value:?}"),
		SceneEvent::CurrentUnit { angle, linear, time } => {
			format!("linear={} angle={} time={}", opt_label(linear), opt_label(angle), opt_label(time))
		}
		SceneEvent::NodeSelected { node_name } => node_name.to_string(),
		SceneEvent::NodeParented { children, parent } => format!("{} -> {}", children.join(" "), opt_label(parent)),
		SceneEvent::NamespaceAdded { name, parent } => match parent {
			Some(parent) => format!("{name} under {parent}"),
			None => name.to_string(),
		},
		SceneEvent::NamespaceSet { name } => name.to_string(),
		SceneEvent::Unsupported { what, offset, reason } => format!("{what} at {offset} ({})", reason.as_str()),
	};
	format!("{}: {detail}", event.kind())
}

#[cfg(test)]
mod tests {
	use mayadoc::scene::{SceneEvent, UnsupportedReason, Value};

	use super::{EventJson, render_event, render_value};

	#[test]
	fn event_json_is_tagged_by_kind() {
		let event = SceneEvent::AttributeSet {
			node_name: "pCube1".into(),
			attr_path: "t".into(),
			value: Value::Vector(vec![Value::Int32(1), Value::Float64(2.5)]),
		};
		let json = serde_json::to_value(EventJson::from(&event)).expect("event serializes");
		assert_eq!(json["kind"], "attribute_set");
		assert_eq!(json["attr_path"], "t");
		assert_eq!(json["value"]["type"], "vector");
		assert_eq!(json["value"]["value"][1]["type"], "float64");
		assert_eq!(json["value"]["value"][1]["value"], 2.5);
	}

	#[test]
	fn unsupported_json_uses_reason_label() {
		let event = SceneEvent::Unsupported {
			what: "MBLK".into(),
			offset: 284,
			reason: UnsupportedReason::UnknownTag,
		};
		let json = serde_json::to_value(EventJson::from(&event)).expect("event serializes");
		assert_eq!(json["kind"], "unsupported");
		assert_eq!(json["offset"], 284);
		assert_eq!(json["reason"], "unknown_tag");
	}

	#[test]
	fn text_rendering() {
		assert_eq!(render_value(&Value::Vector(vec![Value::Int32(0), Value::Bool(true)])), "[0, true]");
		assert_eq!(render_value(&Value::Bytes(vec![1, 2, 3])), "<3 bytes>");
		let event = SceneEvent::NodeParented {
			children: vec!["a".into(), "b".into()],
			parent: None,
		};
		assert_eq!(render_event(&event), "node_parented: a b -> -");
	}
}
