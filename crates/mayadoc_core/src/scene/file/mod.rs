use std::fs;
use std::path::Path;

use crate::scene::{
	ChunkWalker, CommandInterpreter, ContainerLayout, DecodeOptions, DecodeStats, EventSink, Result, SceneEvent, SceneFormat, TypeRegistry,
};

/// Scene file held in memory with its detected format.
pub struct SceneFile {
	format: SceneFormat,
	bytes: Vec<u8>,
}

impl SceneFile {
	/// Read a scene file from disk and detect its format.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let bytes = fs::read(path)?;
		Self::from_bytes(bytes)
	}

	/// Wrap scene bytes and detect their format.
	pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
		let format = SceneFormat::detect(&bytes)?;
		Ok(Self { format, bytes })
	}

	/// Wrap scene bytes with a caller-chosen format.
	///
	/// Binary input must still start with a container magic.
	pub fn with_format(bytes: Vec<u8>, format: SceneFormat) -> Result<Self> {
		if format == SceneFormat::Binary {
			ContainerLayout::parse(&bytes)?;
		}
		Ok(Self { format, bytes })
	}

	/// Format used to decode this file.
	pub fn format(&self) -> SceneFormat {
		self.format
	}

	/// Return raw bytes backing this file.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Container layout of a binary file.
	pub fn layout(&self) -> Option<ContainerLayout> {
		match self.format {
			SceneFormat::Binary => ContainerLayout::sniff(&self.bytes),
			SceneFormat::Ascii => None,
		}
	}

	/// Stream events using the bundled registry and default options.
	pub fn events(&self) -> Result<SceneEvents<'_>> {
		self.events_with(TypeRegistry::bundled()?, DecodeOptions::default())
	}

	/// Stream events with an explicit registry and options.
	pub fn events_with<'a>(&'a self, registry: &'a TypeRegistry, options: DecodeOptions) -> Result<SceneEvents<'a>> {
		decode(&self.bytes, registry, Some(self.format), options)
	}

	/// Push every event into `sink` and return the final counts.
	///
	/// Events before a fatal error are delivered before the error is returned.
	pub fn decode_into(&self, sink: &mut impl EventSink) -> Result<DecodeStats> {
		self.events()?.drain_into(sink)
	}
}

enum EventSource<'a> {
	Binary(ChunkWalker<'a>),
	Ascii(CommandInterpreter<'a>),
}

/// Lazy, pull-based event stream over one scene buffer.
///
/// Dropping the stream early is cheap; nothing runs in the background.
pub struct SceneEvents<'a> {
	source: EventSource<'a>,
	stats: DecodeStats,
}

impl SceneEvents<'_> {
	/// Format being decoded.
	pub fn format(&self) -> SceneFormat {
		match self.source {
			EventSource::Binary(_) => SceneFormat::Binary,
			EventSource::Ascii(_) => SceneFormat::Ascii,
		}
	}

	/// Counts over the events yielded so far.
	pub fn stats(&self) -> DecodeStats {
		self.stats
	}

	/// Byte offset the decoder has reached.
	pub fn offset(&self) -> usize {
		match &self.source {
			EventSource::Binary(walker) => walker.offset(),
			EventSource::Ascii(interpreter) => interpreter.offset(),
		}
	}

	/// Drain the rest of the stream into `sink`.
	pub fn drain_into(mut self, sink: &mut impl EventSink) -> Result<DecodeStats> {
		while let Some(item) = self.next() {
			sink.event(item?);
		}
		Ok(self.stats)
	}
}

impl Iterator for SceneEvents<'_> {
	type Item = Result<SceneEvent>;

	fn next(&mut self) -> Option<Self::Item> {
		let item = match &mut self.source {
			EventSource::Binary(walker) => walker.next()?,
			EventSource::Ascii(interpreter) => Ok(interpreter.next()?),
		};
		if let Ok(event) = &item {
			self.stats.record(event);
		}
		Some(item)
	}
}

/// Decode a scene buffer, sniffing the format unless one is given.
pub fn decode<'a>(bytes: &'a [u8], registry: &'a TypeRegistry, format: Option<SceneFormat>, options: DecodeOptions) -> Result<SceneEvents<'a>> {
	let format = match format {
		Some(format) => format,
		None => SceneFormat::detect(bytes)?,
	};
	let source = match format {
		SceneFormat::Binary => EventSource::Binary(ChunkWalker::new(bytes, registry, options)?),
		SceneFormat::Ascii => EventSource::Ascii(CommandInterpreter::new(bytes)),
	};
	Ok(SceneEvents {
		source,
		stats: DecodeStats::default(),
	})
}
