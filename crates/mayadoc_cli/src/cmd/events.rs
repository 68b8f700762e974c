use std::path::PathBuf;

use log::info;
use mayadoc::scene::Result;

use crate::cmd::util::{EventJson, FormatArg, emit_json, open_scene, render_event, scene_events};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, value_enum, default_value_t = FormatArg::Auto)]
	pub format: FormatArg,
	/// Stop after this many events.
	#[arg(long)]
	pub limit: Option<usize>,
	/// Deepest group nesting walked in binary files.
	#[arg(long)]
	pub max_depth: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct EventsJson {
	path: String,
	format: &'static str,
	events: Vec<EventJson>,
	stats: StatsJson,
	limited: bool,
	error: Option<String>,
}

#[derive(serde::Serialize)]
struct StatsJson {
	events: usize,
	unsupported: usize,
	recovered: usize,
}

/// Print decoded events in file order.
///
/// Events decoded before a fatal error are printed before the error is reported.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		format,
		limit,
		max_depth,
		json,
	} = args;

	let scene = open_scene(&path, format)?;
	let mut events = scene_events(&scene, max_depth)?;
	let limit = limit.unwrap_or(usize::MAX);

	let mut rendered = Vec::new();
	let mut failure = None;
	let mut limited = false;
	while let Some(item) = events.next() {
		match item {
			Ok(event) if json => rendered.push(EventJson::from(&event)),
			Ok(event) => println!("{}", render_event(&event)),
			Err(err) => {
				failure = Some(err);
				break;
			}
		}
		if events.stats().events >= limit {
			limited = true;
			info!("stopping at --limit {limit}, offset {}", events.offset());
			break;
		}
	}
	let stats = events.stats();
	drop(events);

	if json {
		emit_json(&EventsJson {
			path: path.display().to_string(),
			format: scene.format().as_str(),
			events: rendered,
			stats: StatsJson {
				events: stats.events,
				unsupported: stats.unsupported,
				recovered: stats.recovered,
			},
			limited,
			error: failure.as_ref().map(ToString::to_string),
		});
	} else {
		println!("events: {} unsupported: {} recovered: {}", stats.events, stats.unsupported, stats.recovered);
	}

	match failure {
		Some(err) => Err(err),
		None => Ok(()),
	}
}

