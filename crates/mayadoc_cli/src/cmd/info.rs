use std::collections::BTreeMap;
use std::path::PathBuf;

use mayadoc::scene::{Result, SceneEvent};

use crate::cmd::util::{FormatArg, emit_json, open_scene, scene_events};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long, value_enum, default_value_t = FormatArg::Auto)]
	pub format: FormatArg,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	format: &'static str,
	container: Option<&'static str>,
	endianness: Option<&'static str>,
	requires_maya: Option<String>,
	plugins: Vec<PluginJson>,
	units: UnitsJson,
	event_count: usize,
	unsupported: usize,
	recovered: usize,
	kinds: BTreeMap<&'static str, usize>,
}

#[derive(serde::Serialize)]
struct PluginJson {
	name: String,
	version: String,
}

#[derive(serde::Serialize, Default)]
struct UnitsJson {
	linear: Option<String>,
	angle: Option<String>,
	time: Option<String>,
}

/// Print container layout, header facts, and per-kind event counts.
pub fn run(args: Args) -> Result<()> {
	let Args { path, format, json } = args;

	let scene = open_scene(&path, format)?;
	let layout = scene.layout();
	let mut events = scene_events(&scene, None)?;

	let mut kinds = BTreeMap::new();
	let mut requires_maya = None;
	let mut plugins = Vec::new();
	let mut units = UnitsJson::default();
	for event in events.by_ref() {
		let event = event?;
		*kinds.entry(event.kind()).or_insert(0_usize) += 1;
		match event {
			SceneEvent::RequiresMaya { version } => requires_maya = Some(version.into_string()),
			SceneEvent::RequiresPlugin { plugin, version } => plugins.push(PluginJson {
				name: plugin.into_string(),
				version: version.into_string(),
			}),
			SceneEvent::CurrentUnit { angle, linear, time } => {
				units = UnitsJson {
					linear: linear.map(str::into_string),
					angle: angle.map(str::into_string),
					time: time.map(str::into_string),
				};
			}
			_ => {}
		}
	}
	let stats = events.stats();

	let payload = InfoJson {
		path: path.display().to_string(),
		format: scene.format().as_str(),
		container: layout.map(|layout| layout.label()),
		endianness: layout.map(|layout| layout.endianness.as_str()),
		requires_maya,
		plugins,
		units,
		event_count: stats.events,
		unsupported: stats.unsupported,
		recovered: stats.recovered,
		kinds,
	};

	if json {
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", payload.path);
	println!("format: {}", payload.format);
	println!("container: {}", payload.container.unwrap_or("-"));
	println!("endianness: {}", payload.endianness.unwrap_or("-"));
	println!("requires_maya: {}", payload.requires_maya.as_deref().unwrap_or("-"));
	for plugin in &payload.plugins {
		println!("plugin: {} {}", plugin.name, plugin.version);
	}
	println!("linear_unit: {}", payload.units.linear.as_deref().unwrap_or("-"));
	println!("angle_unit: {}", payload.units.angle.as_deref().unwrap_or("-"));
	println!("time_unit: {}", payload.units.time.as_deref().unwrap_or("-"));
	println!("events: {}", payload.event_count);
	println!("unsupported: {}", payload.unsupported);
	println!("recovered: {}", payload.recovered);
	for (kind, count) in &payload.kinds {
		println!("  {kind}: {count}");
	}

	Ok(())
}
