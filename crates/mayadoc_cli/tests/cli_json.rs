#![allow(missing_docs)]

use std::process::{Command, Output};

use mayadoc_testkit::{Flavor, IffBuilder, Payload, fixture_path, parse_json_stdout};
use serde_json::Value;

fn run(args: &[String]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_mayadoc")).args(args).output().expect("mayadoc command executes")
}

fn run_json(args: &[&str]) -> Value {
	let args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
	let output = run(&args);
	assert!(
		output.status.success(),
		"mayadoc command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	parse_json_stdout(&output.stdout)
}

fn fixture(name: &str) -> String {
	fixture_path(name).display().to_string()
}

#[test]
fn info_json_reports_binary_header() {
	let json = run_json(&["info", &fixture("cube.mb"), "--json"]);

	assert_eq!(json["format"], "binary");
	assert_eq!(json["container"], "FOR4");
	assert_eq!(json["endianness"], "big");
	assert_eq!(json["requires_maya"], "2016");
	assert_eq!(json["plugins"][0]["name"], "mtoa");
	assert_eq!(json["plugins"][0]["version"], "1.2.7.3");
	assert_eq!(json["units"]["linear"], "cm");
	assert_eq!(json["event_count"], 13);
	assert_eq!(json["kinds"]["node_created"], 3);
	assert_eq!(json["kinds"]["unsupported"], 1);
}

#[test]
fn info_json_reports_ascii_without_container() {
	let json = run_json(&["info", &fixture("cube.ma"), "--json"]);

	assert_eq!(json["format"], "ascii");
	assert!(json["container"].is_null());
	assert_eq!(json["requires_maya"], "2016");
	assert_eq!(json["units"]["linear"], "centimeter");
	assert_eq!(json["event_count"], 14);
	assert_eq!(json["kinds"]["attribute_connected"], 2);
}

#[test]
fn events_json_streams_binary_fixture() {
	let json = run_json(&["events", &fixture("cube.mb"), "--json"]);

	assert_eq!(json["format"], "binary");
	assert_eq!(json["limited"], false);
	assert!(json["error"].is_null());
	let events = json["events"].as_array().expect("events array");
	assert_eq!(events.len(), 13);
	assert_eq!(events[0]["kind"], "requires_maya");
	assert_eq!(events[5]["kind"], "node_created");
	assert_eq!(events[5]["node_name"], "pCube1");
	assert_eq!(events[6]["value"]["type"], "vector");
	assert_eq!(json["stats"]["unsupported"], 1);
}

#[test]
fn events_limit_stops_early() {
	let json = run_json(&["events", &fixture("cube.ma"), "--limit", "3", "--json"]);

	assert_eq!(json["limited"], true);
	assert_eq!(json["events"].as_array().map(Vec::len), Some(3));
	assert_eq!(json["stats"]["events"], 3);
}

#[test]
fn forced_format_is_honored() {
	let json = run_json(&["events", &fixture("cube.ma"), "--format", "ascii", "--json"]);
	assert_eq!(json["format"], "ascii");

	let output = run(&["events".to_owned(), fixture("cube.ma"), "--format".to_owned(), "binary".to_owned()]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: not a Maya scene file"));
}

#[test]
fn truncated_binary_prints_partial_events_then_fails() {
	let mut builder = IffBuilder::new(Flavor::For4);
	builder
		.begin_form(b"Maya")
		.begin_form(b"XFRM")
		.leaf(b"CREA", &Payload::new().u8(0).cstr("pCube1").build())
		.end()
		.begin_form(b"XFRM")
		.leaf(b"CREA", &Payload::new().u8(0).cstr("pCube2").build());
	let mut bytes = builder.finish();
	bytes.truncate(bytes.len() - 6);

	let dir = std::env::temp_dir().join(format!("mayadoc-cli-{}", std::process::id()));
	std::fs::create_dir_all(&dir).expect("temp dir");
	let path = dir.join("cut.mb");
	std::fs::write(&path, &bytes).expect("write scene");

	let output = run(&["events".to_owned(), path.display().to_string(), "--json".to_owned()]);
	assert!(!output.status.success());
	let json = parse_json_stdout(&output.stdout);
	assert_eq!(json["events"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["events"][0]["node_name"], "pCube1");
	assert!(json["error"].as_str().is_some_and(|item| item.starts_with("truncated input")));

	std::fs::remove_file(&path).ok();
}

#[test]
fn text_output_lists_one_event_per_line() {
	let output = run(&["events".to_owned(), fixture("cube.ma")]);
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	let lines: Vec<_> = stdout.lines().collect();
	assert_eq!(lines.len(), 15);
	assert_eq!(lines[0], "requires_maya: 2016");
	assert!(lines[14].starts_with("events: 14 "));
}
