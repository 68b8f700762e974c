use crate::scene::{CommandInterpreter, SceneEvent, UnsupportedReason, Value};

fn run(src: &str) -> Vec<SceneEvent> {
	CommandInterpreter::new(src.as_bytes()).collect()
}

fn reason(event: &SceneEvent) -> Option<UnsupportedReason> {
	match event {
		SceneEvent::Unsupported { reason, .. } => Some(*reason),
		_ => None,
	}
}

fn attr(node: &str, path: &str, value: Value) -> SceneEvent {
	SceneEvent::AttributeSet {
		node_name: node.into(),
		attr_path: path.into(),
		value,
	}
}

#[test]
fn create_node_matches_binary_event() {
	assert_eq!(
		run(r#"createNode transform -n "pCube1";"#),
		vec![SceneEvent::NodeCreated {
			type_name: "transform".into(),
			node_name: "pCube1".into(),
			parent: None,
		}]
	);
}

#[test]
fn create_node_reads_parent_and_ignores_boolean_flags() {
	assert_eq!(
		run(r#"createNode mesh -s -n "pCubeShape1" -p "pCube1";"#),
		vec![SceneEvent::NodeCreated {
			type_name: "mesh".into(),
			node_name: "pCubeShape1".into(),
			parent: Some("pCube1".into()),
		}]
	);
}

#[test]
fn relative_set_attr_targets_current_node() {
	let events = run(concat!(
		"createNode transform -n \"pCube1\";\n",
		"\tsetAttr \".t\" -type \"double3\" 0 1.5 -2 ;\n",
		"\tsetAttr -k off \".v\" no;\n",
		"\tsetAttr \".rp\" 3000000000;\n",
		"\tsetAttr -s 8 \".iog\";\n",
	));
	assert_eq!(events.len(), 5);
	assert_eq!(
		events[1],
		attr("pCube1", "t", Value::Vector(vec![Value::Float64(0.0), Value::Float64(1.5), Value::Float64(-2.0)]))
	);
	assert_eq!(events[2], attr("pCube1", "v", Value::Bool(false)));
	assert_eq!(events[3], attr("pCube1", "rp", Value::Int64(3_000_000_000)));
	assert_eq!(events[4], attr("pCube1", "iog", Value::Vector(Vec::new())));
}

#[test]
fn absolute_plug_and_typed_values() {
	let events = run(concat!(
		"setAttr \":time1.o\" 1;\n",
		"setAttr \"lambert1.notes\" -type \"string\" \"a;b\";\n",
		"setAttr \"mesh1.uvs\" -type \"doubleArray\" 3 0.5 1 2;\n",
		"setAttr \"set1.names\" -type \"stringArray\" 2 \"x\" \"y\";\n",
	));
	assert_eq!(events[0], attr(":time1", "o", Value::Int32(1)));
	assert_eq!(events[1], attr("lambert1", "notes", Value::String("a;b".into())));
	assert_eq!(
		events[2],
		attr("mesh1", "uvs", Value::Vector(vec![Value::Float64(0.5), Value::Float64(1.0), Value::Float64(2.0)]))
	);
	assert_eq!(
		events[3],
		attr("set1", "names", Value::Vector(vec![Value::String("x".into()), Value::String("y".into())]))
	);
}

#[test]
fn declared_type_fixes_numeric_element_kind() {
	let events = run(concat!(
		"setAttr \"n1.sp\" -type \"float3\" 1 0.5 2;\n",
		"setAttr \"n1.rad\" -type \"double\" 2;\n",
		"setAttr \"n1.wm\" -type \"matrix\" 1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1;\n",
		"setAttr \"n1.ids\" -type \"Int32Array\" 2 7 9;\n",
		"setAttr \"n1.cuv\" 4;\n",
	));
	assert_eq!(
		events[0],
		attr("n1", "sp", Value::Vector(vec![Value::Float32(1.0), Value::Float32(0.5), Value::Float32(2.0)]))
	);
	assert_eq!(events[1], attr("n1", "rad", Value::Float64(2.0)));
	match &events[2] {
		SceneEvent::AttributeSet {
			value: Value::Vector(items), ..
		} => {
			assert_eq!(items.len(), 16);
			assert!(items.iter().all(|item| matches!(item, Value::Float64(_))));
		}
		other => panic!("expected a matrix, got {other:?}"),
	}
	assert_eq!(events[3], attr("n1", "ids", Value::Vector(vec![Value::Int32(7), Value::Int32(9)])));
	assert_eq!(events[4], attr("n1", "cuv", Value::Int32(4)), "untyped integers stay integral");
}

#[test]
fn structured_data_keeps_bare_words() {
	let events = run(concat!(
		"createNode polyCube -n \"polyCube1\";\n",
		"setAttr -s 2 \".fc[0:1]\" -type \"polyFaces\" f 4 0 1 2 3 mu 0 4 0 1 2 3 f 3 4 5 6;\n",
	));
	assert_eq!(events.len(), 2);
	let SceneEvent::AttributeSet { node_name, attr_path, value } = &events[1] else {
		panic!("expected an attribute, got {:?}", events[1]);
	};
	assert_eq!(node_name.as_ref(), "polyCube1");
	assert_eq!(attr_path.as_ref(), "fc[0:1]");
	let Value::Vector(items) = value else {
		panic!("expected a vector, got {value:?}");
	};
	assert_eq!(items.len(), 18);
	assert_eq!(items[0], Value::String("f".into()));
	assert_eq!(items[1], Value::Int32(4));
	assert_eq!(items[6], Value::String("mu".into()));
	assert_eq!(items[13], Value::String("f".into()));
}

#[test]
fn escaped_semicolon_does_not_split_statement() {
	let events = run("setAttr \"n1.notes\" -type \"string\" \"one;\\\"two;\\\"\";createNode transform -n \"a\";");
	assert_eq!(events.len(), 2);
	assert_eq!(events[0], attr("n1", "notes", Value::String("one;\"two;\"".into())));
	assert!(matches!(&events[1], SceneEvent::NodeCreated { node_name, .. } if node_name.as_ref() == "a"));
}

#[test]
fn connect_attr_splits_plugs() {
	assert_eq!(
		run(r#"connectAttr "pCubeShape1.iog" ":initialShadingGroup.dsm" -na;"#),
		vec![SceneEvent::AttributeConnected {
			src_node: "pCubeShape1".into(),
			src_attr: "iog".into(),
			dst_node: ":initialShadingGroup".into(),
			dst_attr: "dsm".into(),
		}]
	);
}

#[test]
fn header_commands() {
	let events = run(concat!(
		"//Maya ASCII 2016 scene\n",
		"file -rdi 1 -ns \"rig\" -rfn \"rigRN\" -op \"v=0;\" -typ \"mayaAscii\" \"/proj/rig.ma\";\n",
		"requires maya \"2016\";\n",
		"requires -nodeType \"aiOptions\" \"mtoa\" \"1.2.7.3\";\n",
		"currentUnit -l centimeter -a degree -t film;\n",
		"fileInfo \"application\" \"maya\";\n",
	));
	assert_eq!(
		events,
		vec![
			SceneEvent::FileReference { path: "/proj/rig.ma".into() },
			SceneEvent::RequiresMaya { version: "2016".into() },
			SceneEvent::RequiresPlugin {
				plugin: "mtoa".into(),
				version: "1.2.7.3".into(),
			},
			SceneEvent::CurrentUnit {
				angle: Some("degree".into()),
				linear: Some("centimeter".into()),
				time: Some("film".into()),
			},
			SceneEvent::FileInfo {
				key: "application".into(),
				value: "maya".into(),
			},
		]
	);
}

#[test]
fn select_parent_and_namespace() {
	let events = run(concat!(
		"select -ne :defaultRenderGlobals;\n",
		"setAttr \".ren\" -type \"string\" \"arnold\";\n",
		"parent -s -nc -r -add \"|pCube1|pCubeShape1\" \"pCube2\";\n",
		"parent -w \"pCube3\";\n",
		"namespace -add \"rig\" -p \":\";\n",
		"namespace -set \"rig\";\n",
	));
	assert_eq!(
		events,
		vec![
			SceneEvent::NodeSelected {
				node_name: ":defaultRenderGlobals".into()
			},
			attr(":defaultRenderGlobals", "ren", Value::String("arnold".into())),
			SceneEvent::NodeParented {
				children: vec!["|pCube1|pCubeShape1".into()],
				parent: Some("pCube2".into()),
			},
			SceneEvent::NodeParented {
				children: vec!["pCube3".into()],
				parent: None,
			},
			SceneEvent::NamespaceAdded {
				name: "rig".into(),
				parent: Some(":".into()),
			},
			SceneEvent::NamespaceSet { name: "rig".into() },
		]
	);
}

#[test]
fn unknown_commands_are_skipped_to_statement_end() {
	let src = "lockNode -l 1 ;\nrelationship \"link\" \":lightLinker1\" \":initialShadingGroup.message\";\ncreateNode transform -n \"a\";";
	let events = run(src);
	assert_eq!(events.len(), 3);
	assert_eq!(events[0], SceneEvent::unsupported("lockNode", 0, UnsupportedReason::UnknownCommand));
	assert_eq!(events[1], SceneEvent::unsupported("relationship", 16, UnsupportedReason::UnknownCommand));
	assert!(matches!(events[2], SceneEvent::NodeCreated { .. }));
}

#[test]
fn malformed_arguments_degrade_to_unsupported() {
	let cases = [
		"createNode transform;",
		"createNode -n \"x\";",
		"setAttr;",
		"setAttr \".t\" 1;",
		"setAttr \"a.b\" -type \"string\" 3;",
		"setAttr \"a.b\" -type \"doubleArray\" \"x\";",
		"setAttr \"a.b\" 1 banana;",
		"setAttr \"a.b\" ( 1 );",
		"connectAttr \"a.b\";",
		"file -f -new;",
		"requires maya;",
		"fileInfo \"only\";",
		"currentUnit;",
		"select -cl;",
		"parent \"a\";",
		"namespace -rm \"x\";",
	];
	for src in cases {
		let events = run(src);
		assert_eq!(events.len(), 1, "{src}");
		assert_eq!(reason(&events[0]), Some(UnsupportedReason::Malformed), "{src}");
	}
}

#[test]
fn statements_and_empty_statements_are_counted_once() {
	let events = run(";;createNode transform -n \"a\";;  ;setAttr \".t\" 1 2 3;");
	assert_eq!(events.len(), 2);
}

#[test]
fn cut_off_statement_is_truncated() {
	let events = run("createNode transform -n \"a\";\nsetAttr \".t\" 1 2");
	assert_eq!(events.len(), 2);
	assert_eq!(events[1], SceneEvent::unsupported("setAttr", 29, UnsupportedReason::Truncated));

	let events = run("fileInfo \"k\" \"never closed;");
	assert_eq!(events, vec![SceneEvent::unsupported("fileInfo", 0, UnsupportedReason::Truncated)]);
}

#[test]
fn non_identifier_statement_start_is_unknown() {
	let events = run("\"oops\" 1; 42;");
	assert_eq!(events.len(), 2);
	assert!(events.iter().all(|event| reason(event) == Some(UnsupportedReason::UnknownCommand)));
}

#[test]
fn decoding_twice_is_deterministic() {
	let src = "createNode transform -n \"a\";setAttr \".t\" 1 2 3;bogus;";
	let mut interpreter = CommandInterpreter::new(src.as_bytes());
	let first: Vec<_> = interpreter.by_ref().collect();
	assert_eq!(interpreter.current_node(), Some("a"));
	assert_eq!(first, run(src));
}
