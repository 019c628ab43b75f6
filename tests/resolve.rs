//! End-to-end resolution of engine backtraces against the sample bundle.
//!
//! `tests/samples/bundle.js.map` maps a three-line bundle onto `src/a.ts` and `src/b.ts`:
//!
//! - line 1, col 0  -> src/a.ts 1:1 `greet`
//! - line 1, col 9  -> src/a.ts 1:10 `format`
//! - line 1, col 40 -> src/a.ts 2:3
//! - line 2         -> (nothing)
//! - line 3, col 2  -> src/b.ts 42:1 `render`
//! - line 3, col 14 -> src/a.ts 4:5

use std::path::{Path, PathBuf};

use jsbacktrace::prelude::*;

fn sample(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name)
}

fn sample_text(name: &str) -> String {
    std::fs::read_to_string(sample(name)).unwrap()
}

#[test]
fn end_to_end_without_map() {
    let input = "TypeError: x is undefined\n    at foo (bar.js:10:5)\n";

    let json: serde_json::Value =
        serde_json::from_str(&jsbacktrace::parse(None, input).unwrap()).unwrap();
    assert_eq!(json["errorMessage"], "TypeError: x is undefined");
    assert_eq!(json["raw"], "TypeError: x is undefined\n    at foo (bar.js:10:5)");
    assert_eq!(
        json["trace"],
        serde_json::json!([{
            "functionName": "foo",
            "source": "bar.js",
            "line": 10,
            "column": 5
        }])
    );
    assert_eq!(json["pretty"], "TypeError: x is undefined:\n  at foo (bar.js:10:5)");

    assert_eq!(
        jsbacktrace::format(None, input).unwrap(),
        "TypeError: x is undefined:\n  at foo (bar.js:10:5)"
    );
}

#[test]
fn end_to_end_with_map() {
    let map = sample_text("bundle.js.map");
    let trace = sample_text("bundle.trace");

    assert_eq!(
        jsbacktrace::format(Some(map.as_str()), &trace).unwrap(),
        "ReferenceError: 'config' is not defined:
  at greet (bundle.js:1:5) -> greet (src/a.ts:1:1)
  at format (bundle.js:1:40) -> src/a.ts:2:3
  at render (bundle.js:3:20) -> src/a.ts:4:5
  at <anonymous> (bundle.js:3:2) -> render (src/b.ts:42:1)
  at <eval> (bundle.js:2:1)"
    );
}

#[test]
fn json_with_map() {
    let map = sample_text("bundle.js.map");
    let trace = sample_text("bundle.trace");

    let json: serde_json::Value =
        serde_json::from_str(&jsbacktrace::parse(Some(map.as_str()), &trace).unwrap()).unwrap();
    let frames = json["trace"].as_array().unwrap();
    assert_eq!(frames.len(), 5);

    assert_eq!(
        frames[0]["mapped"],
        serde_json::json!({
            "source": "src/a.ts",
            "line": 1,
            "column": 1,
            "functionName": "greet"
        })
    );
    assert_eq!(
        frames[1]["mapped"],
        serde_json::json!({ "source": "src/a.ts", "line": 2, "column": 3 })
    );
    assert!(frames[4].get("mapped").is_none());
}

#[test]
fn map_loaded_from_file() {
    let map = SourceMap::from_file(sample("bundle.js.map"), &ResolverConfig::strict()).unwrap();
    assert_eq!(map.file(), Some("bundle.js"));
    assert_eq!(map.table().line_count(), 3);
    assert_eq!(map.table().segment_count(), 5);

    let mut bt = Backtrace::parse(&sample_text("bundle.trace"));
    bt.resolve_with(&map);

    let via_resolver = BacktraceResolver::default()
        .resolve(Some(sample_text("bundle.js.map").as_str()), &sample_text("bundle.trace"))
        .unwrap();
    assert_eq!(bt, via_resolver);
}

#[test]
fn frames_keep_input_order() {
    let bt = Backtrace::parse(&sample_text("bundle.trace"));
    let names: Vec<_> = bt
        .frames
        .iter()
        .map(|f| f.function_name.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["greet", "format", "render", "<anonymous>", "<eval>"]);
}

#[test]
fn text_without_frames() {
    for input in ["", "   ", "Error: boom", "  Error: boom  \n", "just text"] {
        let bt = Backtrace::parse(input);
        assert!(bt.frames.is_empty(), "{:?}", input);
        assert_eq!(bt.error_message, input.trim(), "{:?}", input);
        assert_eq!(bt.pretty(), input.trim(), "{:?}", input);
    }
}

#[test]
fn missing_mappings_is_an_error() {
    let result = jsbacktrace::parse(
        Some(r#"{"version":3,"sources":["a.js"],"names":[]}"#),
        "Error: x\n    at f (a.js:1:1)",
    );
    assert!(matches!(result, Err(Error::InvalidSourceMap { .. })));

    let result = jsbacktrace::format(Some(r#"{"version":3,"mappings":"AAAA"}"#), "Error: x");
    assert!(matches!(result, Err(Error::InvalidSourceMap { .. })));
}

#[test]
fn formatting_is_idempotent() {
    let resolver = BacktraceResolver::default();
    let map = sample_text("bundle.js.map");
    let bt = resolver.resolve(Some(map.as_str()), &sample_text("bundle.trace")).unwrap();
    assert_eq!(bt.pretty(), bt.pretty());
    assert_eq!(bt.to_string(), bt.pretty());
}

#[test]
fn shared_resolver_across_threads() {
    let resolver = std::sync::Arc::new(BacktraceResolver::new(ResolverConfig::default()));
    let map = std::sync::Arc::new(sample_text("bundle.js.map"));
    let trace = std::sync::Arc::new(sample_text("bundle.trace"));

    let outputs: Vec<String> = (0..4)
        .map(|_| {
            let resolver = resolver.clone();
            let map = map.clone();
            let trace = trace.clone();
            std::thread::spawn(move || resolver.format(Some(map.as_str()), &trace).unwrap())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(resolver.cache().len(), 1);
}

#[test]
fn rotating_bundles_stay_bounded() {
    let resolver = BacktraceResolver::default();
    let trace = sample_text("bundle.trace");

    for i in 0..200 {
        let map = format!(r#"{{"sources":["chunk{}.js"],"mappings":"AAAA"}}"#, i);
        resolver.format(Some(map.as_str()), &trace).unwrap();
    }
    assert_eq!(resolver.cache().len(), DEFAULT_SOURCE_MAP_CACHE_CAPACITY);
}

#[test]
fn empty_map_text_is_no_map() {
    let trace = sample_text("bundle.trace");
    assert_eq!(
        jsbacktrace::parse(Some(""), &trace).unwrap(),
        jsbacktrace::parse(None, &trace).unwrap()
    );
    assert_eq!(
        jsbacktrace::format(Some(" \n"), &trace).unwrap(),
        jsbacktrace::format(None, &trace).unwrap()
    );
}
