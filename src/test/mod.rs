use crate::sourcemap::vlq;

/// Encode a `mappings` string from per-line lists of segment fields.
///
/// Field values are the raw deltas exactly as they will appear in the map.
pub fn encode_mappings(lines: &[&[&[i64]]]) -> String {
    lines
        .iter()
        .map(|segments| {
            segments
                .iter()
                .map(|fields| vlq::encode(fields))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// A source map for a two-line bundle built from `src/app.ts` and `src/util.ts`.
///
/// - line 1, col 0  -> src/app.ts 1:1 `main`
/// - line 1, col 15 -> src/app.ts 2:3 `render`
/// - line 2, col 4  -> src/util.ts 10:1
pub fn sample_source_map() -> String {
    let mappings = encode_mappings(&[
        &[&[0, 0, 0, 0, 0], &[15, 0, 1, 2, 1]],
        &[&[4, 1, 8, -2]],
    ]);
    format!(
        r#"{{"version":3,"file":"bundle.js","sources":["src/app.ts","src/util.ts"],"names":["main","render"],"mappings":"{}"}}"#,
        mappings
    )
}

/// Engine output matching [`sample_source_map`].
pub const SAMPLE_BACKTRACE: &str = "TypeError: cannot read property 'x' of undefined
    at render (bundle.js:1:20)
    at helper (bundle.js:2:5)
    at <eval> (bundle.js:7:1)
    at main (native)
";

#[test]
fn encode_mappings_layout() {
    assert_eq!(encode_mappings(&[&[&[0, 0, 0, 0]]]), "AAAA");
    assert_eq!(encode_mappings(&[&[&[0, 0, 0, 0], &[2]], &[], &[&[1]]]), "AAAA,E;;C");
}
