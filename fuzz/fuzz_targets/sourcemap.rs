#![no_main]

use jsbacktrace::{sourcemap::MappingTable, ResolverConfig};
use libfuzzer_sys::fuzz_target;

// Arbitrary `mappings` text against a fixed sources/names list.
fuzz_target!(|data: &[u8]| {
    if let Ok(mappings) = std::str::from_utf8(data) {
        let sources = vec!["a.js".to_string(), "b.js".to_string()];
        let names = vec!["f".to_string()];
        if let Ok(table) = MappingTable::build(
            Some(mappings),
            Some(sources.as_slice()),
            Some(names.as_slice()),
            &ResolverConfig::default(),
        ) {
            for line in 1..=table.line_count() as u32 {
                let _ = table.resolve(line, 0);
                let _ = table.resolve(line, u32::MAX);
            }
        }
    }
});
