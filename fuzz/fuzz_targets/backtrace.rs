#![no_main]

use jsbacktrace::Backtrace;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let bt = Backtrace::parse(text);
        let _ = bt.pretty();
    }
});
