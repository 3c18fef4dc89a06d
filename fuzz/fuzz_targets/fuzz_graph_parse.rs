#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must either succeed or fail with a typed error, never panic
    if let Ok(graph) = glp2report::graph::parse(raw) {
        for axis in 0..=graph.samples.max_width() {
            let _ = graph.axis_values(axis);
        }
    }
});
