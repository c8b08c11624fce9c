#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz OpenVEX document parsing.
///
/// Feeds arbitrary UTF-8 strings to `parse_vex_str`; documents that parse
/// are also merged with themselves to exercise timestamp cascading.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = vex_tools::parse_vex_str(s) {
            let _ = vex_tools::merge(&vex_tools::MergeOptions::new(), &[doc.clone(), doc]);
        }
    }
});
