#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz product identifier normalization.
///
/// Each line of the input is treated as one product reference, so OCI purl
/// decoding and image reference parsing both see arbitrary strings.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let refs = s.lines().map(vex_tools::ProductRef::new).collect();
        let _ = vex_tools::normalize_products(refs);
    }
});
