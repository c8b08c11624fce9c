#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz attestation parsing, bare statements and DSSE envelopes alike.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(att) = vex_tools::attestation::parse_attestation_str(s) {
            let _ = vex_tools::verify_image_subjects(&att, &att.predicate);
        }
    }
});
