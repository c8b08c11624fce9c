//! In-toto attestations of VEX documents.
//!
//! An [`Attestation`] wraps a VEX document as the predicate of an in-toto
//! statement whose subjects are the artifacts the document talks about.
//! This module builds those subjects, reads documents back out of signed
//! DSSE envelopes and checks that an attestation covers every image its
//! document names. Signing and registry transport happen elsewhere.

mod envelope;
mod subjects;
mod types;
mod verify;

pub use envelope::{parse_attestation_str, read_signed_vex, DsseEnvelope, DsseSignature};
pub use subjects::{attach_targets, build_subjects, DigestResolver, KnownDigestResolver};
pub use types::{
    attestation_bytes, Attestation, Subject, IN_TOTO_PAYLOAD_TYPE, STATEMENT_TYPE_V0_1,
};
pub use verify::verify_image_subjects;
