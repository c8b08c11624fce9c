//! Integration tests for product normalization and attestations.

use vex_tools::{
    attestation::{
        attach_targets, attestation_bytes, parse_attestation_str, IN_TOTO_PAYLOAD_TYPE,
    },
    error::AttestationErrorKind,
    model::HashAlgorithm,
    parsers::parse_vex_file,
    pipeline::parse_attestation_with_context,
    DsseEnvelope, KnownDigestResolver, VexCtl, VexDocument, VexError,
};
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

const DIGEST: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn vex(name: &str) -> VexDocument {
    parse_vex_file(&fixture_path(name)).expect("Failed to parse VEX")
}

fn app_image() -> String {
    format!("ghcr.io/example/app@sha256:{DIGEST}")
}

// ============================================================================
// Products
// ============================================================================

mod product_tests {
    use super::*;

    #[test]
    fn test_list_and_normalize_products() {
        let ctl = VexCtl::new();
        let doc = vex("openvex/hotfix.openvex.json");

        let products = ctl.list_products(Some(&doc)).expect("list");
        assert_eq!(products.len(), 2);

        let normalized = ctl.normalize_products(products).expect("normalize");
        assert_eq!(normalized.image_refs.len(), 1);
        assert_eq!(normalized.image_refs[0].name, app_image());
        assert_eq!(
            normalized.image_refs[0].hashes.get(&HashAlgorithm::Sha256),
            Some(&DIGEST.to_string())
        );
        assert_eq!(normalized.other_refs.len(), 1);
        assert_eq!(normalized.other_refs[0].name, "pkg:npm/leftpad@1.0.0");
        assert!(normalized.unattestable_refs.is_empty());
    }

    #[test]
    fn test_unhashed_purl_is_unattestable() {
        let ctl = VexCtl::new();
        let doc = vex("openvex/base.openvex.json");
        let normalized = ctl
            .normalize_products(ctl.list_products(Some(&doc)).expect("list"))
            .expect("normalize");
        assert_eq!(normalized.unattestable_refs.len(), 1);
        assert_eq!(normalized.unattestable_refs[0].name, "pkg:npm/leftpad@1.0.0");
    }

    #[test]
    fn test_missing_document() {
        assert!(matches!(
            VexCtl::new().list_products(None),
            Err(VexError::MissingDocument)
        ));
    }
}

// ============================================================================
// Attestations
// ============================================================================

mod attest_tests {
    use super::*;

    #[test]
    fn test_attest_document() {
        let att = VexCtl::new()
            .attest(vex("openvex/hotfix.openvex.json"), &KnownDigestResolver::new())
            .expect("attest");

        assert_eq!(att.subject_names(), vec![app_image(), "pkg:npm/leftpad@1.0.0".to_string()]);
        assert_eq!(
            att.subject[0].digest.get("sha256").map(String::as_str),
            Some(DIGEST)
        );
        assert_eq!(attach_targets(&att.subject, &[]), vec![app_image()]);
    }

    #[test]
    fn test_attest_resolves_tagged_image() {
        let resolver = KnownDigestResolver::new().with_digest(
            "ghcr.io/example/tool:1.0",
            HashAlgorithm::Sha256,
            DIGEST,
        );
        let att = VexCtl::new()
            .attest(vex("openvex/undated.openvex.json"), &resolver)
            .expect("attest");
        assert_eq!(att.subject_names(), vec!["ghcr.io/example/tool:1.0".to_string()]);
    }

    #[test]
    fn test_attest_without_digest_fails() {
        let result =
            VexCtl::new().attest(vex("openvex/undated.openvex.json"), &KnownDigestResolver::new());
        assert!(matches!(
            result,
            Err(VexError::Attestation {
                source: AttestationErrorKind::UnresolvableDigest(_),
                ..
            })
        ));
    }

    #[test]
    fn test_envelope_roundtrip() {
        let ctl = VexCtl::new();
        let doc = vex("openvex/hotfix.openvex.json");
        let att = ctl
            .attest(doc.clone(), &KnownDigestResolver::new())
            .expect("attest");

        let envelope = DsseEnvelope::in_toto(&attestation_bytes(&att).expect("bytes"));
        assert_eq!(envelope.payload_type, IN_TOTO_PAYLOAD_TYPE);

        let docs = ctl.read_signed_vex(&[envelope]).expect("read");
        assert_eq!(docs, vec![doc]);
    }
}

// ============================================================================
// Verification
// ============================================================================

mod verify_tests {
    use super::*;

    #[test]
    fn test_verify_bare_attestation() {
        let att = parse_attestation_with_context(&fixture_path("attestation/hotfix.intoto.json"))
            .expect("parse");
        VexCtl::new()
            .verify(&att, &att.predicate)
            .expect("every image is a subject");
    }

    #[test]
    fn test_verify_enveloped_attestation() {
        let content = std::fs::read_to_string(fixture_path("attestation/hotfix.dsse.json"))
            .expect("read fixture");
        let att = parse_attestation_str(&content).expect("parse");
        assert_eq!(att.subject.len(), 2);
        VexCtl::new()
            .verify(&att, &vex("openvex/hotfix.openvex.json"))
            .expect("every image is a subject");
    }

    #[test]
    fn test_read_signed_fixture() {
        let content = std::fs::read_to_string(fixture_path("attestation/hotfix.dsse.json"))
            .expect("read fixture");
        let envelope: DsseEnvelope = serde_json::from_str(&content).expect("envelope");
        let docs = VexCtl::new().read_signed_vex(&[envelope]).expect("read");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id(), Some("https://example.com/vex/hotfix-2023-02"));
    }

    #[test]
    fn test_verify_missing_subject() {
        let att =
            parse_attestation_with_context(&fixture_path("attestation/wrong-subject.intoto.json"))
                .expect("parse");
        match VexCtl::new().verify(&att, &att.predicate) {
            Err(VexError::Attestation {
                source: AttestationErrorKind::MissingSubject { product, subjects },
                ..
            }) => {
                assert_eq!(product, app_image());
                assert_eq!(subjects, vec!["ghcr.io/example/other:2.0".to_string()]);
            }
            other => panic!("expected MissingSubject, got {other:?}"),
        }
    }
}
