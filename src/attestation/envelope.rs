//! Reading VEX documents out of signed DSSE envelopes.

use super::types::{Attestation, IN_TOTO_PAYLOAD_TYPE};
use crate::error::{AttestationErrorKind, Result, VexError};
use crate::model::{VexDocument, CONTEXT, TYPE_URI};
use base64::{engine::general_purpose::STANDARD as base64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A DSSE envelope as produced by signing tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DsseEnvelope {
    pub payload_type: String,
    /// Standard base64 encoding of the signed payload
    pub payload: String,
    #[serde(default)]
    pub signatures: Vec<DsseSignature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DsseSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyid: Option<String>,
    pub sig: String,
}

impl DsseEnvelope {
    /// Wrap an in-toto statement payload. Signatures are left to the signer.
    #[must_use]
    pub fn in_toto(payload: &[u8]) -> Self {
        Self {
            payload_type: IN_TOTO_PAYLOAD_TYPE.to_string(),
            payload: base64.encode(payload),
            signatures: Vec::new(),
        }
    }

    /// Decode the base64 payload.
    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        base64.decode(self.payload.trim()).map_err(|e| {
            VexError::attestation(
                "decoding signed attestation",
                AttestationErrorKind::InvalidEnvelope(e.to_string()),
            )
        })
    }
}

#[derive(Deserialize)]
struct RawStatement {
    #[serde(rename = "predicateType")]
    predicate_type: String,
    #[serde(default)]
    predicate: Value,
}

fn is_openvex_predicate(predicate_type: &str) -> bool {
    predicate_type == TYPE_URI || predicate_type == CONTEXT
}

/// Extract the VEX document from a signed envelope.
///
/// Envelopes that do not hold an in-toto statement, or whose statement is
/// not an OpenVEX attestation, yield `Ok(None)`.
pub fn read_signed_vex(envelope: &DsseEnvelope) -> Result<Option<VexDocument>> {
    if envelope.payload_type != IN_TOTO_PAYLOAD_TYPE {
        tracing::info!("Signed envelope does not contain an in-toto attestation");
        return Ok(None);
    }

    let data = envelope.decode_payload()?;
    let statement: RawStatement = serde_json::from_slice(&data).map_err(|e| {
        VexError::attestation(
            "unmarshalling attestation JSON",
            AttestationErrorKind::InvalidEnvelope(e.to_string()),
        )
    })?;

    if !is_openvex_predicate(&statement.predicate_type) {
        tracing::debug!(
            "skipping attestation with predicate type {}",
            statement.predicate_type
        );
        return Ok(None);
    }

    let doc = serde_json::from_value(statement.predicate).map_err(|e| {
        VexError::attestation(
            "decoding OpenVEX predicate",
            AttestationErrorKind::InvalidEnvelope(e.to_string()),
        )
    })?;
    Ok(Some(doc))
}

/// Parse an attestation given either as a bare in-toto statement or wrapped
/// in a DSSE envelope.
pub fn parse_attestation_str(content: &str) -> Result<Attestation> {
    let value: Value = serde_json::from_str(content).map_err(|e| {
        VexError::attestation(
            "decoding attestation JSON",
            AttestationErrorKind::InvalidEnvelope(e.to_string()),
        )
    })?;

    let statement = if value.get("payloadType").is_some() {
        let envelope: DsseEnvelope = serde_json::from_value(value).map_err(|e| {
            VexError::attestation(
                "decoding DSSE envelope",
                AttestationErrorKind::InvalidEnvelope(e.to_string()),
            )
        })?;
        if envelope.payload_type != IN_TOTO_PAYLOAD_TYPE {
            return Err(VexError::attestation(
                "decoding DSSE envelope",
                AttestationErrorKind::InvalidEnvelope(format!(
                    "invalid payloadType {} on envelope, expected {IN_TOTO_PAYLOAD_TYPE}",
                    envelope.payload_type
                )),
            ));
        }
        serde_json::from_slice(&envelope.decode_payload()?)
    } else {
        serde_json::from_value(value)
    };

    statement.map_err(|e| {
        VexError::attestation(
            "unmarshalling attestation JSON",
            AttestationErrorKind::InvalidEnvelope(e.to_string()),
        )
    })
}
