//! Conversion between wire frames and handler calls/results.
//!
//! The codec is pure and per-message. Inbound frames become [`HandlerCall`]s
//! with every listed key normalized to present material; outbound results
//! become response frames with absent keys flattened to empty bytes. A
//! structured result that fails to serialize is reported as a failed
//! exchange in the response rather than aborting the stream.

use argot_registry::{
    Capability, DecodeCall, EncodeCall, HandlerCall, HandlerResult, KeyGenerationCall, KeyMaterial,
};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::protocol::{ContainerFrame, KeyEntry, OrchestratorFrame};

/// A frame arrived on a stream registered for a different capability.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unexpected {got} frame on {expected} stream")]
pub struct CapabilityMismatch {
    pub expected: Capability,
    pub got: &'static str,
}

/// The handshake frame a worker sends right after opening its stream.
pub fn register(container_name: &str, capability: Capability) -> ContainerFrame {
    ContainerFrame::Register {
        container_name: container_name.to_string(),
        capability,
    }
}

/// Decode an inbound request frame into the handler call for `capability`.
pub fn decode_call(
    capability: Capability,
    frame: OrchestratorFrame,
) -> Result<HandlerCall, CapabilityMismatch> {
    match (capability, frame) {
        (
            Capability::GenerateKeys,
            OrchestratorFrame::KeyGeneration {
                container_name,
                profile,
                parameter_name,
                parameter_value,
            },
        ) => Ok(HandlerCall::GenerateKeys(KeyGenerationCall {
            container_name,
            profile,
            parameter_name,
            parameter_value,
        })),
        (
            Capability::DecodeMessage,
            OrchestratorFrame::DecodeMessage {
                container_name,
                profile,
                uuid,
                orchestrator_encrypts,
                keys,
                payload,
            },
        ) => Ok(HandlerCall::Decode(DecodeCall {
            container_name,
            profile,
            uuid,
            orchestrator_encrypts,
            keys: keys.into_iter().map(key_material).collect(),
            payload,
        })),
        (
            Capability::EncodeMessage,
            OrchestratorFrame::EncodeMessage {
                container_name,
                profile,
                uuid,
                orchestrator_encrypts,
                keys,
                payload,
            },
        ) => {
            let message = parse_structured(&payload, &uuid);
            Ok(HandlerCall::Encode(EncodeCall {
                container_name,
                profile,
                uuid,
                orchestrator_encrypts,
                keys: keys.into_iter().map(key_material).collect(),
                message,
            }))
        }
        (expected, frame) => Err(CapabilityMismatch {
            expected,
            got: frame.kind(),
        }),
    }
}

/// Encode a handler result into the response frame for the container name
/// the request declared.
pub fn encode_result(container_name: &str, result: HandlerResult) -> ContainerFrame {
    match result {
        HandlerResult::GenerateKeys(result) => ContainerFrame::KeyGeneration {
            container_name: container_name.to_string(),
            success: result.success,
            error: result.error,
            encryption_key: result.encryption_key.unwrap_or_default(),
            decryption_key: result.decryption_key.unwrap_or_default(),
        },
        HandlerResult::Decode(result) => match serde_json::to_vec(&result.message) {
            Ok(payload) => ContainerFrame::DecodeMessage {
                container_name: container_name.to_string(),
                success: result.success,
                error: result.error,
                payload,
            },
            Err(error) => ContainerFrame::DecodeMessage {
                container_name: container_name.to_string(),
                success: false,
                error: error.to_string(),
                payload: Vec::new(),
            },
        },
        HandlerResult::Encode(result) => ContainerFrame::EncodeMessage {
            container_name: container_name.to_string(),
            success: result.success,
            error: result.error,
            payload: result.payload,
        },
    }
}

/// Every wire key entry becomes present key material; empty keys stay empty
/// but present, so handlers see exactly what was sent.
fn key_material(entry: KeyEntry) -> KeyMaterial {
    KeyMaterial {
        value: entry.value,
        encryption_key: Some(entry.encryption_key),
        decryption_key: Some(entry.decryption_key),
    }
}

/// Parse a structured payload. Malformed input does not fail the exchange:
/// the handler still runs, with an empty object.
fn parse_structured(payload: &[u8], uuid: &str) -> Value {
    match serde_json::from_slice(payload) {
        Ok(value) => value,
        Err(error) => {
            warn!(%uuid, %error, "failed to parse structured payload, passing an empty object through");
            Value::Object(serde_json::Map::new())
        }
    }
}
