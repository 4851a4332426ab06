//! Reference handler bundle: a keyless JSON passthrough translator.
//!
//! Agents speak plain JSON, so decode and encode are direct transcodes and
//! key generation hands out a random 32-byte pre-shared key pair. Useful
//! for wiring checks against a live orchestrator and as a template for
//! real translators.

use argot_registry::{DecodeResult, EncodeResult, HandlerBundle, KeyGenerationResult};
use serde_json::Value;

pub fn bundle() -> HandlerBundle {
    HandlerBundle::new()
        .with_generate_keys(|_call| {
            let key: [u8; 32] = rand::random();
            KeyGenerationResult {
                success: true,
                error: String::new(),
                encryption_key: Some(key.to_vec()),
                decryption_key: Some(key.to_vec()),
            }
        })
        .with_decode_message(|call| match serde_json::from_slice::<Value>(&call.payload) {
            Ok(message) => DecodeResult {
                success: true,
                error: String::new(),
                message,
            },
            Err(error) => DecodeResult {
                success: false,
                error: error.to_string(),
                message: Value::Null,
            },
        })
        .with_encode_message(|call| match serde_json::to_vec(&call.message) {
            Ok(payload) => EncodeResult {
                success: true,
                error: String::new(),
                payload,
            },
            Err(error) => EncodeResult {
                success: false,
                error: error.to_string(),
                payload: Vec::new(),
            },
        })
}

#[cfg(test)]
mod tests {
    use argot_registry::{Capability, DecodeCall, EncodeCall, HandlerCall, HandlerResult};
    use serde_json::json;

    use super::*;

    #[test]
    fn generates_a_symmetric_key_pair() {
        let bundle = bundle();
        let call = HandlerCall::GenerateKeys(Default::default());

        match bundle.dispatch(call) {
            Some(HandlerResult::GenerateKeys(result)) => {
                assert!(result.success);
                let enc = result.encryption_key.unwrap();
                let dec = result.decryption_key.unwrap();
                assert_eq!(enc.len(), 32);
                assert_eq!(enc, dec);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn decode_transcodes_json_and_reports_bad_input() {
        let bundle = bundle();
        for capability in Capability::ALL {
            assert!(bundle.supports(capability));
        }

        let ok = bundle.dispatch(HandlerCall::Decode(DecodeCall {
            payload: br#"{"action":"checkin"}"#.to_vec(),
            ..Default::default()
        }));
        match ok {
            Some(HandlerResult::Decode(result)) => {
                assert!(result.success);
                assert_eq!(result.message, json!({"action": "checkin"}));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let bad = bundle.dispatch(HandlerCall::Decode(DecodeCall {
            payload: b"\x00\x01".to_vec(),
            ..Default::default()
        }));
        match bad {
            Some(HandlerResult::Decode(result)) => {
                assert!(!result.success);
                assert!(!result.error.is_empty());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn encode_serializes_the_structured_message() {
        let bundle = bundle();
        let result = bundle.dispatch(HandlerCall::Encode(EncodeCall {
            message: json!({"status": "ok"}),
            ..Default::default()
        }));

        match result {
            Some(HandlerResult::Encode(result)) => {
                assert!(result.success);
                let round: Value = serde_json::from_slice(&result.payload).unwrap();
                assert_eq!(round, json!({"status": "ok"}));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
