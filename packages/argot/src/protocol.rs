//! Wire frames exchanged between a translation container and the
//! orchestrator.
//!
//! Every capability stream starts with a [`ContainerFrame::Register`]
//! handshake naming the container and capability; afterwards the
//! orchestrator sends request frames and the container answers with the
//! matching response frame. Frames travel as tagged JSON inside the
//! length-prefixed framing from [`crate::transport::framing`]; byte fields
//! are base64 strings on the wire.

use argot_registry::Capability;
use serde::{Deserialize, Serialize};

/// Key material entry as it appears on the wire. Empty strings encode
/// absent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    #[serde(default)]
    pub value: String,
    #[serde(default, with = "b64")]
    pub encryption_key: Vec<u8>,
    #[serde(default, with = "b64")]
    pub decryption_key: Vec<u8>,
}

/// Requests the orchestrator sends down a registered capability stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrchestratorFrame {
    KeyGeneration {
        container_name: String,
        profile: String,
        parameter_name: String,
        parameter_value: String,
    },
    DecodeMessage {
        container_name: String,
        profile: String,
        uuid: String,
        orchestrator_encrypts: bool,
        #[serde(default)]
        keys: Vec<KeyEntry>,
        #[serde(default, with = "b64")]
        payload: Vec<u8>,
    },
    EncodeMessage {
        container_name: String,
        profile: String,
        uuid: String,
        orchestrator_encrypts: bool,
        #[serde(default)]
        keys: Vec<KeyEntry>,
        /// JSON document to re-encode into the agent's dialect.
        #[serde(default, with = "b64")]
        payload: Vec<u8>,
    },
}

impl OrchestratorFrame {
    /// Frame kind for logs and mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            OrchestratorFrame::KeyGeneration { .. } => "key_generation",
            OrchestratorFrame::DecodeMessage { .. } => "decode_message",
            OrchestratorFrame::EncodeMessage { .. } => "encode_message",
        }
    }
}

/// Responses (and the stream handshake) a container sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContainerFrame {
    /// Stream handshake: claims `capability` traffic for `container_name`.
    Register {
        container_name: String,
        capability: Capability,
    },
    KeyGeneration {
        container_name: String,
        success: bool,
        #[serde(default)]
        error: String,
        #[serde(default, with = "b64")]
        encryption_key: Vec<u8>,
        #[serde(default, with = "b64")]
        decryption_key: Vec<u8>,
    },
    DecodeMessage {
        container_name: String,
        success: bool,
        #[serde(default)]
        error: String,
        /// Serialized structured message for the orchestrator.
        #[serde(default, with = "b64")]
        payload: Vec<u8>,
    },
    EncodeMessage {
        container_name: String,
        success: bool,
        #[serde(default)]
        error: String,
        /// Raw bytes for the agent.
        #[serde(default, with = "b64")]
        payload: Vec<u8>,
    },
}

mod b64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
