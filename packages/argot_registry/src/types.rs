//! Capabilities and the call/result shapes handlers are written against.

use std::fmt;

use serde::{Deserialize, Serialize};

// --- Capability ---

/// One distinct kind of exchange with the orchestrator. Each capability is
/// served over its own long-lived stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Produce fresh encryption/decryption key material for an agent.
    GenerateKeys,
    /// Translate a raw agent payload into the orchestrator's structured form.
    DecodeMessage,
    /// Translate a structured orchestrator message into the agent's raw form.
    EncodeMessage,
}

impl Capability {
    /// Every capability, in stream-registration order.
    pub const ALL: [Capability; 3] = [
        Capability::GenerateKeys,
        Capability::DecodeMessage,
        Capability::EncodeMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::GenerateKeys => "generate_keys",
            Capability::DecodeMessage => "decode_message",
            Capability::EncodeMessage => "encode_message",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Key material ---

/// Opaque key material attached to a translation request. Either side of the
/// pair may be absent (asymmetric or keyless schemes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMaterial {
    /// The key parameter value as configured on the profile.
    pub value: String,
    pub encryption_key: Option<Vec<u8>>,
    pub decryption_key: Option<Vec<u8>>,
}

// --- Calls and results, one pair per capability ---

/// Request for fresh key material for one profile parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyGenerationCall {
    /// Name the orchestrator addressed; selects the registry entry.
    pub container_name: String,
    /// Communication profile the keys are for.
    pub profile: String,
    pub parameter_name: String,
    pub parameter_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyGenerationResult {
    pub success: bool,
    /// Empty on success.
    pub error: String,
    pub encryption_key: Option<Vec<u8>>,
    pub decryption_key: Option<Vec<u8>>,
}

/// Request to translate raw agent bytes into the orchestrator's structured
/// form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeCall {
    pub container_name: String,
    pub profile: String,
    /// Message uuid assigned by the orchestrator, echoed for correlation.
    pub uuid: String,
    /// Whether the orchestrator holds the keys and performs crypto itself.
    pub orchestrator_encrypts: bool,
    pub keys: Vec<KeyMaterial>,
    /// Bytes exactly as the agent produced them.
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeResult {
    pub success: bool,
    pub error: String,
    /// The structured message the orchestrator should process.
    pub message: serde_json::Value,
}

/// Request to translate a structured orchestrator message into the agent's
/// wire form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeCall {
    pub container_name: String,
    pub profile: String,
    pub uuid: String,
    pub orchestrator_encrypts: bool,
    pub keys: Vec<KeyMaterial>,
    pub message: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeResult {
    pub success: bool,
    pub error: String,
    /// Bytes to hand back to the agent.
    pub payload: Vec<u8>,
}

// --- Dispatch envelopes ---

/// A decoded inbound request, one variant per capability.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerCall {
    GenerateKeys(KeyGenerationCall),
    Decode(DecodeCall),
    Encode(EncodeCall),
}

impl HandlerCall {
    /// The container name the orchestrator addressed this request to. Routing
    /// uses this name, not the name the process was configured with.
    pub fn container_name(&self) -> &str {
        match self {
            HandlerCall::GenerateKeys(call) => &call.container_name,
            HandlerCall::Decode(call) => &call.container_name,
            HandlerCall::Encode(call) => &call.container_name,
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            HandlerCall::GenerateKeys(_) => Capability::GenerateKeys,
            HandlerCall::Decode(_) => Capability::DecodeMessage,
            HandlerCall::Encode(_) => Capability::EncodeMessage,
        }
    }
}

/// A handler's answer to one [`HandlerCall`].
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerResult {
    GenerateKeys(KeyGenerationResult),
    Decode(DecodeResult),
    Encode(EncodeResult),
}
