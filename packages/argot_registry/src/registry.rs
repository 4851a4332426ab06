//! Thread-safe table of container names to handler bundles.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::types::{
    Capability, DecodeCall, DecodeResult, EncodeCall, EncodeResult, HandlerCall, HandlerResult,
    KeyGenerationCall, KeyGenerationResult,
};

pub type KeyGenerationHandler =
    Arc<dyn Fn(KeyGenerationCall) -> KeyGenerationResult + Send + Sync>;
pub type DecodeHandler = Arc<dyn Fn(DecodeCall) -> DecodeResult + Send + Sync>;
pub type EncodeHandler = Arc<dyn Fn(EncodeCall) -> EncodeResult + Send + Sync>;

/// The set of optional callbacks one container name answers with. A bundle
/// that leaves a capability unset makes requests for that capability
/// undeliverable, which the session treats as fatal misconfiguration.
#[derive(Clone, Default)]
pub struct HandlerBundle {
    generate_keys: Option<KeyGenerationHandler>,
    decode_message: Option<DecodeHandler>,
    encode_message: Option<EncodeHandler>,
}

impl HandlerBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generate_keys<F>(mut self, handler: F) -> Self
    where
        F: Fn(KeyGenerationCall) -> KeyGenerationResult + Send + Sync + 'static,
    {
        self.generate_keys = Some(Arc::new(handler));
        self
    }

    pub fn with_decode_message<F>(mut self, handler: F) -> Self
    where
        F: Fn(DecodeCall) -> DecodeResult + Send + Sync + 'static,
    {
        self.decode_message = Some(Arc::new(handler));
        self
    }

    pub fn with_encode_message<F>(mut self, handler: F) -> Self
    where
        F: Fn(EncodeCall) -> EncodeResult + Send + Sync + 'static,
    {
        self.encode_message = Some(Arc::new(handler));
        self
    }

    /// Whether this bundle provides a callback for `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::GenerateKeys => self.generate_keys.is_some(),
            Capability::DecodeMessage => self.decode_message.is_some(),
            Capability::EncodeMessage => self.encode_message.is_some(),
        }
    }

    /// Invoke the callback matching `call`, or `None` if the bundle leaves
    /// that capability unset.
    pub fn dispatch(&self, call: HandlerCall) -> Option<HandlerResult> {
        match call {
            HandlerCall::GenerateKeys(call) => self
                .generate_keys
                .as_ref()
                .map(|handler| HandlerResult::GenerateKeys(handler(call))),
            HandlerCall::Decode(call) => self
                .decode_message
                .as_ref()
                .map(|handler| HandlerResult::Decode(handler(call))),
            HandlerCall::Encode(call) => self
                .encode_message
                .as_ref()
                .map(|handler| HandlerResult::Encode(handler(call))),
        }
    }
}

impl fmt::Debug for HandlerBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBundle")
            .field("generate_keys", &self.generate_keys.is_some())
            .field("decode_message", &self.decode_message.is_some())
            .field("encode_message", &self.encode_message.is_some())
            .finish()
    }
}

/// Container-name to handler-bundle table. Registration usually happens at
/// startup, but the table stays safe to mutate while a session is reading it,
/// so late registration is allowed.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    entries: RwLock<HashMap<String, HandlerBundle>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bundle` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, bundle: HandlerBundle) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(name.into(), bundle);
    }

    /// The bundle registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<HandlerBundle> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(name).cloned()
    }

    /// Registered names, unordered.
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.keys().cloned().collect()
    }
}
