//! # argot_registry
//!
//! Handler registry for argot translation containers. A container process
//! registers, per logical container name, a bundle of callbacks covering the
//! three translation capabilities (key generation, decode, encode); the
//! session core looks bundles up by the name each inbound request declares
//! and invokes the matching callback.
//!
//! This crate is deliberately transport-free so handler code can depend on
//! it without pulling in the session stack.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use argot_registry::{HandlerBundle, HandlerRegistry, KeyGenerationResult};
//!
//! let registry = Arc::new(HandlerRegistry::new());
//! registry.register(
//!     "my-translator",
//!     HandlerBundle::new().with_generate_keys(|_call| KeyGenerationResult {
//!         success: true,
//!         error: String::new(),
//!         encryption_key: Some(b"key".to_vec()),
//!         decryption_key: Some(b"key".to_vec()),
//!     }),
//! );
//!
//! assert!(registry.lookup("my-translator").is_some());
//! ```

mod registry;
mod types;

pub use registry::{
    DecodeHandler, EncodeHandler, HandlerBundle, HandlerRegistry, KeyGenerationHandler,
};
pub use types::{
    Capability, DecodeCall, DecodeResult, EncodeCall, EncodeResult, HandlerCall, HandlerResult,
    KeyGenerationCall, KeyGenerationResult, KeyMaterial,
};
