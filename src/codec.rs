//! Explicit envelope codec, decoupled from any platform transport.
//!
//! `encode`/`decode` are pure functions over [`serde_json::Value`]; shape invariants are
//! re-checked on decode, so a payload that violates them fails with the offending path instead
//! of being silently normalized.

// self
use crate::{_prelude::*, envelope::SignInEnvelope};

/// Failures raised at the codec and transport boundary.
#[derive(Debug, ThisError)]
pub enum CodecError {
	/// Envelope could not be serialized.
	#[error("Envelope could not be encoded.")]
	Encode(#[source] serde_json::Error),
	/// Payload could not be decoded into a shape-valid envelope.
	#[error("Payload could not be decoded into an envelope.")]
	Decode(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// Transport container was present but held no envelope slot.
	#[error("Transport container holds no `{key}` slot.")]
	MissingSlot {
		/// Slot key that was expected.
		key: &'static str,
	},
}

/// Encodes an envelope into its wire value.
pub fn encode(envelope: &SignInEnvelope) -> Result<Value, CodecError> {
	serde_json::to_value(envelope).map_err(CodecError::Encode)
}

/// Decodes a wire value into an envelope, rejecting any payload that violates the envelope's
/// shape invariants.
pub fn decode(value: Value) -> Result<SignInEnvelope, CodecError> {
	match serde_path_to_error::deserialize(value) {
		Ok(envelope) => Ok(envelope),
		Err(e) => {
			#[cfg(feature = "tracing")]
			tracing::debug!(path = %e.path(), "Rejected a non-conforming envelope payload.");

			Err(CodecError::Decode(e))
		},
	}
}
