//! Key-value transport boundary between the envelope and the flow collaborator.
//!
//! The collaborator hands results around as an opaque container of named slots; the envelope is
//! the sole payload and travels under the single fixed [`ENVELOPE_SLOT`] key.

// std
use std::collections::BTreeMap;
// self
use crate::{
	_prelude::*,
	codec::{self, CodecError},
	envelope::SignInEnvelope,
};

/// Fixed slot key under which the envelope travels.
pub const ENVELOPE_SLOT: &str = "idp_envelope.sign_in_envelope";

/// Opaque key-value container exchanged with the flow collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultContainer {
	slots: BTreeMap<String, Value>,
}
impl ResultContainer {
	/// Creates an empty container.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a payload under the given slot key, replacing any previous payload.
	pub fn insert(&mut self, key: impl Into<String>, payload: Value) {
		self.slots.insert(key.into(), payload);
	}

	/// Returns the payload stored under the given slot key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.slots.get(key)
	}

	/// Removes and returns the payload stored under the given slot key.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.slots.remove(key)
	}
}

impl SignInEnvelope {
	/// Wraps the envelope in a transport container under [`ENVELOPE_SLOT`].
	pub fn to_transport(&self) -> Result<ResultContainer, CodecError> {
		let mut container = ResultContainer::new();

		container.insert(ENVELOPE_SLOT, codec::encode(self)?);

		Ok(container)
	}

	/// Extracts the envelope from the flow's result container.
	///
	/// An absent container yields `Ok(None)`: the flow produced no result at all. A container
	/// that is present but holds no envelope slot is corrupt input on the legitimate wire path
	/// and fails with [`CodecError::MissingSlot`] rather than being reported as absent.
	pub fn from_transport(container: Option<&ResultContainer>) -> Result<Option<Self>, CodecError> {
		let Some(container) = container else { return Ok(None) };
		let payload =
			container.get(ENVELOPE_SLOT).ok_or(CodecError::MissingSlot { key: ENVELOPE_SLOT })?;

		codec::decode(payload.clone()).map(Some)
	}
}

/// Captures a provider failure and wraps it for transport in one step.
///
/// Convenience composition of [`SignInEnvelope::from_error`] and
/// [`SignInEnvelope::to_transport`] for collaborators that catch provider SDK errors.
pub fn error_transport(err: Box<dyn StdError + Send + Sync>) -> Result<ResultContainer, CodecError> {
	SignInEnvelope::from_error(err).to_transport()
}
