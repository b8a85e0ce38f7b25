//! Collaborator-supplied identity data consumed by the envelope.

// self
use crate::_prelude::*;

/// Read-only record describing who signed in, supplied by the flow collaborator.
///
/// The record is opaque to the envelope: the provider id is validated against the supported
/// registry only when a success envelope is built, never when a record is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityRecord {
	provider_id: String,
	email: Option<String>,
	phone_number: Option<String>,
	name: Option<String>,
	photo_url: Option<String>,
}
impl IdentityRecord {
	/// Creates a record for the given provider id.
	pub fn new(provider_id: impl Into<String>) -> Self {
		Self {
			provider_id: provider_id.into(),
			email: None,
			phone_number: None,
			name: None,
			photo_url: None,
		}
	}

	/// Sets the email used to sign in.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Sets the phone number used to sign in.
	pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
		self.phone_number = Some(phone_number.into());

		self
	}

	/// Sets the account's display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the account's profile photo URL.
	pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
		self.photo_url = Some(photo_url.into());

		self
	}

	/// Returns the provider id string.
	pub fn provider_id(&self) -> &str {
		&self.provider_id
	}

	/// Returns the email used to sign in, if known.
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}

	/// Returns the phone number used to sign in, if known.
	pub fn phone_number(&self) -> Option<&str> {
		self.phone_number.as_deref()
	}

	/// Returns the account's display name, if known.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the account's profile photo URL, if known.
	pub fn photo_url(&self) -> Option<&str> {
		self.photo_url.as_deref()
	}
}

/// Opaque handle to a provider credential retained across a merge conflict.
///
/// The claim payload belongs to the collaborator; the envelope only carries it so account
/// linking can be offered after the conflict is resolved. Deliberately excluded from envelope
/// equality.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRef {
	provider_id: String,
	claim: Value,
}
impl CredentialRef {
	/// Wraps a provider credential claim.
	pub fn new(provider_id: impl Into<String>, claim: Value) -> Self {
		Self { provider_id: provider_id.into(), claim }
	}

	/// Returns the provider id the credential belongs to.
	pub fn provider_id(&self) -> &str {
		&self.provider_id
	}

	/// Returns the opaque claim payload. Callers must avoid logging it.
	pub fn claim(&self) -> &Value {
		&self.claim
	}
}
impl Debug for CredentialRef {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRef")
			.field("provider_id", &self.provider_id)
			.field("claim", &"<redacted>")
			.finish()
	}
}

/// Redacted wrapper for IdP token and secret material.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdpSecret(String);
impl IdpSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` if the wrapped value is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for IdpSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for IdpSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("IdpSecret").field(&"<redacted>").finish()
	}
}
impl Display for IdpSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
