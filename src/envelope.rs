//! The immutable sign-in envelope, its builder, and its shape invariants.

// self
use crate::{
	_prelude::*,
	error::RESULT_OK,
	identity::{CredentialRef, IdentityRecord, IdpSecret},
	provider::Provider,
};

/// Outcome of a single sign-in attempt through an identity provider.
///
/// Exactly one of two shapes, frozen at construction:
///
/// - success: an [`IdentityRecord`] plus optional IdP token/secret;
/// - failure: an [`AuthError`], plus the pending credential when (and only when) the failure is
///   an anonymous-upgrade merge conflict.
///
/// The only construction paths are [`SignInEnvelope::builder`],
/// [`SignInEnvelope::from_pending_credential`], and [`SignInEnvelope::from_error`]; decoding
/// re-checks the same shape rules and rejects non-conforming data.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "EnvelopeParts", into = "EnvelopeParts")]
pub struct SignInEnvelope {
	record: Option<IdentityRecord>,
	token: Option<IdpSecret>,
	secret: Option<IdpSecret>,
	pending_credential: Option<CredentialRef>,
	error: Option<AuthError>,
}
impl SignInEnvelope {
	/// Returns a builder assembling a success envelope from an identity record.
	pub fn builder(record: IdentityRecord) -> EnvelopeBuilder {
		EnvelopeBuilder::from_record(record)
	}

	/// Captures a sign-in failure.
	///
	/// An [`AuthError`] is carried as-is; any other error is wrapped as
	/// [`ErrorCode::UnknownError`] with the original reachable as its cause.
	pub fn from_error(err: Box<dyn StdError + Send + Sync>) -> Self {
		let error = match err.downcast::<AuthError>() {
			Ok(known) => *known,
			Err(other) => AuthError::unknown(other),
		};

		Self::failure(error)
	}

	/// Captures an anonymous-upgrade merge conflict, retaining the provider credential so the
	/// caller can offer account linking.
	pub fn from_pending_credential(credential: CredentialRef) -> Self {
		Self {
			record: None,
			token: None,
			secret: None,
			pending_credential: Some(credential),
			error: Some(AuthError::new(
				ErrorCode::AnonymousUpgradeMergeConflict,
				"Sign-in succeeded but conflicts with an existing anonymous session.",
			)),
		}
	}

	fn success(
		record: IdentityRecord,
		token: Option<IdpSecret>,
		secret: Option<IdpSecret>,
	) -> Self {
		Self { record: Some(record), token, secret, pending_credential: None, error: None }
	}

	fn failure(error: AuthError) -> Self {
		Self {
			record: None,
			token: None,
			secret: None,
			pending_credential: None,
			error: Some(error),
		}
	}

	/// Returns `true` iff the sign-in attempt succeeded.
	pub fn is_successful(&self) -> bool {
		self.error.is_none()
	}

	/// Returns the identity record. `Some` exactly when the envelope is successful.
	pub fn record(&self) -> Option<&IdentityRecord> {
		self.record.as_ref()
	}

	/// Returns the provider id the sign-in went through. `Some` exactly when successful.
	pub fn provider_id(&self) -> Option<&str> {
		self.record.as_ref().map(IdentityRecord::provider_id)
	}

	/// Returns the email used to sign in, if the record carries one.
	pub fn email(&self) -> Option<&str> {
		self.record.as_ref().and_then(IdentityRecord::email)
	}

	/// Returns the phone number used to sign in, if the record carries one.
	pub fn phone_number(&self) -> Option<&str> {
		self.record.as_ref().and_then(IdentityRecord::phone_number)
	}

	/// Returns the token received from the IdP, if one was stored.
	pub fn idp_token(&self) -> Option<&str> {
		self.token.as_ref().map(IdpSecret::expose)
	}

	/// Twitter only. Returns the token secret received from the IdP, if one was stored.
	pub fn idp_secret(&self) -> Option<&str> {
		self.secret.as_ref().map(IdpSecret::expose)
	}

	/// Returns the credential retained across a merge conflict, if any.
	pub fn pending_credential(&self) -> Option<&CredentialRef> {
		self.pending_credential.as_ref()
	}

	/// Returns the failure. `Some` exactly when the envelope is failure-shaped.
	pub fn error(&self) -> Option<&AuthError> {
		self.error.as_ref()
	}

	/// Returns the raw integer result code: [`RESULT_OK`] when successful, otherwise the
	/// failure's [`ErrorCode`] integer.
	#[deprecated(note = "Branch on `error()` instead of raw result codes.")]
	pub fn raw_error_code(&self) -> i32 {
		self.error.as_ref().map_or(RESULT_OK, |error| error.code().code())
	}

	fn check_shape(&self) -> Result<(), IntegrityError> {
		match (&self.record, &self.error) {
			(Some(_), Some(_)) => return Err(IntegrityError::AmbiguousShape),
			(None, None) => return Err(IntegrityError::MissingOutcome),
			_ => {},
		}

		if self.error.is_some() && (self.token.is_some() || self.secret.is_some()) {
			return Err(IntegrityError::SecretOnFailure);
		}
		if self.pending_credential.is_some()
			&& self.error.as_ref().map(AuthError::code)
				!= Some(ErrorCode::AnonymousUpgradeMergeConflict)
		{
			return Err(IntegrityError::DanglingPendingCredential);
		}

		Ok(())
	}
}
// The pending credential is transient linking state, not part of what the envelope asserts
// about the sign-in; equality and hashing cover (record, token, secret, error) only.
impl PartialEq for SignInEnvelope {
	fn eq(&self, other: &Self) -> bool {
		self.record == other.record
			&& self.token == other.token
			&& self.secret == other.secret
			&& self.error == other.error
	}
}
impl Eq for SignInEnvelope {}
impl Hash for SignInEnvelope {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.record.hash(state);
		self.token.hash(state);
		self.secret.hash(state);
		self.error.hash(state);
	}
}

/// Wire mirror of the envelope; field order is the serialization contract.
#[derive(Serialize, Deserialize)]
struct EnvelopeParts {
	record: Option<IdentityRecord>,
	token: Option<IdpSecret>,
	secret: Option<IdpSecret>,
	pending_credential: Option<CredentialRef>,
	error: Option<AuthError>,
}
impl From<SignInEnvelope> for EnvelopeParts {
	fn from(envelope: SignInEnvelope) -> Self {
		Self {
			record: envelope.record,
			token: envelope.token,
			secret: envelope.secret,
			pending_credential: envelope.pending_credential,
			error: envelope.error,
		}
	}
}
impl TryFrom<EnvelopeParts> for SignInEnvelope {
	type Error = IntegrityError;

	fn try_from(parts: EnvelopeParts) -> Result<Self, Self::Error> {
		let envelope = Self {
			record: parts.record,
			token: parts.token,
			secret: parts.secret,
			pending_credential: parts.pending_credential,
			error: parts.error,
		};

		envelope.check_shape()?;

		Ok(envelope)
	}
}

/// Shape violations rejected when decoding an envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IntegrityError {
	/// Both an identity record and an error were present.
	#[error("Envelope carries both an identity record and an error.")]
	AmbiguousShape,
	/// Neither an identity record nor an error was present.
	#[error("Envelope carries neither an identity record nor an error.")]
	MissingOutcome,
	/// A failure-shaped envelope carried IdP token or secret material.
	#[error("Failure envelope carries IdP token or secret material.")]
	SecretOnFailure,
	/// A pending credential was present outside a merge-conflict failure.
	#[error("Pending credential is only valid on an anonymous-upgrade merge conflict.")]
	DanglingPendingCredential,
}

/// Errors raised by [`EnvelopeBuilder::build`].
///
/// These are programmer-error-class failures (the builder was misused); they are returned to the
/// caller directly and never carried inside an envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum BuildError {
	/// The record's provider id names no supported provider.
	#[error("Unknown provider: {provider_id}.")]
	UnknownProvider {
		/// Provider id string that failed to resolve.
		provider_id: String,
	},
	/// A federated provider was used without an IdP token.
	#[error("Token cannot be empty when using the {provider} provider.")]
	MissingToken {
		/// Provider that requires a token.
		provider: Provider,
	},
	/// The Twitter provider was used without a token secret.
	#[error("Secret cannot be empty when using the {provider} provider.")]
	MissingSecret {
		/// Provider that requires a secret.
		provider: Provider,
	},
}

enum BuilderSource {
	Record(IdentityRecord),
	PendingCredential(CredentialRef),
}

/// Builder for [`SignInEnvelope`]; the sole external path to a success envelope.
///
/// It is seeded with either an identity record (success path) or a pending credential
/// (merge-conflict path), so an ambiguous or empty source cannot be expressed. All cross-field
/// validation happens at [`build`](Self::build); the setters accept anything.
pub struct EnvelopeBuilder {
	source: BuilderSource,
	token: Option<IdpSecret>,
	secret: Option<IdpSecret>,
}
impl EnvelopeBuilder {
	/// Seeds the builder with the identity record of a successful sign-in.
	pub fn from_record(record: IdentityRecord) -> Self {
		Self { source: BuilderSource::Record(record), token: None, secret: None }
	}

	/// Seeds the builder with the pending credential of a merge conflict. Token and secret
	/// setters are ignored on this path.
	pub fn from_pending_credential(credential: CredentialRef) -> Self {
		Self { source: BuilderSource::PendingCredential(credential), token: None, secret: None }
	}

	/// Sets the token received from the IdP.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(IdpSecret::new(token));

		self
	}

	/// Sets the token secret received from the IdP (Twitter only).
	pub fn secret(mut self, secret: impl Into<String>) -> Self {
		self.secret = Some(IdpSecret::new(secret));

		self
	}

	/// Validates the assembled fields and freezes the envelope.
	pub fn build(self) -> Result<SignInEnvelope, BuildError> {
		let record = match self.source {
			BuilderSource::PendingCredential(credential) =>
				return Ok(SignInEnvelope::from_pending_credential(credential)),
			BuilderSource::Record(record) => record,
		};
		let provider = Provider::from_provider_id(record.provider_id()).ok_or_else(|| {
			BuildError::UnknownProvider { provider_id: record.provider_id().into() }
		})?;

		if provider.is_social() && is_blank(self.token.as_ref()) {
			return Err(BuildError::MissingToken { provider });
		}
		if provider.requires_secret() && is_blank(self.secret.as_ref()) {
			return Err(BuildError::MissingSecret { provider });
		}

		Ok(SignInEnvelope::success(record, self.token, self.secret))
	}
}

// Absent and empty are equivalent for token material, matching what collaborators hand over.
fn is_blank(secret: Option<&IdpSecret>) -> bool {
	secret.is_none_or(IdpSecret::is_empty)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn google_record() -> IdentityRecord {
		IdentityRecord::new("google.com").with_email("a@b.com")
	}

	fn credential_fixture() -> CredentialRef {
		CredentialRef::new("google.com", serde_json::json!({ "id_token": "pending" }))
	}

	#[test]
	fn success_and_failure_shapes_are_disjoint() {
		let success = SignInEnvelope::builder(google_record())
			.token("tok")
			.build()
			.expect("Google success fixture should build.");

		assert!(success.is_successful());
		assert!(success.record().is_some());
		assert!(success.error().is_none());

		let failure = SignInEnvelope::from_error(Box::new(std::io::Error::other("offline")));

		assert!(!failure.is_successful());
		assert!(failure.record().is_none());
		assert!(failure.error().is_some());
	}

	#[test]
	fn success_accessors_surface_the_record() {
		let envelope = SignInEnvelope::builder(google_record())
			.token("tok")
			.build()
			.expect("Google success fixture should build.");

		assert_eq!(envelope.provider_id(), Some("google.com"));
		assert_eq!(envelope.email(), Some("a@b.com"));
		assert_eq!(envelope.phone_number(), None);
		assert_eq!(envelope.idp_token(), Some("tok"));
		assert_eq!(envelope.idp_secret(), None);
	}

	#[test]
	fn merge_conflict_carries_the_pending_credential() {
		let envelope = SignInEnvelope::from_pending_credential(credential_fixture());

		assert!(!envelope.is_successful());
		assert_eq!(
			envelope.error().expect("Conflict envelope should be failure-shaped.").code(),
			ErrorCode::AnonymousUpgradeMergeConflict,
		);
		assert!(envelope.pending_credential().is_some());

		let built = EnvelopeBuilder::from_pending_credential(credential_fixture())
			.token("ignored")
			.secret("ignored")
			.build()
			.expect("Conflict builder should always build.");

		assert!(built.idp_token().is_none(), "Setters must be ignored on the conflict path.");
		assert_eq!(built, envelope);
	}

	#[test]
	fn builder_rejects_unknown_providers() {
		let err = SignInEnvelope::builder(IdentityRecord::new("unknown"))
			.build()
			.expect_err("Unknown provider must be rejected.");

		assert_eq!(err, BuildError::UnknownProvider { provider_id: "unknown".into() });
	}

	#[test]
	fn builder_requires_tokens_for_social_providers() {
		let missing = SignInEnvelope::builder(IdentityRecord::new("facebook.com"))
			.build()
			.expect_err("Social provider without a token must be rejected.");

		assert_eq!(missing, BuildError::MissingToken { provider: Provider::Facebook });

		let empty = SignInEnvelope::builder(IdentityRecord::new("facebook.com"))
			.token("")
			.build()
			.expect_err("Empty token counts as missing.");

		assert_eq!(empty, BuildError::MissingToken { provider: Provider::Facebook });
	}

	#[test]
	fn builder_requires_a_secret_for_twitter() {
		let err = SignInEnvelope::builder(IdentityRecord::new("twitter.com"))
			.token("t")
			.secret("")
			.build()
			.expect_err("Twitter without a secret must be rejected.");

		assert_eq!(err, BuildError::MissingSecret { provider: Provider::Twitter });

		SignInEnvelope::builder(IdentityRecord::new("twitter.com"))
			.token("t")
			.secret("s")
			.build()
			.expect("Twitter with token and secret should build.");
	}

	#[test]
	fn email_provider_is_exempt_from_the_token_rule() {
		let envelope = SignInEnvelope::builder(IdentityRecord::new("password"))
			.build()
			.expect("Email provider should build without a token.");

		assert!(envelope.is_successful());
		assert!(envelope.idp_token().is_none());
	}

	#[test]
	fn from_error_wraps_foreign_errors_as_unknown() {
		let envelope = SignInEnvelope::from_error(Box::new(std::io::Error::other("dns down")));
		let error = envelope.error().expect("Failure envelope should carry the error.");

		assert_eq!(error.code(), ErrorCode::UnknownError);
		assert_eq!(
			error.cause().expect("Original failure should be kept as the cause.").message(),
			"dns down",
		);
	}

	#[test]
	fn from_error_keeps_taxonomy_errors_unchanged() {
		let known = AuthError::new(ErrorCode::NoNetwork, "Offline.");
		let envelope = SignInEnvelope::from_error(Box::new(known.clone()));

		assert_eq!(envelope.error(), Some(&known));
	}

	#[test]
	fn equality_ignores_the_pending_credential() {
		let with_credential = SignInEnvelope::from_pending_credential(credential_fixture());
		let other_credential = SignInEnvelope::from_pending_credential(CredentialRef::new(
			"facebook.com",
			serde_json::json!({ "access_token": "other" }),
		));

		assert_eq!(with_credential, other_credential);

		let hash = |envelope: &SignInEnvelope| {
			let mut hasher = std::hash::DefaultHasher::new();

			envelope.hash(&mut hasher);

			hasher.finish()
		};

		assert_eq!(hash(&with_credential), hash(&other_credential));
	}

	#[test]
	#[allow(deprecated)]
	fn raw_error_code_uses_the_ok_sentinel() {
		let success = SignInEnvelope::builder(IdentityRecord::new("phone"))
			.build()
			.expect("Phone success fixture should build.");

		assert_eq!(success.raw_error_code(), RESULT_OK);

		let failure = SignInEnvelope::from_error(Box::new(AuthError::new(
			ErrorCode::EmailMismatch,
			"Email changed mid-flow.",
		)));

		assert_eq!(failure.raw_error_code(), ErrorCode::EmailMismatch.code());
	}
}
