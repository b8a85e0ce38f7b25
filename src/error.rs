//! Sign-in failure taxonomy carried inside failure-shaped envelopes.

// self
use crate::_prelude::*;

/// Raw result code returned by [`SignInEnvelope::raw_error_code`](crate::SignInEnvelope) for a
/// successful envelope. Matches the platform "ok" sentinel legacy consumers branch on.
pub const RESULT_OK: i32 = -1;

/// Closed set of sign-in failure codes.
///
/// Codes are stable integers on the wire; decoding an integer outside the set fails rather than
/// being mapped to a catch-all variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ErrorCode {
	/// Catch-all wrap for a non-taxonomy failure raised by a provider SDK call.
	UnknownError,
	/// Sign-in could not reach the identity backend.
	NoNetwork,
	/// The surrounding flow was misconfigured by the integrating application.
	DeveloperError,
	/// The identity provider rejected the sign-in attempt.
	ProviderError,
	/// Sign-in succeeded at the provider but collides with an existing anonymous session;
	/// the envelope carries the pending credential so the caller can offer account linking.
	AnonymousUpgradeMergeConflict,
	/// The signed-in account's email does not match the email the flow started with.
	EmailMismatch,
}
impl ErrorCode {
	/// Returns the stable integer code used on the wire.
	pub fn code(self) -> i32 {
		match self {
			ErrorCode::UnknownError => 0,
			ErrorCode::NoNetwork => 1,
			ErrorCode::DeveloperError => 3,
			ErrorCode::ProviderError => 4,
			ErrorCode::AnonymousUpgradeMergeConflict => 5,
			ErrorCode::EmailMismatch => 6,
		}
	}
}
impl From<ErrorCode> for i32 {
	fn from(code: ErrorCode) -> Self {
		code.code()
	}
}
impl TryFrom<i32> for ErrorCode {
	type Error = UnknownErrorCode;

	fn try_from(raw: i32) -> Result<Self, Self::Error> {
		Ok(match raw {
			0 => ErrorCode::UnknownError,
			1 => ErrorCode::NoNetwork,
			3 => ErrorCode::DeveloperError,
			4 => ErrorCode::ProviderError,
			5 => ErrorCode::AnonymousUpgradeMergeConflict,
			6 => ErrorCode::EmailMismatch,
			_ => return Err(UnknownErrorCode { raw }),
		})
	}
}
impl Display for ErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{self:?}({})", self.code())
	}
}

/// Error returned when an integer on the wire names no [`ErrorCode`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
#[error("Unknown sign-in error code {raw}.")]
pub struct UnknownErrorCode {
	/// Integer that failed to resolve.
	pub raw: i32,
}

/// Immutable sign-in failure carried inside a failure-shaped envelope.
///
/// This is the only channel by which the flow collaborator learns of a sign-in failure; it is
/// always carried inside an envelope, never thrown across the transport boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ThisError)]
#[error("{message}")]
pub struct AuthError {
	code: ErrorCode,
	message: String,
	#[source]
	cause: Option<ErrorCause>,
}
impl AuthError {
	/// Creates a failure with the given code and human-readable message.
	pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
		Self { code, message: message.into(), cause: None }
	}

	/// Wraps a non-taxonomy failure as [`ErrorCode::UnknownError`], keeping the original
	/// reachable as this error's cause.
	pub fn unknown(source: impl Display) -> Self {
		let cause = ErrorCause::new(source.to_string());

		Self {
			code: ErrorCode::UnknownError,
			message: "Sign-in failed with an unexpected error.".into(),
			cause: Some(cause),
		}
	}

	/// Attaches a captured cause.
	pub fn with_cause(mut self, cause: ErrorCause) -> Self {
		self.cause = Some(cause);

		self
	}

	/// Returns the taxonomy code.
	pub fn code(&self) -> ErrorCode {
		self.code
	}

	/// Returns the human-readable message.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Returns the wrapped cause, if one was captured.
	pub fn cause(&self) -> Option<&ErrorCause> {
		self.cause.as_ref()
	}
}

/// Serializable capture of a foreign error wrapped into an [`AuthError`].
///
/// Only the rendered message survives the wire; the capture still participates in the standard
/// `Error::source` chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ThisError)]
#[error("{0}")]
pub struct ErrorCause(String);
impl ErrorCause {
	/// Captures a rendered error message.
	pub fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}

	/// Captures the message of a live error value.
	pub fn capture(err: &(dyn StdError + 'static)) -> Self {
		Self(err.to_string())
	}

	/// Returns the captured message.
	pub fn message(&self) -> &str {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn error_codes_round_trip_as_integers() {
		for code in [
			ErrorCode::UnknownError,
			ErrorCode::NoNetwork,
			ErrorCode::DeveloperError,
			ErrorCode::ProviderError,
			ErrorCode::AnonymousUpgradeMergeConflict,
			ErrorCode::EmailMismatch,
		] {
			let encoded =
				serde_json::to_value(code).expect("Error code should serialize as an integer.");

			assert_eq!(encoded, Value::from(code.code()));

			let decoded: ErrorCode = serde_json::from_value(encoded)
				.expect("Stable integer codes should decode back to the same variant.");

			assert_eq!(decoded, code);
		}
	}

	#[test]
	fn unknown_integer_codes_fail_decoding() {
		assert!(serde_json::from_value::<ErrorCode>(Value::from(2)).is_err());
		assert!(serde_json::from_value::<ErrorCode>(Value::from(42)).is_err());
	}

	#[test]
	fn unknown_wrap_keeps_the_cause_reachable() {
		let io = std::io::Error::other("socket closed");
		let err = AuthError::unknown(&io);

		assert_eq!(err.code(), ErrorCode::UnknownError);
		assert_eq!(err.cause().expect("Wrapped cause should be captured.").message(), io.to_string());

		let source = StdError::source(&err).expect("Cause should surface via Error::source.");

		assert_eq!(source.to_string(), "socket closed");
	}

	#[test]
	fn auth_error_round_trips_with_nested_cause() {
		let err = AuthError::new(ErrorCode::ProviderError, "Provider rejected the assertion.")
			.with_cause(ErrorCause::new("status 403"));
		let encoded = serde_json::to_value(&err).expect("Auth error should serialize.");
		let decoded: AuthError =
			serde_json::from_value(encoded).expect("Auth error should deserialize.");

		assert_eq!(decoded, err);
	}
}
