//! Closed registry of supported identity providers.

// self
use crate::_prelude::*;

/// Identity providers that a success-shaped envelope may originate from.
///
/// The wire identifier is the provider id string carried by the identity record; the registry
/// binds at [`build`](crate::EnvelopeBuilder::build) time, not at decode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provider {
	/// Google federated sign-in.
	Google,
	/// Facebook federated sign-in.
	Facebook,
	/// Twitter federated sign-in (OAuth1-style token plus secret).
	Twitter,
	/// GitHub federated sign-in.
	Github,
	/// Email/password sign-in handled by the identity backend itself.
	Email,
	/// Phone-number (OTP) sign-in handled by the identity backend itself.
	Phone,
}
impl Provider {
	/// Resolves a provider id string against the supported set.
	pub fn from_provider_id(id: &str) -> Option<Self> {
		Some(match id {
			"google.com" => Provider::Google,
			"facebook.com" => Provider::Facebook,
			"twitter.com" => Provider::Twitter,
			"github.com" => Provider::Github,
			"password" => Provider::Email,
			"phone" => Provider::Phone,
			_ => return None,
		})
	}

	/// Returns the provider id string used on the wire.
	pub fn as_str(self) -> &'static str {
		match self {
			Provider::Google => "google.com",
			Provider::Facebook => "facebook.com",
			Provider::Twitter => "twitter.com",
			Provider::Github => "github.com",
			Provider::Email => "password",
			Provider::Phone => "phone",
		}
	}

	/// Returns `true` for federated (social/OAuth) providers, whose sign-in always yields an
	/// IdP token.
	pub fn is_social(self) -> bool {
		matches!(self, Provider::Google | Provider::Facebook | Provider::Twitter | Provider::Github)
	}

	/// Returns `true` if the provider additionally issues a token secret.
	pub fn requires_secret(self) -> bool {
		matches!(self, Provider::Twitter)
	}
}
impl Display for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Provider {
	type Err = UnsupportedProviderError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_provider_id(s).ok_or_else(|| UnsupportedProviderError { provider_id: s.into() })
	}
}
impl From<Provider> for String {
	fn from(provider: Provider) -> Self {
		provider.as_str().into()
	}
}
impl TryFrom<String> for Provider {
	type Error = UnsupportedProviderError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

/// Error returned when a provider id string names no supported provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
#[error("Unknown provider: {provider_id}.")]
pub struct UnsupportedProviderError {
	/// Provider id string that failed to resolve.
	pub provider_id: String,
}
