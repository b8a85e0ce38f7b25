//! Immutable identity-provider sign-in envelope—invariant-checked construction, a closed error
//! taxonomy, and exact transport round-tripping in one crate built for production.
//!
//! The envelope captures the outcome of a single sign-in attempt against a third-party identity
//! provider. It is either success-shaped (an identity record plus optional provider token/secret)
//! or failure-shaped (an [`error::AuthError`], optionally carrying the pending credential of an
//! anonymous-upgrade merge conflict). The two shapes are disjoint and enforced both at
//! construction time and when decoding from the wire.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod provider;
pub mod transport;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		hash::{Hash, Hasher},
		str::FromStr,
	};

	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;

	pub use crate::error::{AuthError, ErrorCode};
}

pub use envelope::{EnvelopeBuilder, SignInEnvelope};
