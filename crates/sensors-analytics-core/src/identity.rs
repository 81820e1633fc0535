// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity sets used by the ID-mapping APIs.
//!
//! An actor can be known under several identity types at once (an anonymous
//! device id, a login id, an email address). The login identity is the
//! preferred distinct id when one is present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::validate::{check_id, check_key};

/// Identity key of the primary login identity.
pub const LOGIN_ID: &str = "$identity_login_id";
/// Identity key of an anonymous (device/cookie) identity.
pub const ANONYMOUS_ID: &str = "$identity_anonymous_id";
pub const EMAIL_ID: &str = "$identity_email";
pub const MOBILE_ID: &str = "$identity_mobile";

/// Mapping from identity type to identity value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity {
	identities: BTreeMap<String, String>,
}

impl Identity {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an identity (builder style).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.identities.insert(key.into(), value.into());
		self
	}

	/// Adds a `$identity_login_id` identity.
	pub fn with_login_id(self, value: impl Into<String>) -> Self {
		self.with(LOGIN_ID, value)
	}

	/// Adds a `$identity_anonymous_id` identity.
	pub fn with_anonymous_id(self, value: impl Into<String>) -> Self {
		self.with(ANONYMOUS_ID, value)
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.identities.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.identities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.identities.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
		self.identities.iter()
	}

	/// Picks the representative distinct id for this set.
	///
	/// The login identity wins when present and non-empty. Otherwise the
	/// first identity in key order is used. Returns `None` for an empty set.
	pub fn distinct_id(&self) -> Option<&str> {
		match self.get(LOGIN_ID) {
			Some(login) if !login.is_empty() => Some(login),
			_ => self.identities.values().next().map(String::as_str),
		}
	}

	/// Checks that the set is non-empty with valid keys and values.
	pub fn check(&self) -> Result<()> {
		if self.identities.is_empty() {
			return Err(ValidationError::EmptyIdentities);
		}
		for (key, value) in &self.identities {
			check_key(key)?;
			if value.is_empty() {
				return Err(ValidationError::EmptyIdentityValue { key: key.clone() });
			}
			check_id("identity value", value)?;
		}
		Ok(())
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Identity {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			identities: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}
