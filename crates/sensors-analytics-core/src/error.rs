// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors for analytics records.

use thiserror::Error;

/// Result type for record validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when an event or item record is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("{field} must not be empty")]
	Empty { field: &'static str },

	#[error("{field} is too long ({len} > {max})")]
	TooLong {
		field: &'static str,
		len: usize,
		max: usize,
	},

	#[error("invalid key name: {0:?}")]
	InvalidKey(String),

	#[error("reserved key name: {0:?}")]
	ReservedKey(String),

	#[error("event name is required for {0} records")]
	MissingEventName(&'static str),

	#[error("value of property {key:?} is too long ({len} > {max} bytes)")]
	ValueTooLong { key: String, len: usize, max: usize },

	#[error("unsupported value type for property {key:?}")]
	UnsupportedValue { key: String },

	#[error("property {key:?} must be a number for profile_increment")]
	NotANumber { key: String },

	#[error("property {key:?} must be a list of strings for profile_append")]
	NotAStringList { key: String },

	#[error("identities must not be empty")]
	EmptyIdentities,

	#[error("identity {key:?} has an empty value")]
	EmptyIdentityValue { key: String },

	#[error("{operation} expects {expected} identities, got {actual}")]
	IdentityCount {
		operation: &'static str,
		expected: &'static str,
		actual: usize,
	},
}
