// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Library provenance metadata attached to every record.
//!
//! The `$lib_detail` field carries a call-site fingerprint of the code that
//! invoked the SDK, formatted as `##<function>##<file>##<line>`. The
//! fingerprint is supplied by the caller (see [`CallSite`]); when none is
//! given the field is left out of the payload.

use serde::{Deserialize, Serialize};

/// Value of `$lib_method` for events produced from code.
pub const LIB_METHOD_CODE: &str = "code";

/// Where an SDK call originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
	pub function: Option<&'static str>,
	pub file: &'static str,
	pub line: u32,
}

impl CallSite {
	/// Captures the location of the caller.
	///
	/// Wrap this in `#[track_caller]` functions to report the location of
	/// their own caller instead.
	#[track_caller]
	pub fn caller() -> Self {
		let location = std::panic::Location::caller();
		Self {
			function: None,
			file: location.file(),
			line: location.line(),
		}
	}

	/// Sets the function component of the fingerprint.
	pub fn with_function(mut self, function: &'static str) -> Self {
		self.function = Some(function);
		self
	}

	/// Formats the fingerprint as a `$lib_detail` value.
	pub fn detail(&self) -> String {
		format!(
			"##{}##{}##{}",
			self.function.unwrap_or_default(),
			self.file,
			self.line
		)
	}
}

/// Captures a [`CallSite`] at the macro invocation, using the enclosing
/// module path as the function component.
#[macro_export]
macro_rules! call_site {
	() => {
		$crate::CallSite {
			function: Some(module_path!()),
			file: file!(),
			line: line!(),
		}
	};
}

/// The `lib` object of an outgoing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibProperties {
	#[serde(rename = "$lib")]
	pub lib: String,
	#[serde(rename = "$lib_version")]
	pub lib_version: String,
	#[serde(rename = "$lib_method")]
	pub lib_method: String,
	#[serde(
		rename = "$lib_detail",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub lib_detail: Option<String>,
}

impl LibProperties {
	pub fn new(lib: &str, lib_version: &str, call_site: Option<CallSite>) -> Self {
		Self {
			lib: lib.to_string(),
			lib_version: lib_version.to_string(),
			lib_method: LIB_METHOD_CODE.to_string(),
			lib_detail: call_site.map(|site| site.detail()),
		}
	}
}
