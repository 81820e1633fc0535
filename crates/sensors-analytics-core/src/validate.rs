// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Well-formedness rules shared by event and item records.
//!
//! Key names (event names, property keys, item types, identity keys and
//! project names) must match `[A-Za-z_$][A-Za-z0-9_$]{0,99}` and must not be
//! one of the names the ingestion side reserves for record fields.

use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::properties::Properties;

/// Maximum length of a key name.
pub const MAX_KEY_LEN: usize = 100;
/// Maximum length of a distinct id, original id, identity value or item id.
pub const MAX_ID_LEN: usize = 255;
/// Maximum byte length of a string property value.
pub const MAX_STRING_VALUE_LEN: usize = 8192;

/// Names that collide with record fields, compared case-insensitively.
const RESERVED_KEYS: &[&str] = &[
	"date",
	"datetime",
	"distinct_id",
	"event",
	"events",
	"first_id",
	"id",
	"original_id",
	"properties",
	"second_id",
	"time",
	"user_id",
	"users",
];

const RESERVED_PREFIXES: &[&str] = &["user_group", "user_tag"];

/// Checks a key name against the naming rules.
pub fn check_key(key: &str) -> Result<()> {
	let mut chars = key.chars();
	let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$');
	let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
	if !valid_start || !valid_rest || key.len() > MAX_KEY_LEN {
		return Err(ValidationError::InvalidKey(key.to_string()));
	}

	let lower = key.to_ascii_lowercase();
	if RESERVED_KEYS.contains(&lower.as_str())
		|| RESERVED_PREFIXES.iter().any(|p| lower.starts_with(p))
	{
		return Err(ValidationError::ReservedKey(key.to_string()));
	}

	Ok(())
}

/// Checks an identifier value: non-empty and at most [`MAX_ID_LEN`] characters.
pub fn check_id(field: &'static str, value: &str) -> Result<()> {
	if value.is_empty() {
		return Err(ValidationError::Empty { field });
	}
	let len = value.chars().count();
	if len > MAX_ID_LEN {
		return Err(ValidationError::TooLong {
			field,
			len,
			max: MAX_ID_LEN,
		});
	}
	Ok(())
}

/// Checks a single property value.
///
/// Accepted: strings up to [`MAX_STRING_VALUE_LEN`] bytes, numbers, booleans
/// and arrays of strings.
pub fn check_value(key: &str, value: &Value) -> Result<()> {
	match value {
		Value::String(s) if s.len() > MAX_STRING_VALUE_LEN => Err(ValidationError::ValueTooLong {
			key: key.to_string(),
			len: s.len(),
			max: MAX_STRING_VALUE_LEN,
		}),
		Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
		Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
		_ => Err(ValidationError::UnsupportedValue {
			key: key.to_string(),
		}),
	}
}

/// Checks every key and value in a property map.
pub fn check_properties(properties: &Properties) -> Result<()> {
	for (key, value) in properties.iter() {
		check_key(key)?;
		check_value(key, value)?;
	}
	Ok(())
}

/// Requires every value except those under `exempt` keys to be a number.
pub fn check_numeric_values(properties: &Properties, exempt: &[&str]) -> Result<()> {
	for (key, value) in properties.iter() {
		if !exempt.contains(&key.as_str()) && !value.is_number() {
			return Err(ValidationError::NotANumber { key: key.clone() });
		}
	}
	Ok(())
}

/// Requires every value except those under `exempt` keys to be a list of strings.
pub fn check_string_list_values(properties: &Properties, exempt: &[&str]) -> Result<()> {
	for (key, value) in properties.iter() {
		if exempt.contains(&key.as_str()) {
			continue;
		}
		let is_string_list = value
			.as_array()
			.is_some_and(|items| items.iter().all(Value::is_string));
		if !is_string_list {
			return Err(ValidationError::NotAStringList { key: key.clone() });
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	#[test]
	fn test_accepts_preset_and_custom_keys() {
		for key in ["$lib", "$is_login_id", "$time", "product_id", "_private", "Amount2"] {
			assert!(check_key(key).is_ok(), "{key} should be valid");
		}
	}

	#[test]
	fn test_rejects_malformed_keys() {
		for key in ["", "9lives", "has space", "dash-key", "ünicode"] {
			assert!(
				matches!(check_key(key), Err(ValidationError::InvalidKey(_))),
				"{key:?} should be invalid"
			);
		}
		assert!(check_key(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
		assert!(check_key(&"k".repeat(MAX_KEY_LEN)).is_ok());
	}

	#[test]
	fn test_rejects_reserved_keys_case_insensitively() {
		for key in ["time", "Distinct_Id", "EVENT", "user_group_vip", "user_tag1"] {
			assert!(
				matches!(check_key(key), Err(ValidationError::ReservedKey(_))),
				"{key} should be reserved"
			);
		}
	}

	#[test]
	fn test_id_bounds() {
		assert_eq!(
			check_id("distinct_id", ""),
			Err(ValidationError::Empty {
				field: "distinct_id"
			})
		);
		assert!(check_id("distinct_id", &"a".repeat(MAX_ID_LEN)).is_ok());
		assert!(matches!(
			check_id("item_id", &"a".repeat(MAX_ID_LEN + 1)),
			Err(ValidationError::TooLong { field: "item_id", .. })
		));
	}

	#[test]
	fn test_value_types() {
		assert!(check_value("a", &json!("text")).is_ok());
		assert!(check_value("a", &json!(12.5)).is_ok());
		assert!(check_value("a", &json!(true)).is_ok());
		assert!(check_value("a", &json!(["x", "y"])).is_ok());
		assert!(check_value("a", &json!([])).is_ok());

		assert!(check_value("a", &Value::Null).is_err());
		assert!(check_value("a", &json!({"nested": 1})).is_err());
		assert!(check_value("a", &json!(["x", 1])).is_err());
	}

	#[test]
	fn test_long_string_value_rejected() {
		let long = Value::String("x".repeat(MAX_STRING_VALUE_LEN + 1));
		assert!(matches!(
			check_value("bio", &long),
			Err(ValidationError::ValueTooLong { .. })
		));
	}

	#[test]
	fn test_numeric_check_honours_exemptions() {
		let props = Properties::new()
			.insert("points", 10)
			.insert("$is_login_id", true);
		assert!(check_numeric_values(&props, &["$is_login_id"]).is_ok());
		assert!(check_numeric_values(&props, &[]).is_err());
	}

	#[test]
	fn test_string_list_check() {
		let ok = Properties::new().insert("tags", vec!["a", "b"]);
		assert!(check_string_list_values(&ok, &[]).is_ok());

		let bad = Properties::new().insert("tags", "a");
		assert_eq!(
			check_string_list_values(&bad, &[]),
			Err(ValidationError::NotAStringList {
				key: "tags".to_string()
			})
		);
	}

	proptest! {
		#[test]
		fn test_generated_keys_are_valid(key in "[a-zA-Z$][a-zA-Z0-9_$]{0,20}") {
			let lower = key.to_ascii_lowercase();
			prop_assume!(!RESERVED_KEYS.contains(&lower.as_str()));
			prop_assume!(!RESERVED_PREFIXES.iter().any(|p| lower.starts_with(p)));
			prop_assert!(check_key(&key).is_ok());
		}

		#[test]
		fn test_keys_starting_with_digit_are_invalid(key in "[0-9][a-z0-9_]{0,20}") {
			prop_assert!(check_key(&key).is_err());
		}
	}
}
