// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event records: tracked events, profile updates and ID-mapping events.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::identity::Identity;
use crate::lib_properties::LibProperties;
use crate::properties::Properties;
use crate::validate::{
	check_id, check_key, check_numeric_values, check_properties, check_string_list_values,
};

/// Reserved property holding a caller-supplied event time in milliseconds.
pub const TIME_KEY: &str = "$time";
/// Reserved property holding the library name.
pub const LIB_KEY: &str = "$lib";
/// Reserved property holding the library version.
pub const LIB_VERSION_KEY: &str = "$lib_version";
/// Reserved property flagging that the distinct id is a login id.
pub const IS_LOGIN_ID_KEY: &str = "$is_login_id";

/// Event name used for sign-up events.
pub const SIGNUP_EVENT: &str = "$SignUp";
/// Event name used for identity bind events.
pub const BIND_EVENT: &str = "$BindID";
/// Event name used for identity unbind events.
pub const UNBIND_EVENT: &str = "$UnbindID";

/// The `type` tag of an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
	Track,
	TrackSignup,
	ProfileSet,
	ProfileSetOnce,
	ProfileIncrement,
	ProfileAppend,
	ProfileUnset,
	ProfileDelete,
	#[serde(rename = "track_id_bind")]
	Bind,
	#[serde(rename = "track_id_unbind")]
	Unbind,
}

impl EventType {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventType::Track => "track",
			EventType::TrackSignup => "track_signup",
			EventType::ProfileSet => "profile_set",
			EventType::ProfileSetOnce => "profile_set_once",
			EventType::ProfileIncrement => "profile_increment",
			EventType::ProfileAppend => "profile_append",
			EventType::ProfileUnset => "profile_unset",
			EventType::ProfileDelete => "profile_delete",
			EventType::Bind => "track_id_bind",
			EventType::Unbind => "track_id_unbind",
		}
	}

	/// Returns true for types whose records carry an event name.
	pub fn has_event_name(&self) -> bool {
		matches!(
			self,
			EventType::Track | EventType::TrackSignup | EventType::Bind | EventType::Unbind
		)
	}
}

impl std::fmt::Display for EventType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single event record as handed to a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
	#[serde(rename = "type")]
	pub event_type: EventType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub event: Option<String>,
	/// Event time in milliseconds since the Unix epoch.
	pub time: i64,
	pub distinct_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub identities: Option<Identity>,
	pub properties: Properties,
	pub lib: LibProperties,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project: Option<String>,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub time_free: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub original_id: Option<String>,
}

impl EventData {
	/// Creates a record with no event name, project or identities.
	pub fn new(
		event_type: EventType,
		time: i64,
		distinct_id: impl Into<String>,
		properties: Properties,
		lib: LibProperties,
	) -> Self {
		Self {
			event_type,
			event: None,
			time,
			distinct_id: distinct_id.into(),
			identities: None,
			properties,
			lib,
			project: None,
			time_free: false,
			original_id: None,
		}
	}

	/// Validates the record structure.
	pub fn normalize(&self) -> Result<()> {
		check_id("distinct_id", &self.distinct_id)?;

		if self.event_type.has_event_name() {
			match &self.event {
				Some(event) => check_key(event)?,
				None => return Err(ValidationError::MissingEventName(self.event_type.as_str())),
			}
		}

		if let Some(project) = &self.project {
			check_key(project)?;
		}

		if self.event_type == EventType::TrackSignup {
			check_id("original_id", self.original_id.as_deref().unwrap_or_default())?;
		}

		if let Some(identities) = &self.identities {
			identities.check()?;
		}

		check_properties(&self.properties)?;
		match self.event_type {
			EventType::ProfileIncrement => {
				check_numeric_values(&self.properties, &[IS_LOGIN_ID_KEY])?
			}
			EventType::ProfileAppend => {
				check_string_list_values(&self.properties, &[IS_LOGIN_ID_KEY])?
			}
			_ => {}
		}

		Ok(())
	}

	/// Validates the identity set of an ID-mapping record.
	pub fn check_identities(&self) -> Result<()> {
		let identities = self
			.identities
			.as_ref()
			.ok_or(ValidationError::EmptyIdentities)?;
		identities.check()?;

		match self.event_type {
			EventType::Bind if identities.len() < 2 => Err(ValidationError::IdentityCount {
				operation: "bind",
				expected: "at least 2",
				actual: identities.len(),
			}),
			EventType::Unbind if identities.len() != 1 => Err(ValidationError::IdentityCount {
				operation: "unbind",
				expected: "exactly 1",
				actual: identities.len(),
			}),
			_ => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::identity::{ANONYMOUS_ID, LOGIN_ID};
	use serde_json::json;

	fn lib() -> LibProperties {
		LibProperties::new("Rust", "2.1.0", None)
	}

	fn track(event: &str) -> EventData {
		let mut data = EventData::new(EventType::Track, 1_700_000_000_000, "u1", Properties::new(), lib());
		data.event = Some(event.to_string());
		data
	}

	#[test]
	fn test_event_type_wire_names() {
		for ty in [
			EventType::Track,
			EventType::TrackSignup,
			EventType::ProfileSetOnce,
			EventType::Bind,
			EventType::Unbind,
		] {
			let json = serde_json::to_value(ty).unwrap();
			assert_eq!(json, json!(ty.as_str()));
		}
		assert_eq!(EventType::Bind.to_string(), "track_id_bind");
	}

	#[test]
	fn test_serializes_minimal_record() {
		let json = serde_json::to_value(track("purchase")).unwrap();
		assert_eq!(
			json,
			json!({
				"type": "track",
				"event": "purchase",
				"time": 1_700_000_000_000i64,
				"distinct_id": "u1",
				"properties": {},
				"lib": {"$lib": "Rust", "$lib_version": "2.1.0", "$lib_method": "code"},
			})
		);
	}

	#[test]
	fn test_serializes_optional_fields_when_set() {
		let mut data = track("purchase");
		data.project = Some("production".to_string());
		data.time_free = true;
		let json = serde_json::to_value(&data).unwrap();
		assert_eq!(json["project"], "production");
		assert_eq!(json["time_free"], true);
	}

	#[test]
	fn test_normalize_accepts_valid_track() {
		let mut data = track("purchase");
		data.properties.set("price", 12.5);
		assert!(data.normalize().is_ok());
	}

	#[test]
	fn test_normalize_requires_event_name_for_track() {
		let mut data = track("purchase");
		data.event = None;
		assert_eq!(
			data.normalize(),
			Err(ValidationError::MissingEventName("track"))
		);
	}

	#[test]
	fn test_normalize_rejects_empty_distinct_id() {
		let mut data = track("purchase");
		data.distinct_id.clear();
		assert_eq!(
			data.normalize(),
			Err(ValidationError::Empty {
				field: "distinct_id"
			})
		);
	}

	#[test]
	fn test_normalize_requires_original_id_for_signup() {
		let mut data = track(SIGNUP_EVENT);
		data.event_type = EventType::TrackSignup;
		assert!(data.normalize().is_err());

		data.original_id = Some("anon-1".to_string());
		assert!(data.normalize().is_ok());
	}

	#[test]
	fn test_normalize_rejects_bad_property_key() {
		let mut data = track("purchase");
		data.properties.set("time", 1);
		assert!(matches!(
			data.normalize(),
			Err(ValidationError::ReservedKey(_))
		));
	}

	#[test]
	fn test_profile_increment_requires_numbers() {
		let mut data = EventData::new(
			EventType::ProfileIncrement,
			1,
			"u1",
			Properties::new().insert("points", 5).insert(IS_LOGIN_ID_KEY, true),
			lib(),
		);
		assert!(data.normalize().is_ok());

		data.properties.set("level", "gold");
		assert!(matches!(
			data.normalize(),
			Err(ValidationError::NotANumber { .. })
		));
	}

	#[test]
	fn test_profile_append_requires_string_lists() {
		let data = EventData::new(
			EventType::ProfileAppend,
			1,
			"u1",
			Properties::new().insert("interests", 3),
			lib(),
		);
		assert!(matches!(
			data.normalize(),
			Err(ValidationError::NotAStringList { .. })
		));
	}

	#[test]
	fn test_check_identities_requires_a_set() {
		let data = track("purchase");
		assert_eq!(data.check_identities(), Err(ValidationError::EmptyIdentities));
	}

	#[test]
	fn test_bind_needs_two_identities() {
		let mut data = track(BIND_EVENT);
		data.event_type = EventType::Bind;
		data.identities = Some(Identity::new().with(LOGIN_ID, "u1"));
		assert!(matches!(
			data.check_identities(),
			Err(ValidationError::IdentityCount { actual: 1, .. })
		));

		data.identities = Some(Identity::new().with(LOGIN_ID, "u1").with(ANONYMOUS_ID, "d1"));
		assert!(data.check_identities().is_ok());
	}

	#[test]
	fn test_unbind_needs_exactly_one_identity() {
		let mut data = track(UNBIND_EVENT);
		data.event_type = EventType::Unbind;
		data.identities = Some(Identity::new().with(LOGIN_ID, "u1").with(ANONYMOUS_ID, "d1"));
		assert!(data.check_identities().is_err());

		data.identities = Some(Identity::new().with(ANONYMOUS_ID, "d1"));
		assert!(data.check_identities().is_ok());
	}
}
