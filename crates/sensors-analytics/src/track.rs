// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Record construction and dispatch.
//!
//! Each function builds one record from caller input, validates it and hands
//! it to the consumer. Validation and consumer errors are returned unchanged.
//!
//! Caller properties are taken by value and augmented on that copy:
//! `$time` is extracted and removed, and `$lib`, `$lib_version` and
//! `$is_login_id` are injected where applicable.

use sensors_analytics_core::{
	CallSite, EventData, EventType, Identity, Item, ItemAction, LibProperties, Properties,
	IS_LOGIN_ID_KEY, LIB_KEY, LIB_VERSION_KEY, TIME_KEY,
};
use tracing::{debug, warn};

use crate::client::ClientConfig;
use crate::consumer::Consumer;
use crate::error::Result;
use crate::{LIB_NAME, SDK_VERSION};

/// Input for a distinct-id keyed event.
#[derive(Debug, Clone)]
pub struct EventRequest<'a> {
	pub event_type: EventType,
	/// Event name; ignored for types that carry none.
	pub event: &'a str,
	pub distinct_id: &'a str,
	/// Anonymous id being signed up; only used for `track_signup`.
	pub original_id: Option<&'a str>,
	pub properties: Option<Properties>,
	pub is_login_id: bool,
	pub call_site: Option<CallSite>,
}

impl<'a> EventRequest<'a> {
	pub fn new(event_type: EventType, event: &'a str, distinct_id: &'a str) -> Self {
		Self {
			event_type,
			event,
			distinct_id,
			original_id: None,
			properties: None,
			is_login_id: false,
			call_site: None,
		}
	}

	pub fn properties(mut self, properties: Option<Properties>) -> Self {
		self.properties = properties;
		self
	}

	pub fn original_id(mut self, original_id: &'a str) -> Self {
		self.original_id = Some(original_id);
		self
	}

	pub fn login_id(mut self, is_login_id: bool) -> Self {
		self.is_login_id = is_login_id;
		self
	}

	pub fn call_site(mut self, call_site: Option<CallSite>) -> Self {
		self.call_site = call_site;
		self
	}
}

/// Builds, validates and sends an event keyed by a single distinct id.
pub fn track_event(
	consumer: &dyn Consumer,
	config: &ClientConfig,
	request: EventRequest<'_>,
) -> Result<()> {
	let mut properties = request.properties.unwrap_or_default();
	let time = event_time(&mut properties);

	let mut data = EventData::new(
		request.event_type,
		time,
		request.distinct_id,
		Properties::new(),
		lib_properties(request.call_site),
	);
	data.project = config.project_name.clone();

	if matches!(request.event_type, EventType::Track | EventType::TrackSignup) {
		data.event = Some(request.event.to_string());
		stamp_lib(&mut properties);
	}

	if request.event_type == EventType::TrackSignup {
		data.original_id = request.original_id.map(str::to_string);
	}

	data.time_free = config.time_free;

	if request.is_login_id {
		properties.set(IS_LOGIN_ID_KEY, true);
	}

	data.properties = properties;
	data.normalize()?;

	debug!(
		event_type = %data.event_type,
		event = ?data.event,
		distinct_id = %data.distinct_id,
		"Dispatching event"
	);
	consumer.send(data)
}

/// Builds, validates and sends an event keyed by an identity set.
///
/// The distinct id is the login identity when present, otherwise another
/// identity from the set.
pub fn track_event_by_identity(
	consumer: &dyn Consumer,
	config: &ClientConfig,
	identity: &Identity,
	event_type: EventType,
	event: &str,
	properties: Option<Properties>,
	call_site: Option<CallSite>,
) -> Result<()> {
	let mut properties = properties.unwrap_or_default();
	let time = event_time(&mut properties);

	let mut data = EventData::new(
		event_type,
		time,
		String::new(),
		Properties::new(),
		lib_properties(call_site),
	);
	data.identities = Some(identity.clone());
	data.check_identities()?;

	data.distinct_id = identity.distinct_id().unwrap_or_default().to_string();
	data.project = config.project_name.clone();

	if matches!(
		event_type,
		EventType::Track | EventType::Bind | EventType::Unbind
	) {
		data.event = Some(event.to_string());
		stamp_lib(&mut properties);
	}

	data.time_free = config.time_free;
	data.properties = properties;
	data.normalize()?;

	debug!(
		event_type = %data.event_type,
		event = ?data.event,
		distinct_id = %data.distinct_id,
		identities = identity.len(),
		"Dispatching identity event"
	);
	consumer.send(data)
}

/// Builds, validates and sends an item record.
pub fn item_track(
	consumer: &dyn Consumer,
	config: &ClientConfig,
	action: ItemAction,
	item_type: &str,
	item_id: &str,
	properties: Option<Properties>,
	call_site: Option<CallSite>,
) -> Result<()> {
	let item = Item {
		action,
		item_type: item_type.to_string(),
		item_id: item_id.to_string(),
		time: now_ms(),
		properties: properties.unwrap_or_default(),
		lib: lib_properties(call_site),
		project: config.project_name.clone(),
	};
	item.normalize()?;

	debug!(action = %item.action, item_type, item_id, "Dispatching item");
	consumer.item_send(item)
}

/// Builds the `lib` object for a record.
pub fn lib_properties(call_site: Option<CallSite>) -> LibProperties {
	LibProperties::new(LIB_NAME, SDK_VERSION, call_site)
}

fn now_ms() -> i64 {
	chrono::Utc::now().timestamp_millis()
}

/// Resolves the event time: a positive `$time` override, else now.
fn event_time(properties: &mut Properties) -> i64 {
	match extract_user_time(properties) {
		Some(ms) if ms > 0 => ms,
		_ => now_ms(),
	}
}

/// Pulls an integer `$time` out of the properties.
///
/// The key is always removed. A value of any other representation is
/// logged and dropped so it never reaches record validation.
fn extract_user_time(properties: &mut Properties) -> Option<i64> {
	let value = properties.remove(TIME_KEY)?;
	let ms = value.as_i64();
	if ms.is_none() {
		warn!(
			value = %value,
			"Ignoring {TIME_KEY}: expected integer milliseconds"
		);
	}
	ms
}

fn stamp_lib(properties: &mut Properties) {
	properties.set(LIB_KEY, LIB_NAME);
	properties.set(LIB_VERSION_KEY, SDK_VERSION);
}
