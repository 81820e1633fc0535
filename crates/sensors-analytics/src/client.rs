// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The analytics client and its builder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sensors_analytics_core::validate::check_key;
use sensors_analytics_core::{
	CallSite, EventType, Identity, ItemAction, Properties, BIND_EVENT, SIGNUP_EVENT, UNBIND_EVENT,
};
use tracing::{info, warn};

use crate::consumer::Consumer;
use crate::error::{AnalyticsError, Result};
use crate::track::{item_track, track_event, track_event_by_identity, EventRequest};
use crate::{LIB_NAME, SDK_VERSION};

/// Settings applied to every record the client builds.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Project the records are ingested into; the server default when unset.
	pub project_name: Option<String>,
	/// Lets the server accept records with arbitrarily old or new times.
	pub time_free: bool,
	/// Records the caller's file and line in `$lib_detail`.
	pub capture_call_site: bool,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			project_name: None,
			time_free: false,
			capture_call_site: true,
		}
	}
}

/// Builder for constructing a [`SensorsAnalytics`] client.
pub struct SensorsAnalyticsBuilder {
	consumer: Option<Arc<dyn Consumer>>,
	config: ClientConfig,
}

impl SensorsAnalyticsBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			consumer: None,
			config: ClientConfig::default(),
		}
	}

	/// Sets the consumer records are delivered to.
	pub fn consumer(mut self, consumer: impl Consumer + 'static) -> Self {
		self.consumer = Some(Arc::new(consumer));
		self
	}

	/// Sets a consumer shared with other owners.
	pub fn shared_consumer(mut self, consumer: Arc<dyn Consumer>) -> Self {
		self.consumer = Some(consumer);
		self
	}

	/// Sets the project name stamped on every record.
	pub fn project_name(mut self, project: impl Into<String>) -> Self {
		self.config.project_name = Some(project.into());
		self
	}

	/// Marks every event as time-free.
	pub fn time_free(mut self, time_free: bool) -> Self {
		self.config.time_free = time_free;
		self
	}

	/// Enables or disables call-site capture for `$lib_detail`.
	pub fn capture_call_site(mut self, enabled: bool) -> Self {
		self.config.capture_call_site = enabled;
		self
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: ClientConfig) -> Self {
		self.config = config;
		self
	}

	/// Builds the client.
	pub fn build(self) -> Result<SensorsAnalytics> {
		let consumer = self.consumer.ok_or(AnalyticsError::MissingConsumer)?;
		if let Some(project) = &self.config.project_name {
			check_key(project)?;
		}

		info!(
			lib = LIB_NAME,
			sdk_version = SDK_VERSION,
			project = ?self.config.project_name,
			time_free = self.config.time_free,
			"Analytics client initialized"
		);

		Ok(SensorsAnalytics {
			inner: Arc::new(ClientInner {
				consumer,
				config: self.config,
				closed: AtomicBool::new(false),
			}),
		})
	}
}

impl Default for SensorsAnalyticsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ClientInner {
	consumer: Arc<dyn Consumer>,
	config: ClientConfig,
	closed: AtomicBool,
}

/// Client for recording analytics events.
///
/// Every operation builds one record, validates it and hands it to the
/// configured consumer. The client is cheap to clone.
///
/// # Example
///
/// ```
/// use sensors_analytics::{ChannelConsumer, Properties, SensorsAnalytics};
///
/// let (consumer, mut records) = ChannelConsumer::new(100);
/// let sa = SensorsAnalytics::builder()
///     .consumer(consumer)
///     .project_name("default")
///     .build()?;
///
/// sa.track(
///     "user-42",
///     "ViewProduct",
///     Some(Properties::new().insert("product_id", "sku-1")),
///     true,
/// )?;
/// assert!(records.try_recv().is_ok());
/// # Ok::<(), sensors_analytics::AnalyticsError>(())
/// ```
#[derive(Clone)]
pub struct SensorsAnalytics {
	inner: Arc<ClientInner>,
}

impl SensorsAnalytics {
	/// Creates a new builder for constructing a client.
	pub fn builder() -> SensorsAnalyticsBuilder {
		SensorsAnalyticsBuilder::new()
	}

	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// Tracks an event for a distinct id.
	#[track_caller]
	pub fn track(
		&self,
		distinct_id: &str,
		event: &str,
		properties: Option<Properties>,
		is_login_id: bool,
	) -> Result<()> {
		let call_site = self.call_site();
		self.event(
			EventRequest::new(EventType::Track, event, distinct_id)
				.properties(properties)
				.login_id(is_login_id)
				.call_site(call_site),
		)
	}

	/// Records a sign-up linking an anonymous id to a login id.
	#[track_caller]
	pub fn track_signup(
		&self,
		distinct_id: &str,
		original_id: &str,
		properties: Option<Properties>,
	) -> Result<()> {
		let call_site = self.call_site();
		self.event(
			EventRequest::new(EventType::TrackSignup, SIGNUP_EVENT, distinct_id)
				.original_id(original_id)
				.properties(properties)
				.call_site(call_site),
		)
	}

	/// Sets profile properties, overwriting existing values.
	#[track_caller]
	pub fn profile_set(
		&self,
		distinct_id: &str,
		properties: Properties,
		is_login_id: bool,
	) -> Result<()> {
		self.profile(EventType::ProfileSet, distinct_id, Some(properties), is_login_id)
	}

	/// Sets profile properties that are not yet set.
	#[track_caller]
	pub fn profile_set_once(
		&self,
		distinct_id: &str,
		properties: Properties,
		is_login_id: bool,
	) -> Result<()> {
		self.profile(EventType::ProfileSetOnce, distinct_id, Some(properties), is_login_id)
	}

	/// Adds to numeric profile properties.
	#[track_caller]
	pub fn profile_increment(
		&self,
		distinct_id: &str,
		properties: Properties,
		is_login_id: bool,
	) -> Result<()> {
		self.profile(EventType::ProfileIncrement, distinct_id, Some(properties), is_login_id)
	}

	/// Appends to list-valued profile properties.
	#[track_caller]
	pub fn profile_append(
		&self,
		distinct_id: &str,
		properties: Properties,
		is_login_id: bool,
	) -> Result<()> {
		self.profile(EventType::ProfileAppend, distinct_id, Some(properties), is_login_id)
	}

	/// Removes the named profile properties.
	#[track_caller]
	pub fn profile_unset<I, K>(&self, distinct_id: &str, keys: I, is_login_id: bool) -> Result<()>
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		self.profile(EventType::ProfileUnset, distinct_id, Some(unset_properties(keys)), is_login_id)
	}

	/// Deletes the whole profile.
	#[track_caller]
	pub fn profile_delete(&self, distinct_id: &str, is_login_id: bool) -> Result<()> {
		self.profile(EventType::ProfileDelete, distinct_id, None, is_login_id)
	}

	/// Creates or updates an item.
	#[track_caller]
	pub fn item_set(
		&self,
		item_type: &str,
		item_id: &str,
		properties: Option<Properties>,
	) -> Result<()> {
		self.item(ItemAction::Set, item_type, item_id, properties)
	}

	/// Deletes an item.
	#[track_caller]
	pub fn item_delete(&self, item_type: &str, item_id: &str) -> Result<()> {
		self.item(ItemAction::Delete, item_type, item_id, None)
	}

	/// Tracks an event for an identity set.
	#[track_caller]
	pub fn track_by_id(
		&self,
		identity: &Identity,
		event: &str,
		properties: Option<Properties>,
	) -> Result<()> {
		self.identity_event(identity, EventType::Track, event, properties)
	}

	/// Binds the identities of a set to one user. Needs at least two.
	#[track_caller]
	pub fn bind(&self, identity: &Identity) -> Result<()> {
		self.identity_event(identity, EventType::Bind, BIND_EVENT, None)
	}

	/// Detaches a single identity from its user.
	#[track_caller]
	pub fn unbind(&self, identity: &Identity) -> Result<()> {
		self.identity_event(identity, EventType::Unbind, UNBIND_EVENT, None)
	}

	#[track_caller]
	pub fn profile_set_by_id(&self, identity: &Identity, properties: Properties) -> Result<()> {
		self.identity_event(identity, EventType::ProfileSet, "", Some(properties))
	}

	#[track_caller]
	pub fn profile_set_once_by_id(&self, identity: &Identity, properties: Properties) -> Result<()> {
		self.identity_event(identity, EventType::ProfileSetOnce, "", Some(properties))
	}

	#[track_caller]
	pub fn profile_increment_by_id(&self, identity: &Identity, properties: Properties) -> Result<()> {
		self.identity_event(identity, EventType::ProfileIncrement, "", Some(properties))
	}

	#[track_caller]
	pub fn profile_append_by_id(&self, identity: &Identity, properties: Properties) -> Result<()> {
		self.identity_event(identity, EventType::ProfileAppend, "", Some(properties))
	}

	#[track_caller]
	pub fn profile_unset_by_id<I, K>(&self, identity: &Identity, keys: I) -> Result<()>
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		self.identity_event(identity, EventType::ProfileUnset, "", Some(unset_properties(keys)))
	}

	#[track_caller]
	pub fn profile_delete_by_id(&self, identity: &Identity) -> Result<()> {
		self.identity_event(identity, EventType::ProfileDelete, "", None)
	}

	/// Flushes records held by the consumer.
	pub fn flush(&self) -> Result<()> {
		self.check_closed()?;
		self.inner.consumer.flush()
	}

	/// Closes the client and its consumer. Closing twice is a no-op.
	pub fn close(&self) -> Result<()> {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}

		if let Err(e) = self.inner.consumer.close() {
			self.inner.closed.store(false, Ordering::SeqCst);
			warn!(error = %e, "Failed to close analytics consumer");
			return Err(e);
		}
		info!("Analytics client closed");
		Ok(())
	}

	/// Returns true if the client has been closed.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	fn check_closed(&self) -> Result<()> {
		if self.is_closed() {
			return Err(AnalyticsError::ClientShutdown);
		}
		Ok(())
	}

	#[track_caller]
	fn call_site(&self) -> Option<CallSite> {
		if self.inner.config.capture_call_site {
			Some(CallSite::caller())
		} else {
			None
		}
	}

	fn event(&self, request: EventRequest<'_>) -> Result<()> {
		self.check_closed()?;
		track_event(self.inner.consumer.as_ref(), &self.inner.config, request)
	}

	#[track_caller]
	fn profile(
		&self,
		event_type: EventType,
		distinct_id: &str,
		properties: Option<Properties>,
		is_login_id: bool,
	) -> Result<()> {
		let call_site = self.call_site();
		self.event(
			EventRequest::new(event_type, "", distinct_id)
				.properties(properties)
				.login_id(is_login_id)
				.call_site(call_site),
		)
	}

	#[track_caller]
	fn item(
		&self,
		action: ItemAction,
		item_type: &str,
		item_id: &str,
		properties: Option<Properties>,
	) -> Result<()> {
		let call_site = self.call_site();
		self.check_closed()?;
		item_track(
			self.inner.consumer.as_ref(),
			&self.inner.config,
			action,
			item_type,
			item_id,
			properties,
			call_site,
		)
	}

	#[track_caller]
	fn identity_event(
		&self,
		identity: &Identity,
		event_type: EventType,
		event: &str,
		properties: Option<Properties>,
	) -> Result<()> {
		let call_site = self.call_site();
		self.check_closed()?;
		track_event_by_identity(
			self.inner.consumer.as_ref(),
			&self.inner.config,
			identity,
			event_type,
			event,
			properties,
			call_site,
		)
	}
}

fn unset_properties<I, K>(keys: I) -> Properties
where
	I: IntoIterator<Item = K>,
	K: Into<String>,
{
	keys.into_iter().map(|key| (key.into(), true)).collect()
}
