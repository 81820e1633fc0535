// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK for Sensors Analytics.
//!
//! The SDK turns tracking calls into event and item records, stamps them with
//! library metadata, validates them and hands them to a [`Consumer`] for
//! delivery.
//!
//! # Features
//!
//! - **Event tracking**: `track`, `track_signup` and the profile operations,
//!   keyed by a distinct id
//! - **ID mapping**: `track_by_id`, `bind`, `unbind` and profile operations
//!   keyed by an [`Identity`] set
//! - **Items**: `item_set` / `item_delete`
//! - **Call-site fingerprints**: the caller's file and line in `$lib_detail`
//!
//! Delivery (batching, HTTP, retries) belongs to the consumer.
//! [`ChannelConsumer`] forwards records to a channel for the host application
//! to drain.
//!
//! # Example
//!
//! ```
//! use sensors_analytics::{ChannelConsumer, Identity, Properties, SensorsAnalytics};
//!
//! let (consumer, mut records) = ChannelConsumer::new(1024);
//! let sa = SensorsAnalytics::builder()
//!     .consumer(consumer)
//!     .build()?;
//!
//! let identity = Identity::new()
//!     .with_login_id("u1")
//!     .with("$identity_email", "a@b.com");
//! sa.track_by_id(&identity, "purchase", Some(Properties::new().insert("price", 42)))?;
//!
//! let record = records.try_recv().unwrap();
//! println!("{}", record.to_json()?);
//! sa.close()?;
//! # Ok::<(), sensors_analytics::AnalyticsError>(())
//! ```

mod client;
mod consumer;
mod error;
pub mod track;

pub use client::{ClientConfig, SensorsAnalytics, SensorsAnalyticsBuilder};
pub use consumer::{ChannelConsumer, Consumer, Record};
pub use error::{AnalyticsError, Result};

pub use sensors_analytics_core::{
	call_site, CallSite, EventData, EventType, Identity, Item, ItemAction, LibProperties,
	Properties, ValidationError, ANONYMOUS_ID, EMAIL_ID, LOGIN_ID, MOBILE_ID,
};

/// SDK version reported in `$lib_version`.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name reported in `$lib`.
pub const LIB_NAME: &str = "Rust";
