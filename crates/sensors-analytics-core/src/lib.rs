// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Sensors Analytics Rust SDK.
//!
//! This crate defines the records the SDK hands to a consumer and the rules
//! each record checks before it leaves the process:
//!
//! - [`EventData`]: tracked events, profile updates and ID-mapping events
//! - [`Item`]: item (catalogue entity) updates
//! - [`Identity`]: identity sets for the ID-mapping APIs
//! - [`LibProperties`] and [`CallSite`]: SDK provenance metadata
//! - [`Properties`]: property maps
//!
//! It performs no I/O. The client, construction logic and consumer interface
//! live in `sensors-analytics`.

pub mod error;
pub mod event;
pub mod identity;
pub mod item;
pub mod lib_properties;
pub mod properties;
pub mod validate;

pub use error::{Result, ValidationError};
pub use event::{
	EventData, EventType, BIND_EVENT, IS_LOGIN_ID_KEY, LIB_KEY, LIB_VERSION_KEY, SIGNUP_EVENT,
	TIME_KEY, UNBIND_EVENT,
};
pub use identity::{Identity, ANONYMOUS_ID, EMAIL_ID, LOGIN_ID, MOBILE_ID};
pub use item::{Item, ItemAction};
pub use lib_properties::{CallSite, LibProperties, LIB_METHOD_CODE};
pub use properties::Properties;
