// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Item records describing catalogue entities (products, articles, ...).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lib_properties::LibProperties;
use crate::properties::Properties;
use crate::validate::{check_id, check_key, check_properties};

/// The `type` tag of an item record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemAction {
	#[serde(rename = "item_set")]
	Set,
	#[serde(rename = "item_delete")]
	Delete,
}

impl ItemAction {
	pub fn as_str(&self) -> &'static str {
		match self {
			ItemAction::Set => "item_set",
			ItemAction::Delete => "item_delete",
		}
	}
}

impl std::fmt::Display for ItemAction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single item record as handed to a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
	#[serde(rename = "type")]
	pub action: ItemAction,
	pub item_type: String,
	pub item_id: String,
	/// Record time in milliseconds since the Unix epoch.
	pub time: i64,
	pub properties: Properties,
	pub lib: LibProperties,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project: Option<String>,
}

impl Item {
	/// Validates the record structure.
	pub fn normalize(&self) -> Result<()> {
		check_key(&self.item_type)?;
		check_id("item_id", &self.item_id)?;
		if let Some(project) = &self.project {
			check_key(project)?;
		}
		check_properties(&self.properties)
	}
}
