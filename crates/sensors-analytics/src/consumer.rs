// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The consumer seam between record construction and delivery.
//!
//! A [`Consumer`] receives finished, validated records. Batching, network
//! delivery and retries are the consumer's business. [`ChannelConsumer`]
//! hands records to a bounded channel so the host application can deliver
//! them from its own task.

use std::sync::{Mutex, PoisonError};

use sensors_analytics_core::{EventData, Item};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{AnalyticsError, Result};

/// A record leaving the SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
	Event(EventData),
	Item(Item),
}

impl Record {
	/// Serializes the record as a single JSON line.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}

/// Receives records from the SDK for delivery.
pub trait Consumer: Send + Sync {
	/// Accepts an event record.
	fn send(&self, event: EventData) -> Result<()>;

	/// Accepts an item record.
	fn item_send(&self, item: Item) -> Result<()>;

	/// Pushes out anything the consumer is holding.
	fn flush(&self) -> Result<()> {
		Ok(())
	}

	/// Flushes and releases the consumer's resources.
	fn close(&self) -> Result<()> {
		self.flush()
	}
}

/// A consumer that forwards records into a bounded `tokio` channel.
///
/// `send` never blocks: a full channel yields [`AnalyticsError::QueueFull`]
/// and a closed one [`AnalyticsError::ClientShutdown`].
pub struct ChannelConsumer {
	tx: Mutex<Option<mpsc::Sender<Record>>>,
}

impl ChannelConsumer {
	/// Creates a consumer and the receiver its records arrive on.
	pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Record>) {
		let (tx, rx) = mpsc::channel(capacity);
		(Self::from_sender(tx), rx)
	}

	/// Wraps an existing channel sender.
	pub fn from_sender(tx: mpsc::Sender<Record>) -> Self {
		Self {
			tx: Mutex::new(Some(tx)),
		}
	}

	fn forward(&self, record: Record) -> Result<()> {
		let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
		let tx = guard.as_ref().ok_or(AnalyticsError::ClientShutdown)?;
		tx.try_send(record).map_err(|e| match e {
			mpsc::error::TrySendError::Full(_) => {
				warn!("Dropped analytics record, consumer queue is full");
				AnalyticsError::QueueFull
			}
			mpsc::error::TrySendError::Closed(_) => AnalyticsError::ClientShutdown,
		})
	}
}

impl Consumer for ChannelConsumer {
	fn send(&self, event: EventData) -> Result<()> {
		debug!(
			event_type = %event.event_type,
			distinct_id = %event.distinct_id,
			"Forwarding event record"
		);
		self.forward(Record::Event(event))
	}

	fn item_send(&self, item: Item) -> Result<()> {
		debug!(
			action = %item.action,
			item_type = %item.item_type,
			item_id = %item.item_id,
			"Forwarding item record"
		);
		self.forward(Record::Item(item))
	}

	fn close(&self) -> Result<()> {
		let mut guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
		if guard.take().is_some() {
			info!("Channel consumer closed");
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sensors_analytics_core::{EventType, ItemAction, LibProperties, Properties};

	fn event(name: &str) -> EventData {
		let mut data = EventData::new(
			EventType::Track,
			1_700_000_000_000,
			"u1",
			Properties::new(),
			LibProperties::new("Rust", "2.1.0", None),
		);
		data.event = Some(name.to_string());
		data
	}

	fn item() -> Item {
		Item {
			action: ItemAction::Set,
			item_type: "book".to_string(),
			item_id: "isbn-1".to_string(),
			time: 1_700_000_000_000,
			properties: Properties::new(),
			lib: LibProperties::new("Rust", "2.1.0", None),
			project: None,
		}
	}

	#[test]
	fn test_forwards_records_in_order() {
		let (consumer, mut rx) = ChannelConsumer::new(8);
		consumer.send(event("first")).unwrap();
		consumer.item_send(item()).unwrap();

		assert_eq!(rx.try_recv().unwrap(), Record::Event(event("first")));
		assert_eq!(rx.try_recv().unwrap(), Record::Item(item()));
		assert!(rx.try_recv().is_err());
	}

	#[test]
	fn test_full_channel_reports_queue_full() {
		let (consumer, _rx) = ChannelConsumer::new(1);
		consumer.send(event("first")).unwrap();
		let result = consumer.send(event("second"));
		assert!(matches!(result, Err(AnalyticsError::QueueFull)));
	}

	#[test]
	fn test_dropped_receiver_reports_shutdown() {
		let (consumer, rx) = ChannelConsumer::new(4);
		drop(rx);
		let result = consumer.send(event("lost"));
		assert!(matches!(result, Err(AnalyticsError::ClientShutdown)));
	}

	#[test]
	fn test_close_rejects_further_records_and_ends_stream() {
		let (consumer, mut rx) = ChannelConsumer::new(4);
		consumer.send(event("last")).unwrap();
		consumer.close().unwrap();
		consumer.close().unwrap();

		assert!(matches!(
			consumer.item_send(item()),
			Err(AnalyticsError::ClientShutdown)
		));
		assert!(rx.try_recv().is_ok());
		assert!(matches!(
			rx.try_recv(),
			Err(mpsc::error::TryRecvError::Disconnected)
		));
	}

	#[test]
	fn test_record_json_is_untagged() {
		let line = Record::Item(item()).to_json().unwrap();
		let value: serde_json::Value = serde_json::from_str(&line).unwrap();
		assert_eq!(value["type"], "item_set");

		let parsed: Record = serde_json::from_str(&Record::Event(event("x")).to_json().unwrap()).unwrap();
		assert_eq!(parsed, Record::Event(event("x")));
	}

	#[tokio::test]
	async fn test_receiver_task_sees_records() {
		let (consumer, mut rx) = ChannelConsumer::new(4);
		let handle = tokio::spawn(async move {
			let mut names = Vec::new();
			while let Some(Record::Event(e)) = rx.recv().await {
				names.extend(e.event);
			}
			names
		});

		consumer.send(event("a")).unwrap();
		consumer.send(event("b")).unwrap();
		consumer.close().unwrap();

		assert_eq!(handle.await.unwrap(), vec!["a".to_string(), "b".to_string()]);
	}

	#[test]
	fn test_poisoned_lock_still_forwards_and_closes() {
		let (consumer, mut rx) = ChannelConsumer::new(4);
		std::thread::scope(|s| {
			let result = s
				.spawn(|| {
					let _guard = consumer.tx.lock().unwrap();
					panic!("poison the sender lock");
				})
				.join();
			assert!(result.is_err());
		});
		assert!(consumer.tx.is_poisoned());

		consumer.send(event("after")).unwrap();
		assert_eq!(rx.try_recv().unwrap(), Record::Event(event("after")));

		consumer.close().unwrap();
		assert!(matches!(
			consumer.send(event("closed")),
			Err(AnalyticsError::ClientShutdown)
		));
	}
}
