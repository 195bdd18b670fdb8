use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Message<B> {
	pub id:   Uuid,
	pub body: B,
}

impl<B> Message<B> {
	pub fn with(id: Uuid, body: B) -> Message<B> {
		Message { id, body }
	}
}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
	#[display("queue is at capacity")]
	Full,
	#[display("queue is closed")]
	Closed,
}

/// Bounded hand-off between intake and the workers.
///
/// `push` never waits: a full queue rejects the message. `pop` waits for a
/// message and yields `None` once the queue has been closed, even if messages
/// are still buffered.
#[async_trait]
pub trait Queue<B>: Send + Sync + 'static {
	fn push(&self, message: Message<B>) -> Result<(), QueueError>;
	async fn pop(&self) -> Option<Message<B>>;
	fn close(&self);
	fn len(&self) -> usize;
	fn capacity(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
