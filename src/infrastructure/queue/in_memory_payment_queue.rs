use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, watch};

use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue, QueueError};

struct Inner<B> {
	sender:   mpsc::Sender<Message<B>>,
	receiver: Mutex<mpsc::Receiver<Message<B>>>,
	closed:   watch::Sender<bool>,
}

/// Fixed-capacity FIFO shared by the intake path and every worker.
///
/// Consumers take turns on the receiver; the one holding it waits for the
/// next message or for the queue to be closed, whichever comes first.
pub struct InMemoryQueue<B> {
	inner: Arc<Inner<B>>,
}

impl<B> Clone for InMemoryQueue<B> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

pub type PaymentQueue = InMemoryQueue<Payment>;

impl<B: Send + 'static> InMemoryQueue<B> {
	pub fn new(capacity: usize) -> Self {
		let (sender, receiver) = mpsc::channel(capacity.max(1));
		let (closed, _) = watch::channel(false);
		Self {
			inner: Arc::new(Inner {
				sender,
				receiver: Mutex::new(receiver),
				closed,
			}),
		}
	}

	pub fn is_closed(&self) -> bool {
		*self.inner.closed.borrow()
	}
}

#[async_trait]
impl<B: Send + 'static> Queue<B> for InMemoryQueue<B> {
	fn push(&self, message: Message<B>) -> Result<(), QueueError> {
		if self.is_closed() {
			return Err(QueueError::Closed);
		}
		self.inner.sender.try_send(message).map_err(|e| match e {
			TrySendError::Full(_) => QueueError::Full,
			TrySendError::Closed(_) => QueueError::Closed,
		})
	}

	async fn pop(&self) -> Option<Message<B>> {
		let mut closed = self.inner.closed.subscribe();
		if *closed.borrow_and_update() {
			return None;
		}

		let mut receiver = tokio::select! {
			biased;
			_ = closed.changed() => return None,
			receiver = self.inner.receiver.lock() => receiver,
		};

		tokio::select! {
			biased;
			_ = closed.changed() => None,
			message = receiver.recv() => message,
		}
	}

	fn close(&self) {
		self.inner.closed.send_replace(true);
	}

	fn len(&self) -> usize {
		self.inner.sender.max_capacity() - self.inner.sender.capacity()
	}

	fn capacity(&self) -> usize {
		self.inner.sender.max_capacity()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;
	use std::time::Duration;

	use uuid::Uuid;

	use super::*;

	fn message(n: u32) -> Message<u32> {
		Message::with(Uuid::new_v4(), n)
	}

	#[tokio::test]
	async fn test_push_and_pop_preserve_fifo_order() {
		let queue = InMemoryQueue::new(4);
		for n in 0..3 {
			queue.push(message(n)).unwrap();
		}

		assert_eq!(queue.len(), 3);
		for n in 0..3 {
			assert_eq!(queue.pop().await.unwrap().body, n);
		}
		assert!(queue.is_empty());
	}

	#[tokio::test]
	async fn test_push_rejects_when_full() {
		let queue = InMemoryQueue::new(2);
		queue.push(message(1)).unwrap();
		queue.push(message(2)).unwrap();

		assert_eq!(queue.push(message(3)), Err(QueueError::Full));
		assert_eq!(queue.len(), queue.capacity());

		queue.pop().await.unwrap();
		assert!(queue.push(message(4)).is_ok());
		assert_eq!(queue.len(), 2);
	}

	#[tokio::test]
	async fn test_close_wakes_waiting_consumer() {
		let queue: InMemoryQueue<u32> = InMemoryQueue::new(2);
		let consumer = {
			let queue = queue.clone();
			tokio::spawn(async move { queue.pop().await })
		};

		tokio::time::sleep(Duration::from_millis(20)).await;
		queue.close();

		let popped = tokio::time::timeout(Duration::from_secs(1), consumer)
			.await
			.expect("consumer should observe close")
			.unwrap();
		assert!(popped.is_none());
	}

	#[tokio::test]
	async fn test_closed_queue_discards_buffered_messages() {
		let queue = InMemoryQueue::new(4);
		queue.push(message(1)).unwrap();
		queue.push(message(2)).unwrap();
		queue.close();

		assert!(queue.pop().await.is_none());
		assert_eq!(queue.push(message(3)), Err(QueueError::Closed));
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_consumers_receive_each_message_once() {
		let queue = InMemoryQueue::new(1_000);
		for n in 0..500 {
			queue.push(message(n)).unwrap();
		}

		let consumers: Vec<_> = (0..8)
			.map(|_| {
				let queue = queue.clone();
				tokio::spawn(async move {
					let mut seen = Vec::new();
					while let Ok(Some(message)) =
						tokio::time::timeout(Duration::from_millis(100), queue.pop())
							.await
					{
						seen.push(message.body);
					}
					seen
				})
			})
			.collect();

		let mut all = Vec::new();
		for consumer in consumers {
			all.extend(consumer.await.unwrap());
		}

		let unique: HashSet<_> = all.iter().copied().collect();
		assert_eq!(all.len(), 500);
		assert_eq!(unique.len(), 500);
	}
}
