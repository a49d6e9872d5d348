//! Broadcast hub: relays messages between pages over WebSocket.
//!
//! Each connection registers under a page-chosen app id. A broadcast goes to
//! every other registered connection. Connections are only removed when a
//! send to them fails or times out, or when their socket closes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{mpsc, RwLock};

/// Thread-safe map of app id → outbound queue of one connection.
#[derive(Clone)]
pub struct BroadcastHub {
    clients: Arc<RwLock<HashMap<String, mpsc::Sender<String>>>>,
    send_timeout: Duration,
}

impl BroadcastHub {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            send_timeout,
        }
    }

    /// Register a connection, replacing any earlier one under `app_id`.
    pub async fn register(&self, app_id: &str, tx: mpsc::Sender<String>) {
        let replaced = self
            .clients
            .write()
            .await
            .insert(app_id.to_string(), tx)
            .is_some();
        tracing::debug!(app_id, replaced, "broadcast client registered");
    }

    /// Remove `app_id` only if it is still bound to `tx`. A socket that was
    /// replaced by a newer registration must not evict its successor.
    pub async fn unregister(&self, app_id: &str, tx: &mpsc::Sender<String>) -> bool {
        let mut map = self.clients.write().await;
        match map.get(app_id) {
            Some(current) if current.same_channel(tx) => {
                map.remove(app_id);
                true
            }
            _ => false,
        }
    }

    /// Send `payload` to every client except `sender`, concurrently. Clients
    /// whose send fails or times out are evicted. Returns how many clients
    /// received the message.
    pub async fn broadcast(&self, sender: &str, payload: &str) -> usize {
        let targets: Vec<(String, mpsc::Sender<String>)> = self
            .clients
            .read()
            .await
            .iter()
            .filter(|(id, _)| id.as_str() != sender)
            .map(|(id, tx)| (id.clone(), tx.clone()))
            .collect();

        let limit = self.send_timeout;
        let results = join_all(targets.into_iter().map(|(id, tx)| async move {
            let delivered = matches!(
                tokio::time::timeout(limit, tx.send(payload.to_string())).await,
                Ok(Ok(()))
            );
            (id, tx, delivered)
        }))
        .await;

        let mut delivered = 0;
        for (id, tx, ok) in results {
            if ok {
                delivered += 1;
            } else if self.unregister(&id, &tx).await {
                tracing::warn!(app_id = %id, "broadcast send failed, client removed");
            }
        }
        delivered
    }

    pub async fn contains(&self, app_id: &str) -> bool {
        self.clients.read().await.contains_key(app_id)
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }
}
