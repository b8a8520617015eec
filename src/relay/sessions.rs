use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tracing::warn;
use uuid::Uuid;

/// Live client sessions, each reachable through its outbound queue.
#[derive(Debug, Default)]
pub struct SessionSet {
    members: RwLock<HashMap<Uuid, mpsc::Sender<String>>>,
}

impl SessionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, id: Uuid, tx: mpsc::Sender<String>) {
        self.members.write().await.insert(id, tx);
    }

    /// Returns whether the session was a member. Safe to call twice.
    pub async fn unregister(&self, id: &Uuid) -> bool {
        self.members.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    /// Queue `msg` for every member. A full or closed queue is skipped so
    /// one stuck session cannot hold up the others. Returns how many
    /// sessions accepted the message.
    pub async fn broadcast(&self, msg: &str) -> usize {
        let members = self.members.read().await;
        let mut delivered = 0;
        for (id, tx) in members.iter() {
            match tx.try_send(msg.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(%id, "broadcast skipped session: {e}"),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let set = SessionSet::new();
        let (tx, _rx) = mpsc::channel(1);
        let id = Uuid::new_v4();
        set.register(id, tx).await;
        assert_eq!(set.len().await, 1);
        assert!(set.unregister(&id).await);
        assert!(!set.unregister(&id).await);
        assert_eq!(set.len().await, 0);
    }

    #[tokio::test]
    async fn broadcast_survives_dead_members() {
        let set = SessionSet::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_dead, rx_dead) = mpsc::channel(4);
        let (tx_full, _rx_full) = mpsc::channel(1);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        drop(rx_dead);
        tx_full.try_send("filler".to_string()).unwrap();

        set.register(Uuid::new_v4(), tx_a).await;
        set.register(Uuid::new_v4(), tx_dead).await;
        set.register(Uuid::new_v4(), tx_full).await;
        set.register(Uuid::new_v4(), tx_b).await;

        assert_eq!(set.broadcast("hello").await, 2);
        assert_eq!(rx_a.recv().await.as_deref(), Some("hello"));
        assert_eq!(rx_b.recv().await.as_deref(), Some("hello"));
    }
}
