use crate::service::notify::{Category, NotifyService, TickResult};
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Cancelable periodic poll loop for one session: runs `tick` immediately
/// and then on a fixed period, forwarding each result on a channel until
/// stopped or until the receiver goes away.
pub struct Poller {
    stop: watch::Sender<bool>,
    suppress: watch::Sender<HashSet<Category>>,
}

impl Poller {
    pub fn spawn(
        notify: NotifyService,
        user_id: String,
        period: Duration,
    ) -> (Poller, mpsc::Receiver<TickResult>) {
        let (tx, rx) = mpsc::channel(16);
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let (suppress_tx, suppress_rx) = watch::channel(HashSet::new());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let suppressed = suppress_rx.borrow().clone();
                        match notify.tick(&user_id, &suppressed).await {
                            Ok(result) => {
                                if tx.send(result).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, user_id = %user_id, "poll tick failed");
                            }
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }
            tracing::debug!(user_id = %user_id, "poller stopped");
        });

        (
            Poller {
                stop: stop_tx,
                suppress: suppress_tx,
            },
            rx,
        )
    }

    /// Categories whose modal is currently open; they are skipped on
    /// subsequent ticks until cleared.
    pub fn suppress(&self, categories: HashSet<Category>) {
        let _ = self.suppress.send(categories);
    }

    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::post::PostType;
    use crate::service::board::BoardService;
    use crate::service::testutil::{seed_users, test_store, user};

    #[tokio::test]
    async fn poller_delivers_ticks_and_stops_cleanly() {
        let (_dir, store) = test_store();
        let board = BoardService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        seed_users(&store, &[alice.clone(), user("b", "Bob", 15.0)]);
        board
            .create_post(&alice, "rules".into(), "".into(), PostType::Notice)
            .unwrap();

        let notify = NotifyService::new(store, Duration::from_secs(10));
        let (poller, mut rx) =
            Poller::spawn(notify, "b".to_string(), Duration::from_millis(20));

        // First tick fires immediately and carries the unseen notice
        let first = rx.recv().await.unwrap();
        assert!(first.notice.is_some());

        // Suppressing the category drops it from subsequent ticks
        poller.suppress([Category::Notice].into_iter().collect());
        // Skip the tick that may have raced the suppression update
        let _ = rx.recv().await.unwrap();
        let later = rx.recv().await.unwrap();
        assert!(later.notice.is_none());

        poller.stop();
        let drained = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok(), "channel should close after stop");
    }
}
