use crate::error::ServiceError;
use crate::model::approval::{Approval, ApprovalStatus};
use crate::model::leave::{LeaveRequest, LeaveStatus};
use crate::model::message::Message;
use crate::model::post::Post;
use crate::model::user::User;
use crate::service::board::BoardService;
use crate::service::message::MessageService;
use crate::store::{Store, collections, now_ms};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Notice,
    Leave,
    Message,
    Approval,
}

/// One poll round. At most one unseen item per category; a category whose
/// modal is currently open is skipped entirely so it cannot re-trigger.
#[derive(Debug, Serialize, ToSchema)]
pub struct TickResult {
    pub notice: Option<Post>,
    pub leave_request: Option<LeaveRequest>,
    pub message: Option<Message>,
    pub approval: Option<Approval>,
    pub online_users: Vec<String>,
    pub unread_count: usize,
}

/// Surfaces "things the user hasn't seen yet" without server push, and
/// doubles as the presence mechanism: every tick writes a heartbeat, and
/// the online set is everyone whose heartbeat falls within the freshness
/// window.
#[derive(Clone)]
pub struct NotifyService {
    store: Store,
    board: BoardService,
    messages: MessageService,
    presence: Cache<String, i64>,
    window: Duration,
}

impl NotifyService {
    pub fn new(store: Store, window: Duration) -> Self {
        let presence = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(window)
            .build();
        Self {
            board: BoardService::new(store.clone()),
            messages: MessageService::new(store.clone()),
            store,
            presence,
            window,
        }
    }

    /// Rebuild the presence cache from the persisted heartbeat map, e.g.
    /// after a restart. Only heartbeats still inside the window count.
    pub async fn warmup(&self) -> Result<(), ServiceError> {
        let heartbeats = self.store.load_map(collections::HEARTBEATS)?;
        let now = now_ms();
        let window_ms = self.window.as_millis() as i64;
        let mut restored = 0usize;
        for (user_id, ts) in heartbeats {
            if now - ts < window_ms {
                self.presence.insert(user_id, ts).await;
                restored += 1;
            }
        }
        log::info!("presence warmup complete: {restored} users still fresh");
        Ok(())
    }

    pub async fn heartbeat(&self, user_id: &str) -> Result<(), ServiceError> {
        let now = now_ms();
        self.presence.insert(user_id.to_string(), now).await;

        let _guard = self.store.guard();
        let mut heartbeats = self.store.load_map(collections::HEARTBEATS)?;
        heartbeats.insert(user_id.to_string(), now);
        self.store.save_map(collections::HEARTBEATS, &heartbeats)
    }

    /// Everyone with a heartbeat inside the freshness window. Expired
    /// entries fall out of the cache on their own.
    pub fn online_users(&self) -> Vec<String> {
        self.presence.iter().map(|(id, _)| (*id).clone()).collect()
    }

    pub async fn logout(&self, user_id: &str) -> Result<(), ServiceError> {
        self.presence.invalidate(user_id).await;

        let _guard = self.store.guard();
        let mut heartbeats = self.store.load_map(collections::HEARTBEATS)?;
        heartbeats.remove(user_id);
        self.store.save_map(collections::HEARTBEATS, &heartbeats)
    }

    fn watermark(&self, collection: &str, user_id: &str) -> Result<i64, ServiceError> {
        Ok(self
            .store
            .load_map(collection)?
            .get(user_id)
            .copied()
            .unwrap_or(0))
    }

    /// One poll round for the given user. `suppressed` carries the
    /// categories whose modal is currently open on the client.
    pub async fn tick(
        &self,
        user_id: &str,
        suppressed: &HashSet<Category>,
    ) -> Result<TickResult, ServiceError> {
        let users: Vec<User> = self.store.load(collections::USERS)?;
        let user = users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ServiceError::not_found(format!("user {user_id}")))?;

        let unread = self.messages.unread_for(user_id)?;

        self.heartbeat(user_id).await?;
        let online_users = self
            .online_users()
            .into_iter()
            .filter(|id| id != user_id)
            .collect();

        let notice = if suppressed.contains(&Category::Notice) {
            None
        } else {
            let watermark = self.watermark(collections::NOTICE_CHECKS, user_id)?;
            self.board.notices_since(watermark)?.into_iter().next()
        };

        // Incoming leave requests are only surfaced to users who can
        // actually approve them.
        let leave_request = if suppressed.contains(&Category::Leave) || !user.can_approve_leave() {
            None
        } else {
            let watermark = self.watermark(collections::LEAVE_CHECKS, user_id)?;
            let mut pending: Vec<LeaveRequest> = self
                .store
                .load::<LeaveRequest>(collections::LEAVE_REQUESTS)?
                .into_iter()
                .filter(|r| r.status == LeaveStatus::Pending)
                .collect();
            pending.sort_by(|a, b| b.request_date.cmp(&a.request_date));
            pending.into_iter().next().filter(|r| r.request_date > watermark)
        };

        let message = if suppressed.contains(&Category::Message) {
            None
        } else {
            let watermark = self.watermark(collections::MESSAGE_CHECKS, user_id)?;
            unread
                .first()
                .cloned()
                .filter(|m| m.timestamp > watermark)
        };

        let approval = if suppressed.contains(&Category::Approval) {
            None
        } else {
            let watermark = self.watermark(collections::APPROVAL_CHECKS, user_id)?;
            let mut pending: Vec<Approval> = self
                .store
                .load::<Approval>(collections::APPROVALS)?
                .into_iter()
                .filter(|a| a.approver_id == user_id && a.status == ApprovalStatus::Pending)
                .collect();
            pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            pending.into_iter().next().filter(|a| a.created_at > watermark)
        };

        Ok(TickResult {
            notice,
            leave_request,
            message,
            approval,
            online_users,
            unread_count: unread.len(),
        })
    }

    /// Advance the per-user watermark for a category.
    ///
    /// Notices move the watermark to "now". The other three move it to the
    /// acknowledged item's own timestamp: an item sharing that timestamp is
    /// considered seen, while anything created later re-triggers on the
    /// next tick.
    pub fn acknowledge(
        &self,
        user_id: &str,
        category: Category,
        item_timestamp: Option<i64>,
    ) -> Result<(), ServiceError> {
        let (collection, watermark) = match category {
            Category::Notice => (collections::NOTICE_CHECKS, now_ms()),
            Category::Leave => (
                collections::LEAVE_CHECKS,
                item_timestamp
                    .ok_or_else(|| ServiceError::validation("timestamp required"))?,
            ),
            Category::Message => (
                collections::MESSAGE_CHECKS,
                item_timestamp
                    .ok_or_else(|| ServiceError::validation("timestamp required"))?,
            ),
            Category::Approval => (
                collections::APPROVAL_CHECKS,
                item_timestamp
                    .ok_or_else(|| ServiceError::validation("timestamp required"))?,
            ),
        };

        let _guard = self.store.guard();
        let mut checks = self.store.load_map(collection)?;
        checks.insert(user_id.to_string(), watermark);
        self.store.save_map(collection, &checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave::LeaveType;
    use crate::model::post::PostType;
    use crate::service::approval::ApprovalService;
    use crate::service::leave::LeaveService;
    use crate::service::testutil::{seed_users, test_store, user};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn notify(store: &Store) -> NotifyService {
        NotifyService::new(store.clone(), Duration::from_secs(10))
    }

    #[tokio::test]
    async fn notice_watermark_uses_now_on_ack() {
        let (_dir, store) = test_store();
        let service = notify(&store);
        let board = BoardService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        seed_users(&store, &[alice.clone(), user("b", "Bob", 15.0)]);

        board
            .create_post(&alice, "rules".into(), "".into(), PostType::Notice)
            .unwrap();

        let tick = service.tick("b", &HashSet::new()).await.unwrap();
        assert!(tick.notice.is_some());

        service.acknowledge("b", Category::Notice, None).unwrap();
        let tick = service.tick("b", &HashSet::new()).await.unwrap();
        assert!(tick.notice.is_none());

        // Alice never acknowledged, so she still gets it
        let tick = service.tick("a", &HashSet::new()).await.unwrap();
        assert!(tick.notice.is_some());
    }

    #[tokio::test]
    async fn leave_notifications_only_reach_approvers() {
        let (_dir, store) = test_store();
        let service = notify(&store);
        let leave = LeaveService::new(store.clone());
        let mut boss = user("boss", "Boss", 18.0);
        boss.leave_approver = true;
        seed_users(&store, &[user("a", "Alice", 15.0), boss]);

        leave
            .create_request(
                "a",
                LeaveType::Annual,
                date("2026-03-10"),
                date("2026-03-10"),
                String::new(),
                String::new(),
            )
            .unwrap();

        let tick = service.tick("boss", &HashSet::new()).await.unwrap();
        assert!(tick.leave_request.is_some());

        let tick = service.tick("a", &HashSet::new()).await.unwrap();
        assert!(tick.leave_request.is_none());
    }

    #[tokio::test]
    async fn item_watermark_suppresses_up_to_acked_timestamp_only() {
        let (_dir, store) = test_store();
        let service = notify(&store);
        let leave = LeaveService::new(store.clone());
        let mut boss = user("boss", "Boss", 18.0);
        boss.leave_approver = true;
        seed_users(&store, &[user("a", "Alice", 15.0), boss]);

        let first = leave
            .create_request(
                "a",
                LeaveType::Annual,
                date("2026-03-10"),
                date("2026-03-10"),
                String::new(),
                String::new(),
            )
            .unwrap();

        let seen = service
            .tick("boss", &HashSet::new())
            .await
            .unwrap()
            .leave_request
            .unwrap();
        service
            .acknowledge("boss", Category::Leave, Some(seen.request_date))
            .unwrap();

        // Same item no longer triggers
        let tick = service.tick("boss", &HashSet::new()).await.unwrap();
        assert!(tick.leave_request.is_none());

        // An item with a later timestamp re-triggers; fake one directly to
        // control the clock
        let mut requests: Vec<LeaveRequest> =
            store.load(collections::LEAVE_REQUESTS).unwrap();
        let mut newer = first.clone();
        newer.id = "leave_newer".to_string();
        newer.request_date = seen.request_date + 1;
        requests.insert(0, newer);
        store.save(collections::LEAVE_REQUESTS, &requests).unwrap();

        let tick = service.tick("boss", &HashSet::new()).await.unwrap();
        assert_eq!(tick.leave_request.unwrap().id, "leave_newer");
    }

    #[tokio::test]
    async fn open_modal_suppresses_its_category() {
        let (_dir, store) = test_store();
        let service = notify(&store);
        let board = BoardService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        seed_users(&store, &[alice.clone(), user("b", "Bob", 15.0)]);

        board
            .create_post(&alice, "rules".into(), "".into(), PostType::Notice)
            .unwrap();

        let suppressed: HashSet<Category> = [Category::Notice].into_iter().collect();
        let tick = service.tick("b", &suppressed).await.unwrap();
        assert!(tick.notice.is_none());

        // Not acknowledged, so it comes back once the modal closes
        let tick = service.tick("b", &HashSet::new()).await.unwrap();
        assert!(tick.notice.is_some());
    }

    #[tokio::test]
    async fn message_and_approval_checks_target_the_recipient() {
        let (_dir, store) = test_store();
        let service = notify(&store);
        let messages = MessageService::new(store.clone());
        let approvals = ApprovalService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        let bob = user("b", "Bob", 15.0);
        seed_users(&store, &[alice.clone(), bob.clone()]);

        messages.send(&alice, "b", "hi".into()).unwrap();
        approvals
            .create(
                &alice,
                "b",
                "Expense".into(),
                "body".into(),
                ApprovalStatus::Pending,
                None,
            )
            .unwrap();

        let tick = service.tick("b", &HashSet::new()).await.unwrap();
        assert!(tick.message.is_some());
        assert!(tick.approval.is_some());
        assert_eq!(tick.unread_count, 1);

        // Sender sees neither
        let tick = service.tick("a", &HashSet::new()).await.unwrap();
        assert!(tick.message.is_none());
        assert!(tick.approval.is_none());
        assert_eq!(tick.unread_count, 0);
    }

    #[tokio::test]
    async fn heartbeat_drives_presence_and_logout_clears_it() {
        let (_dir, store) = test_store();
        let service = NotifyService::new(store.clone(), Duration::from_millis(80));
        seed_users(&store, &[user("a", "Alice", 15.0), user("b", "Bob", 15.0)]);

        service.tick("a", &HashSet::new()).await.unwrap();
        let tick = service.tick("b", &HashSet::new()).await.unwrap();
        assert!(tick.online_users.contains(&"a".to_string()));
        // Self is excluded
        assert!(!tick.online_users.contains(&"b".to_string()));

        service.logout("a").await.unwrap();
        assert!(!service.online_users().contains(&"a".to_string()));

        // A stale heartbeat falls out of the window on its own
        service.heartbeat("a").await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!service.online_users().contains(&"a".to_string()));
    }

    #[tokio::test]
    async fn warmup_restores_only_fresh_heartbeats() {
        let (_dir, store) = test_store();
        let mut heartbeats = std::collections::HashMap::new();
        heartbeats.insert("fresh".to_string(), now_ms());
        heartbeats.insert("stale".to_string(), now_ms() - 60_000);
        store.save_map(collections::HEARTBEATS, &heartbeats).unwrap();

        let service = NotifyService::new(store, Duration::from_secs(10));
        service.warmup().await.unwrap();

        let online = service.online_users();
        assert!(online.contains(&"fresh".to_string()));
        assert!(!online.contains(&"stale".to_string()));
    }
}
