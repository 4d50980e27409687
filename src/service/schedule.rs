use crate::error::ServiceError;
use crate::holidays::HOLIDAYS;
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::Role;
use crate::model::schedule::{Schedule, ScheduleType};
use crate::model::user::User;
use crate::store::{Store, collections};
use uuid::Uuid;

/// The shared calendar is composed at query time from three sources:
/// the static holiday table, manual entries, and a projection of approved
/// leave requests. Only manual entries are ever stored.
#[derive(Clone)]
pub struct ScheduleService {
    store: Store,
}

impl ScheduleService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn compose_for(&self, user_id: &str) -> Result<Vec<Schedule>, ServiceError> {
        let manual: Vec<Schedule> = self.store.load(collections::SCHEDULES)?;
        let requests: Vec<LeaveRequest> = self.store.load(collections::LEAVE_REQUESTS)?;

        let holidays = HOLIDAYS.iter().enumerate().map(|(idx, h)| Schedule {
            id: format!("holiday_{idx}"),
            user_id: "system".to_string(),
            user_name: "System".to_string(),
            title: h.name.to_string(),
            schedule_type: ScheduleType::Company,
            start_date: h.date,
            end_date: h.date,
            is_all_day: true,
            color: None,
        });

        // Company entries are visible to everyone, personal only to the owner
        let manual = manual
            .into_iter()
            .filter(|s| s.schedule_type == ScheduleType::Company || s.user_id == user_id);

        // One synthetic entry per approved leave request, visible to all
        let leave = requests
            .into_iter()
            .filter(|r| r.status == LeaveStatus::Approved)
            .map(|r| {
                let kind = if r.leave_type == LeaveType::Annual {
                    "annual leave"
                } else {
                    "leave"
                };
                Schedule {
                    id: r.id,
                    user_id: r.user_id,
                    title: format!("{} - {}", r.user_name, kind),
                    user_name: r.user_name,
                    schedule_type: ScheduleType::Leave,
                    start_date: r.start_date,
                    end_date: r.end_date,
                    is_all_day: true,
                    color: None,
                }
            });

        Ok(holidays.chain(manual).chain(leave).collect())
    }

    pub fn create(
        &self,
        owner: &User,
        title: String,
        schedule_type: ScheduleType,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        is_all_day: bool,
        color: Option<String>,
    ) -> Result<Schedule, ServiceError> {
        // Leave entries are synthetic only
        if schedule_type == ScheduleType::Leave {
            return Err(ServiceError::validation(
                "leave schedules are derived from approved requests",
            ));
        }
        if end_date < start_date {
            return Err(ServiceError::validation("end_date is before start_date"));
        }

        let _guard = self.store.guard();
        let schedule = Schedule {
            id: format!("sch_{}", Uuid::new_v4()),
            user_id: owner.id.clone(),
            user_name: owner.name.clone(),
            title,
            schedule_type,
            start_date,
            end_date,
            is_all_day,
            color,
        };
        let mut schedules: Vec<Schedule> = self.store.load(collections::SCHEDULES)?;
        schedules.push(schedule.clone());
        self.store.save(collections::SCHEDULES, &schedules)?;
        Ok(schedule)
    }

    /// Owner or admin. Synthetic holiday and leave entries never reach the
    /// stored collection, so they cannot be deleted here.
    pub fn delete(&self, id: &str, actor: &User) -> Result<(), ServiceError> {
        let _guard = self.store.guard();
        let mut schedules: Vec<Schedule> = self.store.load(collections::SCHEDULES)?;
        let schedule = schedules
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::not_found(format!("schedule {id}")))?;
        if schedule.user_id != actor.id && actor.role != Role::Admin {
            return Err(ServiceError::forbidden(
                "only the owner may delete a schedule entry",
            ));
        }
        schedules.retain(|s| s.id != id);
        self.store.save(collections::SCHEDULES, &schedules)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::leave::LeaveService;
    use crate::service::testutil::{seed_users, test_store, user};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn composes_holidays_manual_and_approved_leave() {
        let (_dir, store) = test_store();
        let schedules = ScheduleService::new(store.clone());
        let leave = LeaveService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        seed_users(&store, &[alice.clone(), user("b", "Bob", 15.0)]);

        schedules
            .create(
                &alice,
                "workshop".into(),
                ScheduleType::Company,
                date("2026-06-01"),
                date("2026-06-01"),
                true,
                None,
            )
            .unwrap();
        schedules
            .create(
                &alice,
                "dentist".into(),
                ScheduleType::Personal,
                date("2026-06-02"),
                date("2026-06-02"),
                false,
                None,
            )
            .unwrap();

        let req = leave
            .create_request(
                "a",
                LeaveType::Annual,
                date("2026-06-03"),
                date("2026-06-03"),
                String::new(),
                String::new(),
            )
            .unwrap();
        leave.set_status(&req.id, LeaveStatus::Approved).unwrap();

        // Bob sees company entries and Alice's approved leave, but not her
        // personal entry
        let bobs = schedules.compose_for("b").unwrap();
        assert!(bobs.iter().any(|s| s.title == "workshop"));
        assert!(!bobs.iter().any(|s| s.title == "dentist"));
        assert!(
            bobs.iter()
                .any(|s| s.schedule_type == ScheduleType::Leave
                    && s.title == "Alice - annual leave")
        );
        // Holiday table entries present
        assert!(bobs.iter().any(|s| s.id.starts_with("holiday_")));

        let alices = schedules.compose_for("a").unwrap();
        assert!(alices.iter().any(|s| s.title == "dentist"));
    }

    #[test]
    fn pending_leave_does_not_reach_the_calendar() {
        let (_dir, store) = test_store();
        let schedules = ScheduleService::new(store.clone());
        let leave = LeaveService::new(store.clone());
        seed_users(&store, &[user("a", "Alice", 15.0)]);

        leave
            .create_request(
                "a",
                LeaveType::Annual,
                date("2026-06-03"),
                date("2026-06-03"),
                String::new(),
                String::new(),
            )
            .unwrap();

        let composed = schedules.compose_for("a").unwrap();
        assert!(
            !composed
                .iter()
                .any(|s| s.schedule_type == ScheduleType::Leave)
        );
    }

    #[test]
    fn delete_requires_owner_or_admin() {
        let (_dir, store) = test_store();
        let schedules = ScheduleService::new(store.clone());
        let alice = user("a", "Alice", 15.0);
        let bob = user("b", "Bob", 15.0);
        let mut admin = user("root", "Root", 15.0);
        admin.role = Role::Admin;
        seed_users(&store, &[alice.clone(), bob.clone(), admin.clone()]);

        let entry = schedules
            .create(
                &alice,
                "dentist".into(),
                ScheduleType::Personal,
                date("2026-06-02"),
                date("2026-06-02"),
                false,
                None,
            )
            .unwrap();

        assert!(matches!(
            schedules.delete(&entry.id, &bob),
            Err(ServiceError::Forbidden(_))
        ));
        schedules.delete(&entry.id, &alice).unwrap();

        // Admins may remove entries they do not own
        let entry = schedules
            .create(
                &bob,
                "offsite".into(),
                ScheduleType::Personal,
                date("2026-06-03"),
                date("2026-06-03"),
                false,
                None,
            )
            .unwrap();
        schedules.delete(&entry.id, &admin).unwrap();
        assert!(matches!(
            schedules.delete(&entry.id, &admin),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn storing_a_leave_entry_is_rejected() {
        let (_dir, store) = test_store();
        let schedules = ScheduleService::new(store);
        let alice = user("a", "Alice", 15.0);

        let err = schedules
            .create(
                &alice,
                "nope".into(),
                ScheduleType::Leave,
                date("2026-06-01"),
                date("2026-06-01"),
                true,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
