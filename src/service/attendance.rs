use crate::error::ServiceError;
use crate::model::attendance::{AttendanceLog, AttendanceType};
use crate::store::{Store, collections, now_ms};
use chrono::{Local, TimeZone};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct TodayAttendance {
    /// First clock-in of the local day, if any.
    pub clock_in: Option<i64>,
    /// Latest clock-out of the local day, if any.
    pub clock_out: Option<i64>,
}

/// Lightweight check-in log. Append-only; the daily view is derived.
#[derive(Clone)]
pub struct AttendanceService {
    store: Store,
}

impl AttendanceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn log(
        &self,
        user_id: &str,
        log_type: AttendanceType,
    ) -> Result<AttendanceLog, ServiceError> {
        let _guard = self.store.guard();
        let entry = AttendanceLog {
            id: format!("att_{}", Uuid::new_v4()),
            user_id: user_id.to_string(),
            log_type,
            timestamp: now_ms(),
            location: "designated workplace (verified)".to_string(),
        };
        let mut logs: Vec<AttendanceLog> = self.store.load(collections::ATTENDANCE)?;
        logs.push(entry.clone());
        self.store.save(collections::ATTENDANCE, &logs)?;
        Ok(entry)
    }

    pub fn today(&self, user_id: &str) -> Result<TodayAttendance, ServiceError> {
        let midnight = Local::now().date_naive().and_hms_opt(0, 0, 0).unwrap();
        let midnight_ms = Local
            .from_local_datetime(&midnight)
            .single()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0);

        let logs: Vec<AttendanceLog> = self.store.load(collections::ATTENDANCE)?;
        let todays: Vec<&AttendanceLog> = logs
            .iter()
            .filter(|l| l.user_id == user_id && l.timestamp >= midnight_ms)
            .collect();

        let clock_in = todays
            .iter()
            .find(|l| l.log_type == AttendanceType::ClockIn)
            .map(|l| l.timestamp);
        let clock_out = todays
            .iter()
            .filter(|l| l.log_type == AttendanceType::ClockOut)
            .map(|l| l.timestamp)
            .max();

        Ok(TodayAttendance { clock_in, clock_out })
    }
}
