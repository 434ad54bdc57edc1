use std::sync::Mutex;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::Store;
use crate::attendance::repo_types::{utc_day, Attendance, NewAttendance};
use crate::commands::repo_types::NewCommandLog;
use crate::geocoder::MAX_PLACE_LEN;
use crate::tasks::repo_types::{NewTask, Task, TaskChanges};
use crate::tasks::services::fits_title_column;

#[derive(Default)]
struct Tables {
    attendance: Vec<Attendance>,
    tasks: Vec<Task>,
    command_logs: Vec<NewCommandLog>,
}

/// In-process store with the same day-uniqueness rule and column widths as
/// the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attendance(&self) -> Vec<Attendance> {
        self.tables.lock().unwrap().attendance.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tables.lock().unwrap().tasks.clone()
    }

    pub fn command_logs(&self) -> Vec<NewCommandLog> {
        self.tables.lock().unwrap().command_logs.clone()
    }
}

fn page<T: Clone>(rows: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    rows.skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_attendance_for_user_on_date(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<Attendance>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .attendance
            .iter()
            .find(|a| a.user_id == user_id && utc_day(a.check_in_time) == date)
            .cloned())
    }

    async fn create_attendance(&self, new: NewAttendance) -> anyhow::Result<Option<Attendance>> {
        if new.location_name.chars().count() > MAX_PLACE_LEN {
            anyhow::bail!("value too long for attendance.location_name");
        }
        let mut tables = self.tables.lock().unwrap();
        let date = new.check_in_date();
        if tables
            .attendance
            .iter()
            .any(|a| a.user_id == new.user_id && utc_day(a.check_in_time) == date)
        {
            return Ok(None);
        }
        let row = Attendance {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            check_in_time: new.checked_in_at,
            check_out_time: None,
            latitude: new.latitude,
            longitude: new.longitude,
            location_name: Some(new.location_name),
            status: new.status,
        };
        tables.attendance.push(row.clone());
        Ok(Some(row))
    }

    async fn update_attendance_checkout(
        &self,
        attendance_id: Uuid,
        at: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        match tables
            .attendance
            .iter_mut()
            .find(|a| a.id == attendance_id && a.check_out_time.is_none())
        {
            Some(row) => {
                row.check_out_time = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_attendance(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Attendance>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Attendance> = tables
            .attendance
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        Ok(page(rows.into_iter(), limit, offset))
    }

    async fn find_task(&self, task_id: Uuid) -> anyhow::Result<Option<Task>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    async fn list_tasks(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Task>> {
        let tables = self.tables.lock().unwrap();
        let newest_first = tables.tasks.iter().rev().filter(|t| t.user_id == user_id);
        Ok(page(newest_first.cloned(), limit, offset))
    }

    async fn create_task(&self, new: NewTask) -> anyhow::Result<Task> {
        if !fits_title_column(&new.title) {
            anyhow::bail!("value too long for tasks.title");
        }
        let now = OffsetDateTime::now_utc();
        let task = Task {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            created_at: now,
            updated_at: now,
            due_date: new.due_date,
        };
        self.tables.lock().unwrap().tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> anyhow::Result<Option<Task>> {
        if changes.title.as_deref().is_some_and(|t| !fits_title_column(t)) {
            anyhow::bail!("value too long for tasks.title");
        }
        let mut tables = self.tables.lock().unwrap();
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(None);
        };
        let TaskChanges {
            title,
            description,
            status,
            priority,
            due_date,
        } = changes;
        if let Some(title) = title {
            task.title = title;
        }
        if description.is_some() {
            task.description = description;
        }
        task.status = status.unwrap_or(task.status);
        task.priority = priority.unwrap_or(task.priority);
        if due_date.is_some() {
            task.due_date = due_date;
        }
        task.updated_at = OffsetDateTime::now_utc();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, task_id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != task_id);
        Ok(tables.tasks.len() != before)
    }

    async fn append_command_log(&self, entry: NewCommandLog) -> anyhow::Result<()> {
        self.tables.lock().unwrap().command_logs.push(entry);
        Ok(())
    }
}
