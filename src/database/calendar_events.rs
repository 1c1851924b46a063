use async_trait::async_trait;

use crate::database::models::{CalendarEvent, CalendarEventFields};
use crate::database::pool::{DatabaseError, DatabasePool};
use crate::database::repository::{CalendarEventRepository, Upsert};

const EVENT_COLUMNS: &str = "event_id, event_title, event_date, event_type, event_text";

/// Calendar events stored in the `calendar_events` table
#[derive(Clone, Debug)]
pub struct PgCalendarEventRepository {
    pool: DatabasePool,
}

impl PgCalendarEventRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn event_not_found(event_id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("calendar event {}", event_id))
}

#[async_trait]
impl CalendarEventRepository for PgCalendarEventRepository {
    async fn list_all(&self) -> Result<Vec<CalendarEvent>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        // Cast keeps the result at date granularity even if the column is a timestamp
        let events = sqlx::query_as::<_, CalendarEvent>(
            "SELECT event_id, event_title, event_date::date AS event_date, event_type, event_text
             FROM calendar_events
             ORDER BY event_date, event_id",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(events)
    }

    async fn upsert(&self, request: Upsert<CalendarEventFields>) -> Result<CalendarEvent, DatabaseError> {
        let mut conn = self.pool.acquire().await?;

        match request {
            Upsert::Create(fields) => {
                let event = sqlx::query_as::<_, CalendarEvent>(&format!(
                    "INSERT INTO calendar_events (event_title, event_date, event_type, event_text)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {}",
                    EVENT_COLUMNS
                ))
                .bind(&fields.event_title)
                .bind(fields.event_date)
                .bind(&fields.event_type)
                .bind(&fields.event_text)
                .fetch_one(&mut *conn)
                .await?;
                Ok(event)
            }
            Upsert::Update { id, fields } => {
                let event = sqlx::query_as::<_, CalendarEvent>(&format!(
                    "UPDATE calendar_events
                     SET event_title = $1, event_date = $2, event_type = $3, event_text = $4
                     WHERE event_id = $5
                     RETURNING {}",
                    EVENT_COLUMNS
                ))
                .bind(&fields.event_title)
                .bind(fields.event_date)
                .bind(&fields.event_type)
                .bind(&fields.event_text)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
                event.ok_or_else(|| event_not_found(id))
            }
        }
    }

    async fn delete(&self, event_id: i64) -> Result<CalendarEvent, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let snapshot = sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {} FROM calendar_events WHERE event_id = $1 FOR UPDATE",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(snapshot) = snapshot else {
            tx.rollback().await?;
            return Err(event_not_found(event_id));
        };

        sqlx::query("DELETE FROM calendar_events WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(snapshot)
    }
}
