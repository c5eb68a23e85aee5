use crate::models::DbTimetableSlot;
use chrono::Utc;
use eyre::Result;
use schooldesk_core::models::timetable::TimetableSlot;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SELECT_SLOTS: &str = r#"
    SELECT s.id, s.class_id, s.stream_id, s.day, s.period, s.subject, s.teacher_id,
           s.start_time, s.end_time, s.created_at,
           t.name AS teacher_name, t.contact AS teacher_contact, t.subject AS teacher_subject
    FROM timetable_slots s
    LEFT JOIN teachers t ON t.id = s.teacher_id
"#;

pub async fn insert_slot(pool: &Pool<Postgres>, slot: &TimetableSlot) -> Result<()> {
    tracing::debug!(
        "Inserting lesson: id={}, class={}, day={}, period={}",
        slot.id, slot.class_id, slot.day, slot.period
    );

    sqlx::query(
        r#"
        INSERT INTO timetable_slots
            (id, class_id, stream_id, day, period, subject, teacher_id, start_time, end_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(slot.id)
    .bind(&slot.class_id)
    .bind(&slot.stream_id)
    .bind(slot.day.as_str())
    .bind(slot.period as i32)
    .bind(&slot.subject)
    .bind(&slot.teacher_id)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrites every field of an existing row. Returns false if no row has the id.
pub async fn update_slot(pool: &Pool<Postgres>, slot: &TimetableSlot) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE timetable_slots
        SET class_id = $2, stream_id = $3, day = $4, period = $5, subject = $6,
            teacher_id = $7, start_time = $8, end_time = $9
        WHERE id = $1
        "#,
    )
    .bind(slot.id)
    .bind(&slot.class_id)
    .bind(&slot.stream_id)
    .bind(slot.day.as_str())
    .bind(slot.period as i32)
    .bind(&slot.subject)
    .bind(&slot.teacher_id)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM timetable_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// All lessons in creation order.
pub async fn list_slots(pool: &Pool<Postgres>) -> Result<Vec<DbTimetableSlot>> {
    let slots = sqlx::query_as::<_, DbTimetableSlot>(&format!(
        "{SELECT_SLOTS} ORDER BY s.created_at ASC, s.id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(slots)
}
