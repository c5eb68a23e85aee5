use crate::models::DbTeacher;
use chrono::Utc;
use eyre::Result;
use schooldesk_core::models::teacher::TeacherRecord;
use sqlx::{Pool, Postgres};

/// Inserts a teacher, or refreshes name and contact details if the id exists.
pub async fn upsert_teacher(pool: &Pool<Postgres>, teacher: &TeacherRecord) -> Result<DbTeacher> {
    let row = sqlx::query_as::<_, DbTeacher>(
        r#"
        INSERT INTO teachers (id, name, contact, subject, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id)
        DO UPDATE SET name = $2, contact = $3, subject = $4
        RETURNING id, name, contact, subject, created_at
        "#,
    )
    .bind(&teacher.id)
    .bind(&teacher.name)
    .bind(&teacher.contact)
    .bind(&teacher.subject)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_teachers(pool: &Pool<Postgres>) -> Result<Vec<DbTeacher>> {
    let rows = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, contact, subject, created_at
        FROM teachers
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
