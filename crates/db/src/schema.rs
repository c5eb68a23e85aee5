use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 3] = [
    // One lesson per cell; a NULL stream is its own (class-level) cell.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_timetable_slots_cell
        ON timetable_slots (class_id, COALESCE(stream_id, ''), day, period);
    "#,
    "CREATE INDEX IF NOT EXISTS idx_timetable_slots_class_id ON timetable_slots(class_id);",
    "CREATE INDEX IF NOT EXISTS idx_timetable_slots_teacher_id ON timetable_slots(teacher_id);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create teachers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id VARCHAR(64) PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            contact VARCHAR(255) NULL,
            subject VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create timetable_slots table; teacher_id may name a teacher not in `teachers`
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetable_slots (
            id UUID PRIMARY KEY,
            class_id VARCHAR(64) NOT NULL,
            stream_id VARCHAR(64) NULL,
            day VARCHAR(16) NOT NULL,
            period INTEGER NOT NULL,
            subject VARCHAR(255) NOT NULL,
            teacher_id VARCHAR(64) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_day CHECK (day IN ('Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday')),
            CONSTRAINT valid_period CHECK (period > 0),
            CONSTRAINT valid_lesson_time CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
