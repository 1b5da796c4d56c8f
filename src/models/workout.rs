use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{FieldValue, PgQueryAs, Record};

/// Suggested workout template.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub activity_type: String,
    pub difficulty: String,
    pub estimated_calories: i32,
    pub duration: i32, // minutes
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkout {
    pub name: String,
    pub description: String,
    pub activity_type: String,
    pub difficulty: String,
    pub estimated_calories: i32,
    pub duration: i32,
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Record for Workout {
    type Draft = NewWorkout;

    const TABLE: &'static str = "workouts";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "activity_type",
        "difficulty",
        "estimated_calories",
        "duration",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "name" => Some(FieldValue::text(&self.name)),
            "activity_type" => Some(FieldValue::text(&self.activity_type)),
            "difficulty" => Some(FieldValue::text(&self.difficulty)),
            "estimated_calories" => Some(FieldValue::Int(self.estimated_calories.into())),
            "duration" => Some(FieldValue::Int(self.duration.into())),
            _ => None,
        }
    }

    fn from_draft(id: Uuid, draft: NewWorkout, now: OffsetDateTime) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            activity_type: draft.activity_type,
            difficulty: draft.difficulty,
            estimated_calories: draft.estimated_calories,
            duration: draft.duration,
            created_at: now,
        }
    }

    fn apply_draft(self, draft: NewWorkout, _now: OffsetDateTime) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            activity_type: draft.activity_type,
            difficulty: draft.difficulty,
            estimated_calories: draft.estimated_calories,
            duration: draft.duration,
            ..self
        }
    }

    fn bind_draft<'q>(draft: &NewWorkout, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.name.clone())
            .bind(draft.description.clone())
            .bind(draft.activity_type.clone())
            .bind(draft.difficulty.clone())
            .bind(draft.estimated_calories)
            .bind(draft.duration)
    }
}
