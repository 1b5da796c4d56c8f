use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::store::{FieldValue, PgQueryAs, Record};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// One logged session. Linked to its user by email value only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub user_email: String,
    pub activity_type: String,
    pub duration: i32, // minutes
    pub calories_burned: i32,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub user_email: String,
    pub activity_type: String,
    pub duration: i32,
    pub calories_burned: i32,
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.user_email, self.activity_type)
    }
}

impl Record for Activity {
    type Draft = NewActivity;

    const TABLE: &'static str = "activities";
    const COLUMNS: &'static [&'static str] = &[
        "user_email",
        "activity_type",
        "duration",
        "calories_burned",
        "date",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "user_email" => Some(FieldValue::text(&self.user_email)),
            "activity_type" => Some(FieldValue::text(&self.activity_type)),
            "duration" => Some(FieldValue::Int(self.duration.into())),
            "calories_burned" => Some(FieldValue::Int(self.calories_burned.into())),
            "date" => Some(FieldValue::Date(self.date)),
            _ => None,
        }
    }

    fn from_draft(id: Uuid, draft: NewActivity, now: OffsetDateTime) -> Self {
        Self {
            id,
            user_email: draft.user_email,
            activity_type: draft.activity_type,
            duration: draft.duration,
            calories_burned: draft.calories_burned,
            date: draft.date,
            created_at: now,
        }
    }

    fn apply_draft(self, draft: NewActivity, _now: OffsetDateTime) -> Self {
        Self {
            user_email: draft.user_email,
            activity_type: draft.activity_type,
            duration: draft.duration,
            calories_burned: draft.calories_burned,
            date: draft.date,
            ..self
        }
    }

    fn bind_draft<'q>(draft: &NewActivity, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.user_email.clone())
            .bind(draft.activity_type.clone())
            .bind(draft.duration)
            .bind(draft.calories_burned)
            .bind(draft.date)
    }
}
