use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{FieldValue, PgQueryAs, Record};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Record for Team {
    type Draft = NewTeam;

    const TABLE: &'static str = "teams";
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const UNIQUE: &'static [&'static str] = &["name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "name" => Some(FieldValue::text(&self.name)),
            "description" => Some(FieldValue::text(&self.description)),
            _ => None,
        }
    }

    fn from_draft(id: Uuid, draft: NewTeam, now: OffsetDateTime) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            created_at: now,
        }
    }

    fn apply_draft(self, draft: NewTeam, _now: OffsetDateTime) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            ..self
        }
    }

    fn bind_draft<'q>(draft: &NewTeam, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.name.clone())
            .bind(draft.description.clone())
    }
}
