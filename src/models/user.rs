use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{FieldValue, PgQueryAs, Record};

/// A tracked person. `email` is the identifier activities point at.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub team: String, // team name, copied as-is
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub team: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Record for User {
    type Draft = NewUser;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "email", "team"];
    const UNIQUE: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "name" => Some(FieldValue::text(&self.name)),
            "email" => Some(FieldValue::text(&self.email)),
            "team" => Some(FieldValue::text(&self.team)),
            _ => None,
        }
    }

    fn from_draft(id: Uuid, draft: NewUser, now: OffsetDateTime) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            team: draft.team,
            created_at: now,
        }
    }

    fn apply_draft(self, draft: NewUser, _now: OffsetDateTime) -> Self {
        Self {
            name: draft.name,
            email: draft.email,
            team: draft.team,
            ..self
        }
    }

    fn bind_draft<'q>(draft: &NewUser, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.name.clone())
            .bind(draft.email.clone())
            .bind(draft.team.clone())
    }
}
