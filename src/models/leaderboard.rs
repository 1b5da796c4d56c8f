use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::{FieldValue, OrderBy, PgQueryAs, Record};

/// Materialized per-user totals. Rebuilt wholesale by the seed driver.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub team: String,
    pub total_calories: i64,
    pub total_activities: i32,
    pub rank: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaderboardEntry {
    pub user_email: String,
    pub user_name: String,
    pub team: String,
    pub total_calories: i64,
    pub total_activities: i32,
    pub rank: i32,
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} - {} cal",
            self.rank, self.user_name, self.total_calories
        )
    }
}

impl Record for LeaderboardEntry {
    type Draft = NewLeaderboardEntry;

    const TABLE: &'static str = "leaderboard";
    const COLUMNS: &'static [&'static str] = &[
        "user_email",
        "user_name",
        "team",
        "total_calories",
        "total_activities",
        "rank",
    ];
    const DEFAULT_ORDER: Option<OrderBy> = Some(OrderBy::asc("rank"));
    const TOUCHED_AT: Option<&'static str> = Some("updated_at");

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "user_email" => Some(FieldValue::text(&self.user_email)),
            "user_name" => Some(FieldValue::text(&self.user_name)),
            "team" => Some(FieldValue::text(&self.team)),
            "total_calories" => Some(FieldValue::Int(self.total_calories)),
            "total_activities" => Some(FieldValue::Int(self.total_activities.into())),
            "rank" => Some(FieldValue::Int(self.rank.into())),
            _ => None,
        }
    }

    fn from_draft(id: Uuid, draft: NewLeaderboardEntry, now: OffsetDateTime) -> Self {
        Self {
            id,
            user_email: draft.user_email,
            user_name: draft.user_name,
            team: draft.team,
            total_calories: draft.total_calories,
            total_activities: draft.total_activities,
            rank: draft.rank,
            updated_at: now,
        }
    }

    fn apply_draft(self, draft: NewLeaderboardEntry, now: OffsetDateTime) -> Self {
        Self::from_draft(self.id, draft, now)
    }

    fn bind_draft<'q>(
        draft: &NewLeaderboardEntry,
        query: PgQueryAs<'q, Self>,
    ) -> PgQueryAs<'q, Self> {
        query
            .bind(draft.user_email.clone())
            .bind(draft.user_name.clone())
            .bind(draft.team.clone())
            .bind(draft.total_calories)
            .bind(draft.total_activities)
            .bind(draft.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_like_a_scoreboard_line() {
        let entry = LeaderboardEntry::from_draft(
            Uuid::new_v4(),
            NewLeaderboardEntry {
                user_email: "test@hero.com".into(),
                user_name: "Test Hero".into(),
                team: "Test Team".into(),
                total_calories: 1000,
                total_activities: 5,
                rank: 1,
            },
            OffsetDateTime::now_utc(),
        );
        assert_eq!(entry.to_string(), "1. Test Hero - 1000 cal");
    }
}
