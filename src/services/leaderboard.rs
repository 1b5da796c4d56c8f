use std::collections::HashMap;

use tracing::{info, instrument};

use crate::models::{Activity, LeaderboardEntry, NewLeaderboardEntry, User};
use crate::state::AppState;
use crate::store::StoreError;

/// Ranks users by calories burned across all of their activities.
///
/// Activities are matched to users by exact (case-sensitive) email. Activities
/// whose email belongs to no user are ignored. Users with equal totals keep
/// their input order, so every run over the same input yields the same ranks.
/// Ranks are sequential: ties do not share a rank.
pub struct LeaderboardBuilder<'a> {
    users: &'a [User],
    activities: &'a [Activity],
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    calories: i64,
    activities: i32,
}

impl<'a> LeaderboardBuilder<'a> {
    pub fn new(users: &'a [User], activities: &'a [Activity]) -> Self {
        Self { users, activities }
    }

    pub fn build(&self) -> Vec<NewLeaderboardEntry> {
        let mut totals: HashMap<&str, Totals> = HashMap::new();
        for activity in self.activities {
            let t = totals.entry(activity.user_email.as_str()).or_default();
            t.calories += i64::from(activity.calories_burned);
            t.activities += 1;
        }

        let mut entries: Vec<NewLeaderboardEntry> = self
            .users
            .iter()
            .map(|user| {
                let t = totals.get(user.email.as_str()).copied().unwrap_or_default();
                NewLeaderboardEntry {
                    user_email: user.email.clone(),
                    user_name: user.name.clone(),
                    team: user.team.clone(),
                    total_calories: t.calories,
                    total_activities: t.activities,
                    rank: 0,
                }
            })
            .collect();

        // sort_by is stable
        entries.sort_by(|a, b| b.total_calories.cmp(&a.total_calories));
        for (position, entry) in entries.iter_mut().enumerate() {
            entry.rank = position as i32 + 1;
        }
        entries
    }
}

/// Recomputes the leaderboard from the stored users and activities and replaces
/// the stored entries. Only the seed driver calls this.
#[instrument(skip_all)]
pub async fn rebuild(state: &AppState) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let users = state.users.fetch_all().await?;
    let activities = state.activities.fetch_all().await?;
    let drafts = LeaderboardBuilder::new(&users, &activities).build();

    let removed = state.leaderboard.reset().await?;
    let mut stored = Vec::with_capacity(drafts.len());
    for draft in drafts {
        stored.push(state.leaderboard.insert(draft).await?);
    }

    info!(
        users = users.len(),
        activities = activities.len(),
        replaced = removed,
        entries = stored.len(),
        "leaderboard rebuilt"
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, OffsetDateTime};
    use uuid::Uuid;

    use crate::models::{NewActivity, NewUser};
    use crate::store::Record;

    fn user(name: &str, email: &str, team: &str) -> User {
        User::from_draft(
            Uuid::new_v4(),
            NewUser {
                name: name.into(),
                email: email.into(),
                team: team.into(),
            },
            OffsetDateTime::now_utc(),
        )
    }

    fn activity(email: &str, calories: i32) -> Activity {
        Activity::from_draft(
            Uuid::new_v4(),
            NewActivity {
                user_email: email.into(),
                activity_type: "Running".into(),
                duration: 30,
                calories_burned: calories,
                date: date!(2024 - 05 - 01),
            },
            OffsetDateTime::now_utc(),
        )
    }

    fn summary(entries: &[NewLeaderboardEntry]) -> Vec<(&str, i64, i32)> {
        entries
            .iter()
            .map(|e| (e.user_email.as_str(), e.total_calories, e.rank))
            .collect()
    }

    #[test]
    fn higher_total_ranks_first() {
        let users = [
            user("B", "b@hero.com", "Team DC"),
            user("A", "a@hero.com", "Team Marvel"),
        ];
        let activities = [
            activity("a@hero.com", 600),
            activity("b@hero.com", 800),
            activity("a@hero.com", 400),
        ];
        let entries = LeaderboardBuilder::new(&users, &activities).build();
        assert_eq!(
            summary(&entries),
            vec![("a@hero.com", 1000, 1), ("b@hero.com", 800, 2)]
        );
        assert_eq!(entries[0].total_activities, 2);
        assert_eq!(entries[0].user_name, "A");
        assert_eq!(entries[0].team, "Team Marvel");
    }

    #[test]
    fn ties_keep_input_order_with_sequential_ranks() {
        let users = [
            user("X", "x@hero.com", "T"),
            user("Y", "y@hero.com", "T"),
            user("Z", "z@hero.com", "T"),
        ];
        let activities = [
            activity("z@hero.com", 300),
            activity("y@hero.com", 500),
            activity("x@hero.com", 500),
        ];
        let builder = LeaderboardBuilder::new(&users, &activities);
        let first = builder.build();
        assert_eq!(
            summary(&first),
            vec![("x@hero.com", 500, 1), ("y@hero.com", 500, 2), ("z@hero.com", 300, 3)]
        );
        assert_eq!(builder.build(), first);
    }

    #[test]
    fn users_without_activities_get_zero_totals() {
        let users = [user("Idle", "idle@hero.com", "T"), user("Busy", "busy@hero.com", "T")];
        let activities = [activity("busy@hero.com", 120)];
        let entries = LeaderboardBuilder::new(&users, &activities).build();
        assert_eq!(entries[1].user_email, "idle@hero.com");
        assert_eq!(entries[1].total_calories, 0);
        assert_eq!(entries[1].total_activities, 0);
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn orphan_and_case_mismatched_activities_are_ignored() {
        let users = [user("Tony", "ironman@marvel.com", "Team Marvel")];
        let activities = [
            activity("ironman@marvel.com", 100),
            activity("IronMan@marvel.com", 5000),
            activity("ghost@nowhere.com", 9000),
        ];
        let entries = LeaderboardBuilder::new(&users, &activities).build();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_calories, 100);
        assert_eq!(entries[0].total_activities, 1);
    }

    #[test]
    fn ranks_form_a_permutation_of_one_to_n() {
        let users: Vec<User> = (0..9)
            .map(|i| user(&format!("U{i}"), &format!("u{i}@hero.com"), "T"))
            .collect();
        let activities: Vec<Activity> = (0..9)
            .flat_map(|i| (0..i % 4).map(move |d| (i, d)))
            .map(|(i, d)| activity(&format!("u{i}@hero.com"), (i * 10 + d) % 35))
            .collect();
        let entries = LeaderboardBuilder::new(&users, &activities).build();

        assert_eq!(entries.len(), users.len());
        let mut ranks: Vec<i32> = entries.iter().map(|e| e.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=9).collect::<Vec<i32>>());
        assert!(entries
            .windows(2)
            .all(|w| w[0].total_calories >= w[1].total_calories && w[0].rank < w[1].rank));
        for u in &users {
            assert_eq!(entries.iter().filter(|e| e.user_email == u.email).count(), 1);
        }
    }

    #[test]
    fn empty_inputs_build_nothing() {
        assert!(LeaderboardBuilder::new(&[], &[]).build().is_empty());
    }

    #[tokio::test]
    async fn rebuild_replaces_stored_entries() {
        let state = AppState::fake();
        for (name, email) in [("A", "a@hero.com"), ("B", "b@hero.com")] {
            state
                .users
                .insert(NewUser {
                    name: name.into(),
                    email: email.into(),
                    team: "Team".into(),
                })
                .await
                .unwrap();
        }
        state
            .activities
            .insert(NewActivity {
                user_email: "b@hero.com".into(),
                activity_type: "Yoga".into(),
                duration: 45,
                calories_burned: 200,
                date: date!(2024 - 05 - 01),
            })
            .await
            .unwrap();

        rebuild(&state).await.unwrap();
        let stored = rebuild(&state).await.unwrap();
        assert_eq!(stored.len(), 2);

        let listed = state.leaderboard.fetch_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].user_email, "b@hero.com");
        assert_eq!(listed[0].rank, 1);
        assert_eq!(listed[1].rank, 2);
    }
}
