use std::fmt;

use time::{Date, Duration};
use tracing::{info, instrument};

use super::leaderboard;
use crate::models::{NewActivity, NewTeam, NewUser, NewWorkout, User};
use crate::state::AppState;
use crate::store::StoreError;

pub const ACTIVITY_TYPES: [&str; 6] = [
    "Running",
    "Swimming",
    "Cycling",
    "Weightlifting",
    "Martial Arts",
    "Yoga",
];

pub const DAYS: i32 = 7;

const TEAMS: [(&str, &str); 2] = [
    (
        "Team Marvel",
        "Earth's Mightiest Heroes unite to push their limits and achieve greatness!",
    ),
    (
        "Team DC",
        "The World's Greatest Super Heroes combining strength and determination!",
    ),
];

// (name, email, team), in creation order
const HEROES: [(&str, &str, &str); 12] = [
    ("Tony Stark", "ironman@marvel.com", "Team Marvel"),
    ("Steve Rogers", "captain@marvel.com", "Team Marvel"),
    ("Thor Odinson", "thor@marvel.com", "Team Marvel"),
    ("Natasha Romanoff", "blackwidow@marvel.com", "Team Marvel"),
    ("Bruce Banner", "hulk@marvel.com", "Team Marvel"),
    ("Peter Parker", "spiderman@marvel.com", "Team Marvel"),
    ("Bruce Wayne", "batman@dc.com", "Team DC"),
    ("Clark Kent", "superman@dc.com", "Team DC"),
    ("Diana Prince", "wonderwoman@dc.com", "Team DC"),
    ("Barry Allen", "flash@dc.com", "Team DC"),
    ("Arthur Curry", "aquaman@dc.com", "Team DC"),
    ("Hal Jordan", "greenlantern@dc.com", "Team DC"),
];

// (name, description, activity_type, difficulty, estimated_calories, duration)
const WORKOUTS: [(&str, &str, &str, &str, i32, i32); 10] = [
    (
        "Super Soldier Training",
        "Intense full-body workout inspired by Captain America's regiment",
        "Weightlifting",
        "Advanced",
        450,
        60,
    ),
    (
        "Web-Slinger Circuit",
        "High-intensity agility and strength training",
        "Martial Arts",
        "Intermediate",
        380,
        45,
    ),
    (
        "Asgardian Endurance Run",
        "Long-distance running for stamina building",
        "Running",
        "Intermediate",
        500,
        60,
    ),
    (
        "Bat-Cave Strength Session",
        "Bruce Wayne's legendary strength training routine",
        "Weightlifting",
        "Advanced",
        480,
        75,
    ),
    (
        "Kryptonian Power Training",
        "Maximum strength and power development",
        "Weightlifting",
        "Expert",
        550,
        90,
    ),
    (
        "Amazonian Warrior Workout",
        "Combat-focused training from Themyscira",
        "Martial Arts",
        "Advanced",
        420,
        60,
    ),
    (
        "Speed Force Sprint",
        "Ultra-fast interval training for maximum speed",
        "Running",
        "Intermediate",
        400,
        30,
    ),
    (
        "Atlantean Swim Session",
        "Underwater endurance and strength training",
        "Swimming",
        "Intermediate",
        350,
        45,
    ),
    (
        "Zen Master Flow",
        "Flexibility and mindfulness practice",
        "Yoga",
        "Beginner",
        200,
        45,
    ),
    (
        "Hero Endurance Cycle",
        "Long-distance cycling for cardiovascular fitness",
        "Cycling",
        "Intermediate",
        450,
        60,
    ),
];

/// Record counts after a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub teams: usize,
    pub activities: usize,
    pub leaderboard: usize,
    pub workouts: usize,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} users, {} teams, {} activities, {} leaderboard entries, {} workouts",
            self.users, self.teams, self.activities, self.leaderboard, self.workouts
        )
    }
}

pub fn teams() -> Vec<NewTeam> {
    TEAMS
        .iter()
        .map(|&(name, description)| NewTeam {
            name: name.into(),
            description: description.into(),
        })
        .collect()
}

pub fn heroes() -> Vec<NewUser> {
    HEROES
        .iter()
        .map(|&(name, email, team)| NewUser {
            name: name.into(),
            email: email.into(),
            team: team.into(),
        })
        .collect()
}

pub fn workouts() -> Vec<NewWorkout> {
    WORKOUTS
        .iter()
        .map(
            |&(name, description, activity_type, difficulty, estimated_calories, duration)| {
                NewWorkout {
                    name: name.into(),
                    description: description.into(),
                    activity_type: activity_type.into(),
                    difficulty: difficulty.into(),
                    estimated_calories,
                    duration,
                }
            },
        )
        .collect()
}

/// Minutes for the user at `user_index` on `day` days before today.
pub fn demo_duration(user_index: i32, day: i32) -> i32 {
    30 + 5 * user_index + 2 * day
}

pub fn demo_calories(duration: i32) -> i32 {
    duration * 8
}

/// A week of activity per user, most recent day first.
pub fn demo_activities(users: &[User], today: Date) -> Vec<NewActivity> {
    let mut out = Vec::with_capacity(users.len() * DAYS as usize);
    for (i, user) in (0..).zip(users) {
        for day in 0..DAYS {
            let duration = demo_duration(i, day);
            out.push(NewActivity {
                user_email: user.email.clone(),
                activity_type: ACTIVITY_TYPES[day as usize % ACTIVITY_TYPES.len()].into(),
                duration,
                calories_burned: demo_calories(duration),
                date: today.saturating_sub(Duration::days(day.into())),
            });
        }
    }
    out
}

/// Wipes every collection and writes the demo data set, then materializes the leaderboard.
#[instrument(skip(state))]
pub async fn populate(state: &AppState, today: Date) -> Result<SeedReport, StoreError> {
    info!("deleting existing data");
    state.users.reset().await?;
    state.teams.reset().await?;
    state.activities.reset().await?;
    state.leaderboard.reset().await?;
    state.workouts.reset().await?;

    info!("creating teams");
    for team in teams() {
        state.teams.insert(team).await?;
    }

    info!("creating users");
    let mut users = Vec::with_capacity(HEROES.len());
    for hero in heroes() {
        users.push(state.users.insert(hero).await?);
    }

    info!("creating activities");
    for activity in demo_activities(&users, today) {
        state.activities.insert(activity).await?;
    }

    info!("creating leaderboard");
    leaderboard::rebuild(state).await?;

    info!("creating workouts");
    for workout in workouts() {
        state.workouts.insert(workout).await?;
    }

    let report = SeedReport {
        users: state.users.fetch_all().await?.len(),
        teams: state.teams.fetch_all().await?.len(),
        activities: state.activities.fetch_all().await?.len(),
        leaderboard: state.leaderboard.fetch_all().await?.len(),
        workouts: state.workouts.fetch_all().await?.len(),
    };
    info!(%report, "database population completed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 15);

    fn expected_week_calories(user_index: i32) -> i64 {
        (0..DAYS)
            .map(|day| i64::from(demo_calories(demo_duration(user_index, day))))
            .sum()
    }

    #[tokio::test]
    async fn populate_creates_the_demo_data_set() {
        let state = AppState::fake();
        let report = populate(&state, TODAY).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                users: 12,
                teams: 2,
                activities: 84,
                leaderboard: 12,
                workouts: 10,
            }
        );
    }

    #[tokio::test]
    async fn reseeding_replaces_rather_than_appends() {
        let state = AppState::fake();
        let first = populate(&state, TODAY).await.unwrap();
        let second = populate(&state, TODAY).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn leaderboard_totals_follow_the_demo_formula() {
        let state = AppState::fake();
        populate(&state, TODAY).await.unwrap();

        let users = state.users.fetch_all().await.unwrap();
        let entries = state.leaderboard.fetch_all().await.unwrap();
        for (i, user) in (0..).zip(&users) {
            let entry = entries
                .iter()
                .find(|e| e.user_email == user.email)
                .expect("every user is ranked");
            assert_eq!(entry.total_activities, DAYS);
            assert_eq!(entry.total_calories, expected_week_calories(i));
        }

        // later users train longer every day, so creation order is reversed
        let ranked: Vec<&str> = entries.iter().map(|e| e.user_email.as_str()).collect();
        let mut reversed: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        reversed.reverse();
        assert_eq!(ranked, reversed);
        assert_eq!(entries[0].user_name, "Hal Jordan");
        assert_eq!(entries[0].total_calories, expected_week_calories(11));
    }

    #[test]
    fn first_user_week_matches_hand_computed_total() {
        // durations 30, 32, .., 42 minutes; 8 kcal per minute
        assert_eq!(expected_week_calories(0), 8 * (30 + 32 + 34 + 36 + 38 + 40 + 42));
    }

    #[test]
    fn demo_activities_cycle_types_and_walk_back_in_time() {
        let users: Vec<User> = Vec::new();
        assert!(demo_activities(&users, TODAY).is_empty());

        let state_users: Vec<User> = heroes()
            .into_iter()
            .take(1)
            .map(|h| {
                <User as crate::store::Record>::from_draft(
                    uuid::Uuid::new_v4(),
                    h,
                    time::OffsetDateTime::now_utc(),
                )
            })
            .collect();
        let week = demo_activities(&state_users, TODAY);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].activity_type, "Running");
        assert_eq!(week[5].activity_type, "Yoga");
        assert_eq!(week[6].activity_type, "Running");
        assert_eq!(week[0].date, TODAY);
        assert_eq!(week[6].date, date!(2024 - 06 - 09));
        assert_eq!(week[3].duration, 36);
        assert_eq!(week[3].calories_burned, 288);
    }

    #[tokio::test]
    async fn team_filter_splits_heroes_evenly() {
        let state = AppState::fake();
        populate(&state, TODAY).await.unwrap();
        let marvel = state
            .users
            .fetch_where("team", "Team Marvel", None)
            .await
            .unwrap();
        assert_eq!(marvel.len(), 6);
        assert!(marvel.iter().all(|u| u.team == "Team Marvel"));
    }
}
