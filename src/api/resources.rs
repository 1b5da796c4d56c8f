use std::sync::Arc;

use super::{validate, Filter, Resource};
use crate::error::ApiResult;
use crate::models::{
    Activity, LeaderboardEntry, NewActivity, NewLeaderboardEntry, NewTeam, NewUser, NewWorkout,
    Team, User, Workout,
};
use crate::state::AppState;
use crate::store::{OrderBy, RecordStore};

const NAME_MAX: usize = 200;
const LABEL_MAX: usize = 100;
const DIFFICULTY_MAX: usize = 50;

impl Resource for User {
    const PATH: &'static str = "users";
    const FILTERS: &'static [Filter] = &[Filter {
        action: "by_team",
        param: "team",
        column: "team",
        order: None,
    }];

    fn store(state: &AppState) -> &Arc<dyn RecordStore<Self>> {
        &state.users
    }

    fn validate(draft: &NewUser) -> ApiResult<()> {
        validate::max_len("name", &draft.name, NAME_MAX)?;
        validate::email("email", &draft.email)?;
        validate::max_len("team", &draft.team, LABEL_MAX)
    }
}

impl Resource for Team {
    const PATH: &'static str = "teams";

    fn store(state: &AppState) -> &Arc<dyn RecordStore<Self>> {
        &state.teams
    }

    fn validate(draft: &NewTeam) -> ApiResult<()> {
        validate::max_len("name", &draft.name, LABEL_MAX)
    }
}

impl Resource for Activity {
    const PATH: &'static str = "activities";
    const FILTERS: &'static [Filter] = &[
        Filter {
            action: "by_user",
            param: "email",
            column: "user_email",
            order: Some(OrderBy::desc("date")),
        },
        Filter {
            action: "by_type",
            param: "type",
            column: "activity_type",
            order: None,
        },
    ];

    fn store(state: &AppState) -> &Arc<dyn RecordStore<Self>> {
        &state.activities
    }

    fn validate(draft: &NewActivity) -> ApiResult<()> {
        validate::email("user_email", &draft.user_email)?;
        validate::max_len("activity_type", &draft.activity_type, LABEL_MAX)
    }
}

impl Resource for LeaderboardEntry {
    const PATH: &'static str = "leaderboard";
    const FILTERS: &'static [Filter] = &[Filter {
        action: "by_team",
        param: "team",
        column: "team",
        order: Some(OrderBy::asc("rank")),
    }];

    fn store(state: &AppState) -> &Arc<dyn RecordStore<Self>> {
        &state.leaderboard
    }

    fn validate(draft: &NewLeaderboardEntry) -> ApiResult<()> {
        validate::email("user_email", &draft.user_email)?;
        validate::max_len("user_name", &draft.user_name, NAME_MAX)?;
        validate::max_len("team", &draft.team, LABEL_MAX)
    }
}

impl Resource for Workout {
    const PATH: &'static str = "workouts";
    const FILTERS: &'static [Filter] = &[
        Filter {
            action: "by_difficulty",
            param: "difficulty",
            column: "difficulty",
            order: None,
        },
        Filter {
            action: "by_type",
            param: "type",
            column: "activity_type",
            order: None,
        },
    ];

    fn store(state: &AppState) -> &Arc<dyn RecordStore<Self>> {
        &state.workouts
    }

    fn validate(draft: &NewWorkout) -> ApiResult<()> {
        validate::max_len("name", &draft.name, NAME_MAX)?;
        validate::max_len("activity_type", &draft.activity_type, LABEL_MAX)?;
        validate::max_len("difficulty", &draft.difficulty, DIFFICULTY_MAX)
    }
}
