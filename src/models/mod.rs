mod activity;
mod leaderboard;
mod team;
mod user;
mod workout;

pub use activity::{Activity, NewActivity};
pub use leaderboard::{LeaderboardEntry, NewLeaderboardEntry};
pub use team::{NewTeam, Team};
pub use user::{NewUser, User};
pub use workout::{NewWorkout, Workout};
