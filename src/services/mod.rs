pub mod leaderboard;
pub mod seed;
