//! Resets the database and fills it with the demo data set.

use anyhow::Context;
use octofit::{services::seed, state::AppState, telemetry};
use time::OffsetDateTime;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let state = AppState::init().await?;
    let today = OffsetDateTime::now_utc().date();

    let report = seed::populate(&state, today)
        .await
        .context("populate demo data")?;

    println!("Created {} users", report.users);
    println!("Created {} teams", report.teams);
    println!("Created {} activities", report.activities);
    println!("Created {} leaderboard entries", report.leaderboard);
    println!("Created {} workouts", report.workouts);
    Ok(())
}
