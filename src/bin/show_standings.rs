use std::process;

use log::{error, info};

use racing_league::modules::helpers::config::Config;
use racing_league::modules::helpers::leaderboard::compute_leaderboard;
use racing_league::modules::helpers::logging::setup_logging;
use racing_league::modules::helpers::points::get_points;
use racing_league::modules::models::general::establish_connection;
use racing_league::modules::models::race_result::ResultRow;

fn main() {
    setup_logging().expect("Error setting up logging");
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            error!(target:"show_standings", "{}", error);
            process::exit(1);
        }
    };

    let connection = &mut match establish_connection(&config.database_url) {
        Ok(connection) => connection,
        Err(error) => {
            error!(target:"show_standings", "{}", error);
            process::exit(1);
        }
    };

    let points = get_points(connection);
    let rows = match ResultRow::get_all(connection) {
        Ok(rows) => rows,
        Err(error) => {
            error!(target:"show_standings", "Error loading results: {}", error);
            process::exit(1);
        }
    };
    info!(target:"show_standings", "aggregating {} results with points {:?}", rows.len(), points.as_slice());

    let board = compute_leaderboard(&rows, &points);

    println!("{:>4}  {:<24} {:<20} {:>7} {:>7}", "#", "driver", "team", "points", "races");
    for (position, driver) in board.driver_standings.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:<20} {:>7} {:>7}",
            position + 1,
            driver.name,
            driver.primary_team_name.as_deref().unwrap_or("-"),
            driver.total_points,
            driver.results_count
        );
    }

    println!();
    println!("{:>4}  {:<24} {:>7} {:>7}", "#", "team", "points", "drivers");
    for (position, team) in board.team_standings.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:>7} {:>7}",
            position + 1,
            team.name,
            team.total_points,
            team.drivers_count
        );
    }
}
