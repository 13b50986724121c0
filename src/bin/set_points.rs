use std::env;
use std::process;

use log::{error, info};
use serde_json::Value;

use racing_league::errors::CustomResult;
use racing_league::modules::helpers::config::Config;
use racing_league::modules::helpers::logging::setup_logging;
use racing_league::modules::helpers::points::{set_points, PointsTable};
use racing_league::modules::models::general::establish_connection;

/// usage: set_points 25 18 15 12 10 8 6 4 2 1
fn main() {
    setup_logging().expect("Error setting up logging");

    // arguments are cleaned the same way as the admin api does
    let candidate: Vec<Value> = env::args().skip(1).map(Value::String).collect();

    match run(&candidate) {
        Ok(points) => {
            info!(target:"set_points", "stored points table: {:?}", points.as_slice());
            println!("{:?}", points.as_slice());
        }
        Err(error) => {
            error!(target:"set_points", "Error setting points: {}", error);
            process::exit(1);
        }
    }
}

fn run(candidate: &[Value]) -> CustomResult<PointsTable> {
    let config = Config::load()?;
    let connection = &mut establish_connection(&config.database_url)?;

    set_points(connection, candidate)
}
