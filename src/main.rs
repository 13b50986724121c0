use rocket::{launch, Build, Rocket};

use racing_league::build_rocket;
use racing_league::modules::helpers::config::Config;
use racing_league::modules::helpers::logging::setup_logging;

#[launch]
fn rocket() -> Rocket<Build> {
    setup_logging().expect("Failed to setup logging");

    let config = Config::load().expect("Failed to load config");

    // start the webserver
    build_rocket(config)
}
