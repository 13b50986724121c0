use log::warn;
use rocket::fs::FileServer;
use rocket::{catchers, routes, Build, Rocket};

use crate::modules::helpers::config::Config;
use crate::modules::helpers::fairings::cors::{preflight, CORS};
use crate::routes::{admin_files, api, catchers};

pub mod errors;
pub mod schema;
pub mod modules;
pub mod macros {
    pub mod database_error_handler;
    pub mod redis;
    pub mod request_caching;
}
pub mod routes {
    pub mod admin_files;
    pub mod catchers;
    pub mod api {
        pub mod admin;
        pub mod leaderboard;
    }
}

/// # build the web server
/// mounts the public and admin api, the admin page and, when the directory
/// exists, the public site.
///
/// ## Arguments
/// * `config` - the loaded configuration, managed as state
pub fn build_rocket(config: Config) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", "0.0.0.0"));
    let public_dir = config.public_dir.clone();

    let server = rocket::custom(figment)
        .attach(CORS)
        .manage(config)
        .register("/", catchers![catchers::unauthorized, catchers::default_catcher])
        .mount("/", routes![
            preflight,
            admin_files::admin_redirect,
            admin_files::admin_files,
        ])
        .mount(
            "/api",
            routes![
                // public
                api::leaderboard::get_config,
                api::leaderboard::get_leaderboard,
                api::leaderboard::get_driver,
                api::leaderboard::get_last_team,
                // points
                api::admin::get_points,
                api::admin::put_points,
                // drivers
                api::admin::list_drivers,
                api::admin::create_driver,
                api::admin::delete_driver,
                // teams
                api::admin::list_teams,
                api::admin::create_team,
                api::admin::delete_team,
                // maps
                api::admin::list_maps,
                api::admin::create_map,
                api::admin::delete_map,
                // results
                api::admin::list_results,
                api::admin::create_result,
                api::admin::update_result,
                api::admin::delete_result,
            ],
        );

    if public_dir.is_dir() {
        server.mount("/", FileServer::from(public_dir))
    } else {
        warn!(target:"lib:build_rocket", "Public directory {} not found, not serving the site", public_dir.display());
        server
    }
}
