pub mod redis;
pub mod models {
    pub mod driver;
    pub mod team;
    pub mod map;
    pub mod race_result;
    pub mod setting;

    pub mod general;
}

pub mod helpers {
    pub mod leaderboard;
    pub mod points;

    pub mod config;
    pub mod general;
    pub mod logging;

    pub mod fairings {
        pub mod cors;
    }

    pub mod guards {
        pub mod admin;
    }
}
