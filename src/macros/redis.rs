/// drop the cached public responses on a background thread
macro_rules! clear_cache {
    ($config:expr) => {
        if let Some(redis_url) = $config.redis_url.clone() {
            std::thread::spawn(move || match &mut Redis::connect(&redis_url) {
                Ok(r_conn) => {
                    Redis::clear_public_cache(r_conn);
                }
                Err(error) => {
                    error!(target:"macros/redis:clear_cache", "Error connecting to redis: {}", error);
                }
            });
        }
    }
}

macro_rules! delete_keys {
    ($conn:expr, $keys:expr, $target:expr) => {
        for key in $keys {
            match Redis::delete($conn, &key) {
                Ok(_) => {}
                Err(error) => {
                    error!(target:$target, "Error while deleting key: {}", error);
                }
            };
        }
    }
}

pub(crate) use clear_cache;
pub(crate) use delete_keys;
