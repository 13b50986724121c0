/// check if a request is in the cache, if it is, return it.
/// else follow the normal flow
///
/// does nothing when debug enabled or when no redis is configured
macro_rules! read_cache_request {
    ( $origin:expr, $config:expr ) => {
        if !cfg!(debug_assertions) {
            if let Some(redis_url) = $config.redis_url.as_deref() {
                let uri = $origin.path().to_string();
                match &mut Redis::connect(redis_url) {
                    Ok(r_conn) => match Redis::get_data::<String, String>(r_conn, uri.clone()) {
                        Ok(Some(data)) => match serde_json::from_str(&data) {
                            Ok(cached) => return Ok(Json(cached)),
                            Err(error) => {
                                warn!(target:"macros/request_caching:read", "Ignoring unreadable cache entry {}: {}", uri, error);
                            }
                        },
                        Ok(None) => {}
                        Err(error) => {
                            error!(target:"macros/request_caching:read", "Error reading from redis: {}", error);
                        }
                    },
                    Err(error) => {
                        error!(target:"macros/request_caching:read", "Error connecting to redis: {}", error);
                    }
                }
            }
        }
    }
}


/// add the response to the request to the cache and then return it.
///
/// if debug is enabled we wont add to cache.
macro_rules! cache_response {
    ( $origin:expr, $config:expr, $data:expr ) => {
        let data = $data;
        if !cfg!(debug_assertions) {
            if let Some(redis_url) = $config.redis_url.as_deref() {
                let uri = $origin.path().to_string();
                match (&mut Redis::connect(redis_url), serde_json::to_string(&data)) {
                    (Ok(r_conn), Ok(response_str)) => {
                        if let Err(error) = Redis::set_data::<String, String>(r_conn, uri, response_str) {
                            error!(target:"macros/request_caching:cache", "Error writing to redis: {}", error);
                        }
                    }
                    (Err(error), _) => {
                        error!(target:"macros/request_caching:cache", "Error connecting to redis: {}", error);
                    }
                    (_, Err(error)) => {
                        error!(target:"macros/request_caching:cache", "Error serializing response: {}", error);
                    }
                }
            }
        }

        return Ok(Json(data))
    }
}

pub(crate) use read_cache_request;
pub(crate) use cache_response;
