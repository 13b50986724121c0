use log::error;
use redis::{Client, Commands, Connection, FromRedisValue, RedisResult, ToRedisArgs};

use crate::macros::redis::delete_keys;

pub struct Redis {}

impl Redis {

    pub fn connect(redis_url: &str) -> RedisResult<Connection> {
        Client::open(redis_url)?.get_connection()
    }

    pub fn set_data<K: ToRedisArgs, D: ToRedisArgs>(conn: &mut Connection, key: K, data: D) -> RedisResult<()> {
        conn.set::<K, D, ()>(key, data)
    }

    pub fn get_data<K: ToRedisArgs, D: FromRedisValue>(conn: &mut Connection, key: K) -> RedisResult<Option<D>> {
        conn.get::<K, Option<D>>(key)
    }

    pub fn delete<K: ToRedisArgs>(conn: &mut Connection, key: K) -> RedisResult<()> {
        conn.del::<K, ()>(key)
    }

    pub fn keys<K: ToRedisArgs>(conn: &mut Connection, partial: K) -> RedisResult<Vec<String>> {
        conn.keys(partial)
    }

    /// # clear the public cache
    /// remove every cached response that depends on drivers, teams, maps, results or points
    pub fn clear_public_cache(r_conn: &mut Connection) {
        let mut keys: Vec<String> = match Redis::keys(r_conn, "/api/driver/*") {
            Ok(keys) => keys,
            Err(error) => {
                error!(target:"modules/redis:clear_public_cache", "error while getting keys from redis: {}", error);
                Vec::new()
            }
        };

        keys.append(&mut vec![
            "/api/leaderboard".to_string(),
            "/api/config".to_string(),
        ]);

        delete_keys!(r_conn, keys, "modules/redis:clear_public_cache");
    }
}
