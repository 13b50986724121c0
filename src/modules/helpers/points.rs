use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CustomResult, Error};

/// key of the points table in `app_settings`
pub const POINTS_SETTING_KEY: &str = "points_json";

/// points for 1st through 10th place when nothing usable is stored
pub const DEFAULT_POINTS: [u64; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// # settings storage
/// a key/value store for named settings. writes are upserts.
pub trait SettingsStore {
    fn read_setting(&mut self, key: &str) -> CustomResult<Option<String>>;
    fn write_setting(&mut self, key: &str, value: &str) -> CustomResult<()>;
}

/// Points awarded per finishing place. Index 0 holds the points for 1st place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct PointsTable(Vec<u64>);

impl Default for PointsTable {
    fn default() -> Self {
        PointsTable(DEFAULT_POINTS.to_vec())
    }
}

impl PointsTable {
    /// # create from a candidate array
    /// clean the candidate values and build a table from what survives
    ///
    /// ## Arguments
    /// * `candidate` - the raw values, usually straight from a json payload
    ///
    /// ## Returns
    /// * `PointsTable` - the cleaned table
    /// * `Error::EmptyPointsArray` - when nothing survives cleaning
    pub fn from_candidate(candidate: &[Value]) -> CustomResult<PointsTable> {
        let cleaned = clean_points(candidate);
        if cleaned.is_empty() {
            return Err(Error::EmptyPointsArray {});
        }

        Ok(PointsTable(cleaned))
    }

    /// # parse a stored setting
    /// returns `None` for anything that is not a json array with at least one usable value
    pub fn from_stored(raw: &str) -> Option<PointsTable> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => PointsTable::from_candidate(&values).ok(),
            Ok(_) => None,
            Err(_) => None,
        }
    }

    pub fn points_for_place(&self, place: i32) -> u64 {
        points_for_place(place, &self.0)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn to_json(&self) -> CustomResult<String> {
        serde_json::to_string(&self.0).map_err(|source| Error::Serialization { source })
    }
}

/// # points for a finishing place
/// places are 1-indexed. anything below 1 or beyond the end of the table scores 0.
pub fn points_for_place(place: i32, table: &[u64]) -> u64 {
    if place < 1 {
        return 0;
    }

    table.get((place - 1) as usize).copied().unwrap_or(0)
}

/// # clean candidate points
/// every value is coerced to a number first: `null`, `false` and blank strings
/// count as 0, `true` as 1, numeric strings are parsed. values that are not
/// numbers after that, non-finite, negative or too large are dropped and the
/// rest truncated to integers.
pub fn clean_points(candidate: &[Value]) -> Vec<u64> {
    candidate
        .iter()
        .filter_map(coerce_number)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n < MAX_POINTS)
        .map(|n| n.trunc() as u64)
        .collect()
}

// 2^64, the first value that no longer fits
const MAX_POINTS: f64 = 18_446_744_073_709_551_616.0;

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// # get the active points table
/// never fails. any storage or parse problem falls back to the default table.
pub fn get_points<S: SettingsStore + ?Sized>(store: &mut S) -> PointsTable {
    match store.read_setting(POINTS_SETTING_KEY) {
        Ok(Some(raw)) => PointsTable::from_stored(&raw).unwrap_or_else(|| {
            warn!(target:"helpers/points:get_points", "stored points table is unusable, using default. (value: {})", raw);
            PointsTable::default()
        }),
        Ok(None) => PointsTable::default(),
        Err(error) => {
            warn!(target:"helpers/points:get_points", "could not read points table, using default. (error: {})", error);
            PointsTable::default()
        }
    }
}

/// # set the active points table
/// cleans the candidate, stores it and returns what was stored
///
/// ## Arguments
/// * `store` - where the setting lives
/// * `candidate` - the raw values to clean
///
/// ## Returns
/// * `PointsTable` - the cleaned and stored table
pub fn set_points<S: SettingsStore + ?Sized>(store: &mut S, candidate: &[Value]) -> CustomResult<PointsTable> {
    let table = PointsTable::from_candidate(candidate)?;
    save_points(store, &table)?;

    Ok(table)
}

/// store an already cleaned table
pub fn save_points<S: SettingsStore + ?Sized>(store: &mut S, table: &PointsTable) -> CustomResult<()> {
    store.write_setting(POINTS_SETTING_KEY, &table.to_json()?)?;
    info!(target:"helpers/points:save_points", "points table updated: {:?}", table.as_slice());

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub values: HashMap<String, String>,
        pub broken: bool,
    }

    impl SettingsStore for MemoryStore {
        fn read_setting(&mut self, key: &str) -> CustomResult<Option<String>> {
            if self.broken {
                return Err(Error::Database {
                    source: diesel::result::Error::BrokenTransactionManager,
                });
            }
            Ok(self.values.get(key).cloned())
        }

        fn write_setting(&mut self, key: &str, value: &str) -> CustomResult<()> {
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn place_lookup() {
        let table = [25, 18, 15];
        assert_eq!(points_for_place(1, &table), 25);
        assert_eq!(points_for_place(3, &table), 15);
        assert_eq!(points_for_place(4, &table), 0);
        assert_eq!(points_for_place(0, &table), 0);
        assert_eq!(points_for_place(-2, &table), 0);
        assert_eq!(points_for_place(1, &[]), 0);
    }

    #[test]
    fn cleaning_drops_and_truncates() {
        let cleaned = clean_points(&[json!(25.9), json!(-3), json!("18"), json!("abc"), json!(" 4 "), json!([1])]);
        assert_eq!(cleaned, vec![25, 18, 4]);
    }

    #[test]
    fn null_and_blank_values_keep_their_place() {
        assert_eq!(clean_points(&[json!(25), json!(null), json!(15)]), vec![25, 0, 15]);
        assert_eq!(clean_points(&[json!(""), json!("   "), json!(false), json!(true)]), vec![0, 0, 0, 1]);
    }

    #[test]
    fn large_values_are_kept_not_clamped() {
        assert_eq!(clean_points(&[json!(1e10), json!(4294967296u64)]), vec![10_000_000_000, 4_294_967_296]);
        assert!(clean_points(&[json!(1e30)]).is_empty());
    }

    #[test]
    fn cleaning_drops_non_finite_strings() {
        assert!(clean_points(&[json!("inf"), json!("NaN"), json!("-1")]).is_empty());
    }

    #[test]
    fn missing_setting_uses_default() {
        let mut store = MemoryStore::default();
        assert_eq!(get_points(&mut store), PointsTable::default());
        assert_eq!(get_points(&mut store).as_slice(), &DEFAULT_POINTS);
    }

    #[test]
    fn unreadable_store_uses_default() {
        let mut store = MemoryStore {
            broken: true,
            ..Default::default()
        };
        assert_eq!(get_points(&mut store), PointsTable::default());
    }

    #[test]
    fn malformed_settings_use_default() {
        for raw in ["not json", "{\"a\": 1}", "12", "[]", "[-1, \"x\"]"] {
            let mut store = MemoryStore::default();
            store.values.insert(POINTS_SETTING_KEY.to_string(), raw.to_string());
            assert_eq!(get_points(&mut store), PointsTable::default(), "raw: {}", raw);
        }
    }

    #[test]
    fn stored_table_is_cleaned_on_read() {
        let mut store = MemoryStore::default();
        store.values.insert(POINTS_SETTING_KEY.to_string(), "[10, 5.5, -1, 2]".to_string());
        assert_eq!(get_points(&mut store).as_slice(), &[10, 5, 2]);
    }

    #[test]
    fn empty_candidate_is_rejected() {
        let mut store = MemoryStore::default();
        assert!(matches!(set_points(&mut store, &[]), Err(Error::EmptyPointsArray { .. })));
        assert!(matches!(set_points(&mut store, &[json!(-1), json!("x")]), Err(Error::EmptyPointsArray { .. })));
        assert!(store.values.is_empty());
    }

    #[test]
    fn null_only_candidate_stores_zero() {
        let mut store = MemoryStore::default();
        let saved = set_points(&mut store, &[json!(-1), json!("x"), json!(null)]).unwrap();
        assert_eq!(saved.as_slice(), &[0]);
        assert_eq!(store.values.get(POINTS_SETTING_KEY).unwrap(), "[0]");
    }

    #[test]
    fn stored_nulls_are_read_as_zero() {
        let mut store = MemoryStore::default();
        store.values.insert(POINTS_SETTING_KEY.to_string(), "[25,null,15]".to_string());
        assert_eq!(get_points(&mut store).as_slice(), &[25, 0, 15]);
        assert_eq!(get_points(&mut store).points_for_place(2), 0);
        assert_eq!(get_points(&mut store).points_for_place(3), 15);
    }

    #[test]
    fn set_points_round_trips() {
        let mut store = MemoryStore::default();
        let saved = set_points(&mut store, &[json!(25.9), json!(-3), json!("18")]).unwrap();
        assert_eq!(saved.as_slice(), &[25, 18]);
        assert_eq!(store.values.get(POINTS_SETTING_KEY).unwrap(), "[25,18]");
        assert_eq!(get_points(&mut store), saved);
    }

    #[test]
    fn later_write_wins() {
        let mut store = MemoryStore::default();
        set_points(&mut store, &[json!(3), json!(2), json!(1)]).unwrap();
        set_points(&mut store, &[json!(9)]).unwrap();
        assert_eq!(get_points(&mut store).as_slice(), &[9]);
    }
}
