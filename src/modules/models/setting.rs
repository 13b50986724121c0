use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::modules::helpers::points::SettingsStore;
use crate::schema::app_settings;

#[derive(Insertable, Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = app_settings)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

impl Setting {
    pub fn get(conn: &mut PgConnection, key_in: &str) -> QueryResult<Option<Setting>> {
        use crate::schema::app_settings::dsl::*;

        app_settings
            .filter(key.eq(key_in))
            .first::<Setting>(conn)
            .optional()
    }

    /// # insert or overwrite a setting
    pub fn upsert(conn: &mut PgConnection, key_in: &str, value_in: &str) -> QueryResult<usize> {
        use crate::schema::app_settings::dsl::*;

        diesel::insert_into(app_settings)
            .values(&Setting {
                key: key_in.to_string(),
                value: value_in.to_string(),
            })
            .on_conflict(key)
            .do_update()
            .set(value.eq(excluded(value)))
            .execute(conn)
    }
}

impl SettingsStore for PgConnection {
    fn read_setting(&mut self, key: &str) -> CustomResult<Option<String>> {
        Setting::get(self, key)
            .map(|setting| setting.map(|s| s.value))
            .map_err(|source| Error::Database { source })
    }

    fn write_setting(&mut self, key: &str, value: &str) -> CustomResult<()> {
        Setting::upsert(self, key, value)
            .map(|_| ())
            .map_err(|source| Error::Database { source })
    }
}
