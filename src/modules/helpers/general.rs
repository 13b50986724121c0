use crate::errors::{CustomResult, Error};

pub struct Helpers {}

impl Helpers {
    /// # parse an id from a path segment
    ///
    /// ## Arguments
    /// * `raw` - the segment as it appeared in the url
    /// * `message` - the error message when it is not an id
    ///
    /// ## Returns
    /// * `i32` - the id
    pub fn parse_id(raw: &str, message: &str) -> CustomResult<i32> {
        raw.trim().parse::<i32>().map_err(|_| Error::invalid(message))
    }

    /// # get a required name
    /// trims the given name, an absent or blank name is rejected with `<field> required`
    pub fn required_name(name: Option<&str>, field: &str) -> CustomResult<String> {
        match name.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
            _ => Err(Error::invalid(format!("{} required", field))),
        }
    }
}
