//! Configuration access port trait.

use chrono::NaiveDate;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Keys present in `section`, empty when the section is missing.
    fn keys(&self, section: &str) -> Vec<String>;

    /// `None` when the key is missing, `Some(Err(raw))` when it is not YYYY-MM-DD.
    fn get_date(&self, section: &str, key: &str) -> Option<Result<NaiveDate, String>> {
        self.get_string(section, key).map(|raw| {
            let trimmed = raw.trim();
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| trimmed.to_string())
        })
    }
}
