use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::limits::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Supplies public holidays for a country. The optimizer itself only sees
/// plain date sets; this is how callers fill `OptimizeRequest::holidays`.
pub trait HolidaySource {
    /// Holidays for one calendar year, sorted by date.
    fn holidays(&self, country: &str, year: i32) -> Vec<Holiday>;

    /// Holidays inside `start..=end`, sorted by date. Walks every year the
    /// range touches.
    fn holidays_between(&self, country: &str, start: NaiveDate, end: NaiveDate) -> Vec<Holiday> {
        if start > end {
            return Vec::new();
        }
        let mut out: Vec<Holiday> = (start.year()..=end.year())
            .flat_map(|year| self.holidays(country, year))
            .filter(|h| h.date >= start && h.date <= end)
            .collect();
        out.sort_by_key(|h| h.date);
        out
    }
}

/// In-memory holiday table keyed by upper-cased country code.
#[derive(Debug, Default)]
pub struct HolidayRegistry {
    countries: DashMap<String, BTreeMap<NaiveDate, String>>,
}

impl HolidayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object of the form `{ "SG": [{"date": "2025-01-01", "name": "..."}] }`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, HolidayError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(HolidayError::Io)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, HolidayError> {
        let parsed: HashMap<String, Vec<Holiday>> =
            serde_json::from_str(raw).map_err(|e| HolidayError::Parse(e.to_string()))?;
        let registry = Self::new();
        for (country, holidays) in parsed {
            registry.insert(&country, holidays)?;
        }
        Ok(registry)
    }

    /// Add or rename holidays. A date already present for the country takes
    /// the new name; within one batch the last row for a date wins. Returns
    /// how many distinct dates were written.
    pub fn insert(&self, country: &str, holidays: Vec<Holiday>) -> Result<usize, HolidayError> {
        let key = normalize_country(country)?;
        for h in &holidays {
            if h.name.len() > MAX_HOLIDAY_NAME_LEN {
                return Err(HolidayError::LimitExceeded("holiday name too long"));
            }
        }

        if holidays.is_empty() {
            return Ok(0);
        }

        let batch: BTreeMap<NaiveDate, String> =
            holidays.into_iter().map(|h| (h.date, h.name)).collect();
        let mut entry = self.countries.entry(key).or_default();
        let added = batch.keys().filter(|date| !entry.contains_key(date)).count();
        if entry.len() + added > MAX_HOLIDAYS_PER_COUNTRY {
            return Err(HolidayError::LimitExceeded("too many holidays for one country"));
        }
        let written = batch.len();
        entry.extend(batch);
        Ok(written)
    }

    /// Drop every holiday for a country. Returns how many were removed.
    pub fn remove_country(&self, country: &str) -> usize {
        let key = country.trim().to_uppercase();
        self.countries.remove(&key).map_or(0, |(_, days)| days.len())
    }

    pub fn remove_date(&self, country: &str, date: NaiveDate) -> bool {
        let key = country.trim().to_uppercase();
        let removed = self
            .countries
            .get_mut(&key)
            .is_some_and(|mut days| days.remove(&date).is_some());
        self.countries.remove_if(&key, |_, days| days.is_empty());
        removed
    }

    /// Every holiday stored for a country, sorted by date.
    pub fn country_holidays(&self, country: &str) -> Vec<Holiday> {
        let key = country.trim().to_uppercase();
        self.countries.get(&key).map_or_else(Vec::new, |days| {
            days.iter()
                .map(|(date, name)| Holiday {
                    date: *date,
                    name: name.clone(),
                })
                .collect()
        })
    }

    /// Known country codes, sorted.
    pub fn countries(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.countries.iter().map(|e| e.key().clone()).collect();
        codes.sort();
        codes
    }

    /// Total holidays across all countries.
    pub fn len(&self) -> usize {
        self.countries.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HolidaySource for HolidayRegistry {
    fn holidays(&self, country: &str, year: i32) -> Vec<Holiday> {
        let key = country.trim().to_uppercase();
        let Some(days) = self.countries.get(&key) else {
            return Vec::new();
        };
        let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Vec::new();
        };
        days.range(first..=last)
            .map(|(date, name)| Holiday {
                date: *date,
                name: name.clone(),
            })
            .collect()
    }
}

fn normalize_country(country: &str) -> Result<String, HolidayError> {
    let code = country.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(HolidayError::InvalidCountry(country.to_string()));
    }
    if code.len() > MAX_COUNTRY_CODE_LEN {
        return Err(HolidayError::LimitExceeded("country code too long"));
    }
    Ok(code.to_uppercase())
}

#[derive(Debug)]
pub enum HolidayError {
    Io(std::io::Error),
    Parse(String),
    InvalidCountry(String),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for HolidayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HolidayError::Io(e) => write!(f, "holiday file: {e}"),
            HolidayError::Parse(s) => write!(f, "holiday file parse error: {s}"),
            HolidayError::InvalidCountry(c) => write!(f, "invalid country code: {c:?}"),
            HolidayError::LimitExceeded(what) => write!(f, "limit exceeded: {what}"),
        }
    }
}

impl std::error::Error for HolidayError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn h(date: NaiveDate, name: &str) -> Holiday {
        Holiday { date, name: name.into() }
    }

    #[test]
    fn country_codes_are_case_insensitive() {
        let reg = HolidayRegistry::new();
        reg.insert("sg", vec![h(d(2025, 1, 1), "New Year's Day")]).unwrap();
        assert_eq!(reg.countries(), vec!["SG".to_string()]);
        assert_eq!(reg.holidays("Sg", 2025).len(), 1);
    }

    #[test]
    fn unknown_country_is_empty() {
        let reg = HolidayRegistry::new();
        assert!(reg.holidays("XX", 2025).is_empty());
        assert!(reg.holidays_between("XX", d(2025, 1, 1), d(2025, 12, 31)).is_empty());
    }

    #[test]
    fn year_lookup_is_sorted_and_scoped() {
        let reg = HolidayRegistry::new();
        reg.insert(
            "US",
            vec![
                h(d(2025, 12, 25), "Christmas Day"),
                h(d(2025, 1, 1), "New Year's Day"),
                h(d(2026, 1, 1), "New Year's Day"),
            ],
        )
        .unwrap();
        let dates: Vec<_> = reg.holidays("US", 2025).into_iter().map(|x| x.date).collect();
        assert_eq!(dates, vec![d(2025, 1, 1), d(2025, 12, 25)]);
        assert_eq!(reg.country_holidays("us").len(), 3);
        assert!(reg.country_holidays("FR").is_empty());
    }

    #[test]
    fn range_spans_years() {
        let reg = HolidayRegistry::new();
        reg.insert(
            "GB",
            vec![
                h(d(2025, 5, 5), "Early May"),
                h(d(2025, 12, 25), "Christmas Day"),
                h(d(2026, 1, 1), "New Year's Day"),
                h(d(2026, 4, 3), "Good Friday"),
            ],
        )
        .unwrap();
        let got: Vec<_> = reg
            .holidays_between("gb", d(2025, 12, 1), d(2026, 3, 31))
            .into_iter()
            .map(|x| x.date)
            .collect();
        assert_eq!(got, vec![d(2025, 12, 25), d(2026, 1, 1)]);
        assert!(reg.holidays_between("GB", d(2026, 3, 1), d(2025, 3, 1)).is_empty());
    }

    #[test]
    fn reinsert_renames_without_duplicating() {
        let reg = HolidayRegistry::new();
        reg.insert("SG", vec![h(d(2025, 1, 1), "NY")]).unwrap();
        reg.insert("SG", vec![h(d(2025, 1, 1), "New Year's Day")]).unwrap();
        let got = reg.holidays("SG", 2025);
        assert_eq!(got, vec![h(d(2025, 1, 1), "New Year's Day")]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_dates_in_one_batch_count_once() {
        let reg = HolidayRegistry::new();
        let written = reg
            .insert("SG", vec![h(d(2025, 1, 1), "a"), h(d(2025, 1, 1), "b")])
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(reg.holidays("SG", 2025), vec![h(d(2025, 1, 1), "b")]);
    }

    #[test]
    fn per_country_limit_ignores_batch_duplicates() {
        let reg = HolidayRegistry::new();
        let first = d(2025, 1, 1);
        let mut batch: Vec<Holiday> = (0..MAX_HOLIDAYS_PER_COUNTRY as u64 - 1)
            .map(|i| h(first + chrono::Days::new(i), "x"))
            .collect();
        reg.insert("SG", batch.clone()).unwrap();

        // One new date, sent twice, still fits.
        let last = first + chrono::Days::new(MAX_HOLIDAYS_PER_COUNTRY as u64 - 1);
        batch = vec![h(last, "y"), h(last, "z")];
        assert_eq!(reg.insert("SG", batch).unwrap(), 1);
        assert_eq!(reg.len(), MAX_HOLIDAYS_PER_COUNTRY);
    }

    #[test]
    fn removal() {
        let reg = HolidayRegistry::new();
        reg.insert("SG", vec![h(d(2025, 1, 1), "a"), h(d(2025, 8, 9), "b")]).unwrap();
        reg.insert("MY", vec![h(d(2025, 8, 31), "c")]).unwrap();

        assert!(reg.remove_date("sg", d(2025, 1, 1)));
        assert!(!reg.remove_date("sg", d(2025, 1, 1)));
        assert_eq!(reg.len(), 2);

        assert!(reg.remove_date("MY", d(2025, 8, 31)));
        assert_eq!(reg.countries(), vec!["SG".to_string()]);

        assert_eq!(reg.remove_country("SG"), 1);
        assert_eq!(reg.remove_country("SG"), 0);
        assert!(reg.is_empty());
    }

    #[test]
    fn bad_country_codes_rejected() {
        let reg = HolidayRegistry::new();
        assert!(matches!(
            reg.insert("", vec![]),
            Err(HolidayError::InvalidCountry(_))
        ));
        assert!(matches!(
            reg.insert("S G", vec![]),
            Err(HolidayError::InvalidCountry(_))
        ));
        assert!(matches!(
            reg.insert("ABCDEFGHIJ", vec![]),
            Err(HolidayError::LimitExceeded(_))
        ));
    }

    #[test]
    fn long_names_rejected() {
        let reg = HolidayRegistry::new();
        let name = "x".repeat(MAX_HOLIDAY_NAME_LEN + 1);
        assert!(matches!(
            reg.insert("SG", vec![h(d(2025, 1, 1), &name)]),
            Err(HolidayError::LimitExceeded(_))
        ));
    }

    #[test]
    fn parse_json_table() {
        let raw = r#"{
            "SG": [
                {"date": "2025-01-01", "name": "New Year's Day"},
                {"date": "2025-08-09", "name": "National Day"}
            ],
            "my": [{"date": "2025-08-31", "name": "Merdeka Day"}]
        }"#;
        let reg = HolidayRegistry::from_json(raw).unwrap();
        assert_eq!(reg.countries(), vec!["MY".to_string(), "SG".to_string()]);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            HolidayRegistry::from_json(r#"{"SG": [{"date": "2025-13-01", "name": "x"}]}"#),
            Err(HolidayError::Parse(_))
        ));
        assert!(matches!(HolidayRegistry::from_json("[]"), Err(HolidayError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("leaveopt_test_holidays");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("load_from_file.json");
        std::fs::write(&path, r#"{"SG": [{"date": "2025-01-01", "name": "New Year's Day"}]}"#).unwrap();
        let reg = HolidayRegistry::load_json(&path).unwrap();
        assert_eq!(reg.holidays("SG", 2025).len(), 1);

        let missing = dir.join("does_not_exist.json");
        assert!(matches!(HolidayRegistry::load_json(missing), Err(HolidayError::Io(_))));
    }
}
