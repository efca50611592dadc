//! Hard caps on request size. The DP table grows with
//! `horizon × budget`, so both are bounded here.

/// Longest date range a single request may cover (two years, leap-safe).
pub const MAX_HORIZON_DAYS: i64 = 731;

/// Max dates accepted in any one of the holiday / blocked / pre-booked sets.
pub const MAX_DATES_PER_SET: usize = 4096;

/// Max length of a country code in the holiday registry.
pub const MAX_COUNTRY_CODE_LEN: usize = 8;

/// Max length of a holiday display name.
pub const MAX_HOLIDAY_NAME_LEN: usize = 256;

/// Max holidays stored for one country.
pub const MAX_HOLIDAYS_PER_COUNTRY: usize = 10_000;

/// Earliest and latest calendar years accepted for named timeframes.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2200;
