/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (release dates, "today" of a scheduler run).
pub type Date = chrono::NaiveDate;
