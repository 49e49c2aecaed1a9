/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Calendar dates on resource reports are plain dates, no time zone.
pub type Date = chrono::NaiveDate;
