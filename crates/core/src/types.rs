/// Every document id (courses, enrollments, identities) is a store-assigned UUID.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Course schedule dates carry no time component.
pub type CalendarDate = chrono::NaiveDate;
