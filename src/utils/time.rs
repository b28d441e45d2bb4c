use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn one_day() -> chrono::Duration {
    chrono::Duration::hours(24)
}
