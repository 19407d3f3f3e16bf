pub mod daily_records;
pub mod users;
