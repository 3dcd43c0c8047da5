pub mod db_utils;
pub mod standard_time_cache;
pub mod time_format;
