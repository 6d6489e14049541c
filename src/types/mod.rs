pub mod quality;
pub mod station_key;
pub mod table;
