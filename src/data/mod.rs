pub mod openweather;
pub mod repository;
