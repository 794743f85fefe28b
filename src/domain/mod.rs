pub mod celestial;
pub mod color;
pub mod lighting;
pub mod sun_phase;
pub mod weather;
