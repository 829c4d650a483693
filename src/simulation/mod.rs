pub mod states;
pub mod geometry;
pub mod profile;
pub mod modulation;
pub mod schedule;
pub mod advector;
pub mod scenario;
