pub mod positions;
pub mod table;
