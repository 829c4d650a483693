pub mod simulation;
pub mod configuration;
pub mod io;
pub mod benchmark;
pub mod error;

pub use simulation::states::{NVec3, Snapshot, OwnedSnapshot, SnapshotWriter};
pub use simulation::geometry::{Shape, Cylinder, Geometry};
pub use simulation::profile::SpatialProfile;
pub use simulation::modulation::{TemporalModulation, LookupTable, BoundaryStrategy};
pub use simulation::schedule::{Schedule, Window};
pub use simulation::advector::Advector;
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, FlowConfig, GeometryConfig, ModulationConfig, ScheduleConfig};

pub use io::positions::{read_positions, write_positions, positions_file_name, time_from_file_name, DirectoryWriter};
pub use io::table::read_table;

pub use error::{ConfigError, StepError, FileError, TableOrder};

pub use benchmark::benchmark::bench_move_once;
