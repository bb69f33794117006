/// Topology domain layer: arena tree building and field resolution.
pub mod build;
pub mod errors;
pub mod resolve;

pub use build::{DeviceNode, Topology, build};
pub use errors::TopologyError;
pub use resolve::{NodeFields, ResolveOptions, resolve};
