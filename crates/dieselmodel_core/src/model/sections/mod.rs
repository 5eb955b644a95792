//! Built-in section variants.

mod author;
mod geometry;
mod links;
mod material;
mod model;
mod object3d;
mod opaque;
mod topology;

pub use author::Author;
pub use geometry::{ChannelData, Geometry, GeometryChannel, kind as channel_kind, stride as channel_stride};
pub use links::{PassthroughGp, TopologyIp};
pub use material::{Material, MaterialGroup};
pub use model::{COMPACT_VERSION, CompactModel, DEFAULT_FULL_VERSION, FullModel, Model, ModelLayout, ModelProperties, RenderAtom};
pub use object3d::{Object3D, ObjectBase};
pub use opaque::Opaque;
pub use topology::{Topology, pack_indices};
