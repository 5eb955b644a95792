//! On-disk section type tags.

/// Spatial node with transform and parent.
pub const OBJECT3D: u32 = 0x0FFC_D100;
/// Renderable object: render atoms, bounds, and links to geometry.
pub const MODEL: u32 = 0x6221_2D88;
/// Vertex channels.
pub const GEOMETRY: u32 = 0x7AB0_72D3;
/// Triangle index buffer.
pub const TOPOLOGY: u32 = 0x4C50_7A13;
/// Pairs a geometry with a topology.
pub const PASSTHROUGH_GP: u32 = 0xE3A3_B1CA;
/// Wraps a topology for index-buffer binding.
pub const TOPOLOGY_IP: u32 = 0x03B6_34BD;
/// Ordered list of material ids.
pub const MATERIAL_GROUP: u32 = 0x2927_6B1D;
/// Material definition.
pub const MATERIAL: u32 = 0x3C54_609C;
/// Exporter provenance record.
pub const AUTHOR: u32 = 0x7623_C465;
/// Skinning bone set.
pub const SKIN_BONES: u32 = 0x65CC_1825;
/// Light set.
pub const LIGHT_SET: u32 = 0x3355_2583;
