pub mod vertex;
pub mod index;
pub mod bounds;
pub mod geometry;
pub mod data;

pub use vertex::{
  HalaVertexAttribute,
  HalaVertexAttributeFormat,
  HalaVertexAttributeDescriptor,
  HalaVertexLayout,
};
pub use index::{
  HalaIndexFormat,
  HalaTopology,
  HalaSubMesh,
};
pub use bounds::HalaBounds;
pub use geometry::{
  HalaGeometryView,
  HalaWritableGeometry,
};
pub use data::HalaMesh;
