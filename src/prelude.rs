pub use crate::error::{
  HalaMeshCopyError,
  HalaMeshCopyErrorKind,
};
pub use crate::options::HalaCopyOptions;
pub use crate::mesh::{
  HalaVertexAttribute,
  HalaVertexAttributeFormat,
  HalaVertexAttributeDescriptor,
  HalaVertexLayout,
  HalaIndexFormat,
  HalaTopology,
  HalaSubMesh,
  HalaBounds,
  HalaGeometryView,
  HalaWritableGeometry,
  HalaMesh,
};
pub use crate::buffer::{
  HalaBufferView,
  HalaBufferViewMut,
};
pub use crate::store::{
  HalaGeometryStore,
  HalaMemoryGeometryStore,
};
pub use crate::copier::{
  HalaMeshCopier,
  HalaReplicationRequest,
};
