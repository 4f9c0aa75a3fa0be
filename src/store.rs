use crate::buffer::HalaBufferViewMut;
use crate::error::HalaMeshCopyError;
use crate::mesh::{
  HalaBounds,
  HalaGeometryView,
  HalaIndexFormat,
  HalaMesh,
  HalaVertexLayout,
  HalaWritableGeometry,
};
use crate::parallel;

/// The mesh container the copier reads from and writes to.
pub trait HalaGeometryStore {
  /// The mesh handle of the container.
  type Mesh;

  /// Borrow the geometry of a mesh for reading.
  /// param mesh: The mesh.
  /// return: The read-only view.
  fn acquire_read_only<'a>(&'a self, mesh: &'a Self::Mesh) -> Result<HalaGeometryView<'a>, HalaMeshCopyError>;

  /// Allocate writable geometry of the given size.
  /// param vertex_count: The number of vertices.
  /// param layout: The vertex layout.
  /// param index_count: The number of indices.
  /// param index_format: The index format.
  /// return: The writable geometry.
  fn allocate_writable(
    &self,
    vertex_count: usize,
    layout: &HalaVertexLayout,
    index_count: usize,
    index_format: HalaIndexFormat,
  ) -> Result<HalaWritableGeometry, HalaMeshCopyError>;

  /// Commit geometry to a mesh, replacing its previous content.
  /// param geometry: The finished geometry.
  /// param target: The mesh to write.
  fn finalize(&self, geometry: HalaWritableGeometry, target: &mut Self::Mesh) -> Result<(), HalaMeshCopyError>;

  /// Recompute the spatial bounds of a mesh.
  /// param target: The mesh.
  fn recalculate_bounds(&self, target: &mut Self::Mesh) -> Result<(), HalaMeshCopyError>;

  /// Run `kernel(index, slot)` over every element of `output`, returning when all are done.
  /// param output: The output view.
  /// param batch_size: The scheduling granularity.
  /// param kernel: The per element function.
  fn parallel_for<F>(&self, output: &mut HalaBufferViewMut, batch_size: usize, kernel: F) -> Result<(), HalaMeshCopyError>
  where
    F: Fn(usize, &mut [u8]) + Sync + Send,
  {
    parallel::parallel_for(output, batch_size, kernel)
  }
}

/// A geometry store over plain in-memory meshes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalaMemoryGeometryStore;

impl HalaGeometryStore for HalaMemoryGeometryStore {
  type Mesh = HalaMesh;

  fn acquire_read_only<'a>(&'a self, mesh: &'a HalaMesh) -> Result<HalaGeometryView<'a>, HalaMeshCopyError> {
    Ok(mesh.view())
  }

  fn allocate_writable(
    &self,
    vertex_count: usize,
    layout: &HalaVertexLayout,
    index_count: usize,
    index_format: HalaIndexFormat,
  ) -> Result<HalaWritableGeometry, HalaMeshCopyError> {
    HalaWritableGeometry::new(vertex_count, layout, index_count, index_format)
  }

  fn finalize(&self, geometry: HalaWritableGeometry, target: &mut HalaMesh) -> Result<(), HalaMeshCopyError> {
    target.apply(geometry)?;
    log::debug!("A HalaMesh \"{}\" finalized with {} vertices and {} indices.",
      target.name, target.vertex_count, target.index_count());
    Ok(())
  }

  fn recalculate_bounds(&self, target: &mut HalaMesh) -> Result<(), HalaMeshCopyError> {
    target.bounds = HalaBounds::from_points(target.positions()?);
    Ok(())
  }
}
