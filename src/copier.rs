use glam::Mat4;

use crate::buffer::{
  self,
  HalaBufferView,
  HalaBufferViewMut,
};
use crate::error::HalaMeshCopyError;
use crate::kernels::{
  HalaOffsetIndicesKernel,
  HalaTransformVerticesKernel,
};
use crate::mesh::{
  HalaGeometryView,
  HalaIndexFormat,
  HalaSubMesh,
  HalaWritableGeometry,
};
use crate::mesh::vertex::POSITION_SIZE;
use crate::options::HalaCopyOptions;
use crate::store::HalaGeometryStore;

/// The stream holding transformed positions in a replicated mesh.
pub const POSITION_STREAM: u8 = 0;
/// The stream holding every other attribute in a replicated mesh.
pub const ATTRIBUTE_STREAM: u8 = 1;

/// One source geometry and the transforms of its copies.
pub struct HalaReplicationRequest<'a> {
  pub source: HalaGeometryView<'a>,
  pub matrices: &'a [Mat4],
}

/// Copies and replicates mesh geometry through a geometry store.
pub struct HalaMeshCopier<S: HalaGeometryStore> {
  store: S,
  options: HalaCopyOptions,
}

/// The implementation of the mesh copier.
impl<S: HalaGeometryStore> HalaMeshCopier<S> {
  /// Create a copier with default options.
  /// param store: The geometry store.
  /// return: The copier.
  pub fn new(store: S) -> Self {
    Self::with_options(store, HalaCopyOptions::default())
  }

  /// Create a copier.
  /// param store: The geometry store.
  /// param options: The scheduling options.
  /// return: The copier.
  pub fn with_options(store: S, options: HalaCopyOptions) -> Self {
    Self {
      store,
      options: options.clamped(),
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn options(&self) -> &HalaCopyOptions {
    &self.options
  }

  /// Copy the geometry, name, bounds and sub-meshes of `source` into `target` verbatim.
  /// An absent source leaves the target untouched.
  /// param source: The source mesh.
  /// param target: The mesh to overwrite.
  pub fn copy_to(&self, source: Option<&S::Mesh>, target: &mut S::Mesh) -> Result<(), HalaMeshCopyError> {
    let Some(source) = source else {
      log::warn!("No source mesh to copy, the target is left unchanged.");
      return Ok(());
    };
    let view = self.store.acquire_read_only(source)?;
    let geometry = self.copy_geometry(&view)?;
    self.store.finalize(geometry, target)
  }

  /// Build an exact copy of a geometry.
  /// param view: The source geometry.
  /// return: The copied geometry.
  pub fn copy_geometry(&self, view: &HalaGeometryView) -> Result<HalaWritableGeometry, HalaMeshCopyError> {
    let index_count = view.index_count();
    log::debug!("Copying mesh \"{}\": {} vertices of {} bytes, {} {:?} indices, {} sub-meshes.",
      view.name, view.vertex_count, view.layout.stride(), index_count, view.index_format, view.sub_meshes.len());

    let mut geometry = self.store.allocate_writable(view.vertex_count, view.layout, index_count, view.index_format)?;
    for stream in 0..view.layout.stream_count() as u8 {
      let byte_length = view.vertex_count * view.layout.stream_stride(stream);
      buffer::copy_full(&view.vertex_stream(stream)?, &mut geometry.vertex_stream_mut(stream)?, byte_length)?;
    }
    let index_length = index_count * view.index_format.size();
    buffer::copy_full(&view.index_buffer(), &mut geometry.index_buffer_mut()?, index_length)?;

    geometry.sub_meshes = view.sub_meshes.to_vec();
    geometry.name = view.name.to_string();
    geometry.bounds = Some(view.bounds);
    Ok(geometry)
  }

  /// Write one transformed copy of `source` per matrix into `target`, as a single sub-mesh
  /// with 32-bit indices. An absent source leaves the target untouched.
  /// param source: The source mesh; one stream, starting with a Float32 x3 position.
  /// param matrices: The transform of each copy.
  /// param target: The mesh to overwrite.
  pub fn replicate(&self, source: Option<&S::Mesh>, matrices: &[Mat4], target: &mut S::Mesh) -> Result<(), HalaMeshCopyError> {
    let Some(source) = source else {
      log::warn!("No source mesh to replicate, the target is left unchanged.");
      return Ok(());
    };
    let request = HalaReplicationRequest {
      source: self.store.acquire_read_only(source)?,
      matrices,
    };
    let geometry = self.replicate_geometry(&request)?;
    self.store.finalize(geometry, target)?;
    self.store.recalculate_bounds(target)
  }

  /// Build the replicated geometry of a request.
  /// param request: The source geometry and matrices.
  /// return: The replicated geometry; stream 0 holds positions, stream 1 everything else.
  pub fn replicate_geometry(&self, request: &HalaReplicationRequest) -> Result<HalaWritableGeometry, HalaMeshCopyError> {
    let source = &request.source;
    let matrices = request.matrices;
    source.layout.validate_leading_position()?;

    let vertex_size = source.layout.stride();
    let vertex_count = source.vertex_count;
    let index_count = source.index_count();
    let copies = matrices.len();
    if copies == 0 {
      log::warn!("No matrices to replicate mesh \"{}\" with, the result is empty.", source.name);
    }

    let dest_vertex_count = vertex_count.checked_mul(copies)
      .filter(|&count| count as u64 <= u32::MAX as u64 + 1)
      .ok_or_else(|| HalaMeshCopyError::capacity(&format!(
        "{} copies of {} vertices can not be addressed by 32-bit indices.", copies, vertex_count)))?;
    let dest_index_count = index_count.checked_mul(copies)
      .ok_or_else(|| HalaMeshCopyError::capacity(&format!(
        "{} copies of {} indices overflow the index buffer size.", copies, index_count)))?;
    log::debug!("Replicating mesh \"{}\" {} times: {} vertices and {} indices.",
      source.name, copies, dest_vertex_count, dest_index_count);

    let dest_layout = source.layout.split(POSITION_STREAM, ATTRIBUTE_STREAM)?;
    let mut geometry = self.store.allocate_writable(dest_vertex_count, &dest_layout, dest_index_count, HalaIndexFormat::UInt32)?;
    let source_vertices = source.vertex_stream(0)?;

    // Attributes other than position are copied untouched, once per matrix.
    if !source.layout.is_position_only() && vertex_count > 0 {
      let attributes_size = vertex_size - POSITION_SIZE;
      let mut scratch = vec![0u8; vertex_count * attributes_size];
      log::trace!("Allocated {} scratch bytes for the attributes of mesh \"{}\".", scratch.len(), source.name);
      buffer::copy_strided(
        &source_vertices.offset(POSITION_SIZE)?,
        &mut HalaBufferViewMut::new(&mut scratch, attributes_size)?,
        attributes_size,
        vertex_count)?;
      buffer::replicate(
        &HalaBufferView::bytes(&scratch),
        &mut geometry.vertex_stream_mut(ATTRIBUTE_STREAM)?,
        copies,
        self.options.replicate_batch_size)?;
    }

    {
      let kernel = HalaTransformVerticesKernel::new(source_vertices, vertex_count, matrices)?;
      let mut positions = geometry.vertex_stream_mut(POSITION_STREAM)?;
      self.store.parallel_for(&mut positions, self.options.vertex_batch_size, |index, slot| kernel.execute(index, slot))?;
    }

    {
      let kernel = HalaOffsetIndicesKernel::new(source.index_buffer(), source.index_format, vertex_count)?;
      let mut indices = geometry.index_buffer_mut()?;
      self.store.parallel_for(&mut indices, self.options.index_batch_size, |index, slot| kernel.execute(index, slot))?;
    }

    let topology = source.sub_meshes.first().map(|sub_mesh| sub_mesh.topology).unwrap_or_default();
    geometry.sub_meshes = vec![HalaSubMesh::new(0, dest_index_count, topology)];
    geometry.name = source.name.to_string();
    Ok(geometry)
  }
}
