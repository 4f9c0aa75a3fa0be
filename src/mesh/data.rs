use glam::Vec3;

use crate::error::HalaMeshCopyError;
use super::{
  HalaBounds,
  HalaGeometryView,
  HalaIndexFormat,
  HalaSubMesh,
  HalaVertexAttribute,
  HalaVertexAttributeFormat,
  HalaVertexLayout,
  HalaWritableGeometry,
};

/// A mesh held in memory: raw vertex streams, raw indices and sub-mesh ranges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HalaMesh {
  pub name: String,
  pub layout: HalaVertexLayout,
  pub vertex_count: usize,
  pub vertex_streams: Vec<Vec<u8>>,
  pub index_format: HalaIndexFormat,
  pub index_data: Vec<u8>,
  pub sub_meshes: Vec<HalaSubMesh>,
  pub bounds: HalaBounds,
}

/// The Drop implementation of the mesh.
impl Drop for HalaMesh {
  fn drop(&mut self) {
    log::trace!("A HalaMesh \"{}\" dropped.", self.name);
  }
}

/// The implementation of the mesh.
impl HalaMesh {
  /// Create a mesh from one interleaved vertex buffer.
  /// param name: The mesh name.
  /// param layout: The vertex layout, every attribute in stream 0.
  /// param vertex_data: The interleaved vertices.
  /// param index_format: The index format.
  /// param index_data: The raw indices.
  /// param sub_meshes: The sub-mesh ranges.
  /// return: The mesh.
  pub fn new(
    name: &str,
    layout: HalaVertexLayout,
    vertex_data: Vec<u8>,
    index_format: HalaIndexFormat,
    index_data: Vec<u8>,
    sub_meshes: Vec<HalaSubMesh>,
  ) -> Result<Self, HalaMeshCopyError> {
    if layout.stream_count() > 1 {
      return Err(HalaMeshCopyError::invalid_layout("An interleaved mesh must keep every attribute in stream 0."));
    }
    let stride = layout.stride();
    if stride == 0 || vertex_data.len() % stride != 0 {
      return Err(HalaMeshCopyError::out_of_bounds(&format!(
        "The mesh \"{}\" has {} vertex bytes, not a whole number of {} byte vertices.", name, vertex_data.len(), stride)));
    }
    if index_data.len() % index_format.size() != 0 {
      return Err(HalaMeshCopyError::out_of_bounds(&format!(
        "The mesh \"{}\" has {} index bytes, not a whole number of {:?} indices.", name, index_data.len(), index_format)));
    }
    let index_count = index_data.len() / index_format.size();
    for sub_mesh in sub_meshes.iter() {
      sub_mesh.validate(index_count)?;
    }

    let mut mesh = Self {
      name: name.to_string(),
      layout,
      vertex_count: vertex_data.len() / stride,
      vertex_streams: vec![vertex_data],
      index_format,
      index_data,
      sub_meshes,
      bounds: HalaBounds::default(),
    };
    mesh.bounds = HalaBounds::from_points(mesh.positions()?);
    log::debug!("A HalaMesh \"{}\" created with {} vertices and {} indices.", mesh.name, mesh.vertex_count, index_count);
    Ok(mesh)
  }

  /// Borrow the mesh as a read-only geometry view.
  pub fn view(&self) -> HalaGeometryView<'_> {
    HalaGeometryView {
      name: &self.name,
      layout: &self.layout,
      vertex_count: self.vertex_count,
      vertex_streams: self.vertex_streams.iter().map(|stream| stream.as_slice()).collect(),
      index_format: self.index_format,
      index_data: &self.index_data,
      sub_meshes: &self.sub_meshes,
      bounds: self.bounds,
    }
  }

  /// Replace the whole content of the mesh with committed geometry.
  /// The bounds are kept when the geometry carries none.
  /// param geometry: The geometry.
  pub fn apply(&mut self, geometry: HalaWritableGeometry) -> Result<(), HalaMeshCopyError> {
    geometry.validate()?;
    self.name = geometry.name;
    self.layout = geometry.layout;
    self.vertex_count = geometry.vertex_count;
    self.vertex_streams = geometry.vertex_streams;
    self.index_format = geometry.index_format;
    self.index_data = geometry.index_data;
    self.sub_meshes = geometry.sub_meshes;
    if let Some(bounds) = geometry.bounds {
      self.bounds = bounds;
    }
    Ok(())
  }

  pub fn index_count(&self) -> usize {
    self.index_data.len() / self.index_format.size()
  }

  /// Read every index, widened to 32 bits.
  pub fn indices(&self) -> Vec<u32> {
    let format = self.index_format;
    self.index_data.chunks_exact(format.size()).map(|bytes| format.read(bytes)).collect()
  }

  /// Read the Float32 position of every vertex from whichever stream holds it.
  /// return: The positions; empty when the layout has no position.
  pub fn positions(&self) -> Result<Vec<Vec3>, HalaMeshCopyError> {
    let Some((descriptor, offset)) = self.layout.find(HalaVertexAttribute::Position) else {
      return Ok(Vec::new());
    };
    if descriptor.format != HalaVertexAttributeFormat::Float32 || descriptor.dimension < 3 {
      return Err(HalaMeshCopyError::invalid_layout(&format!(
        "Can not read {:?} x{} positions of mesh \"{}\".", descriptor.format, descriptor.dimension, self.name)));
    }
    let view = self.view();
    let stream = view.vertex_stream(descriptor.stream)?.offset(offset)?;
    (0..self.vertex_count)
      .map(|index| {
        let bytes = stream.element(index, 12)?;
        Ok(Vec3::from_array(bytemuck::pod_read_unaligned::<[f32; 3]>(bytes)))
      })
      .collect()
  }
}
