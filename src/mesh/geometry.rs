use crate::buffer::{
  HalaBufferView,
  HalaBufferViewMut,
};
use crate::error::HalaMeshCopyError;
use super::{
  HalaBounds,
  HalaIndexFormat,
  HalaSubMesh,
  HalaVertexLayout,
};

/// A read-only view of the geometry of a mesh.
#[derive(Debug, Clone)]
pub struct HalaGeometryView<'a> {
  pub name: &'a str,
  pub layout: &'a HalaVertexLayout,
  pub vertex_count: usize,
  pub vertex_streams: Vec<&'a [u8]>,
  pub index_format: HalaIndexFormat,
  pub index_data: &'a [u8],
  pub sub_meshes: &'a [HalaSubMesh],
  pub bounds: HalaBounds,
}

impl<'a> HalaGeometryView<'a> {
  pub fn index_count(&self) -> usize {
    self.index_data.len() / self.index_format.size()
  }

  /// Get a stream of the vertex buffer, sized by the stream stride.
  /// param stream: The stream index.
  /// return: The stream view.
  pub fn vertex_stream(&self, stream: u8) -> Result<HalaBufferView<'a>, HalaMeshCopyError> {
    let data = self.vertex_streams.get(stream as usize).copied()
      .ok_or(HalaMeshCopyError::out_of_bounds(&format!(
        "The mesh \"{}\" has no vertex stream {}.", self.name, stream)))?;
    let stride = self.layout.stream_stride(stream);
    if stride == 0 {
      return Ok(HalaBufferView::bytes(data));
    }
    HalaBufferView::new(data, stride)
  }

  pub fn index_buffer(&self) -> HalaBufferView<'a> {
    HalaBufferView::bytes(self.index_data)
  }
}

/// Pre-sized, writable mesh geometry. Handing it to a store consumes it.
#[derive(Debug, Clone)]
pub struct HalaWritableGeometry {
  pub name: String,
  pub layout: HalaVertexLayout,
  pub vertex_count: usize,
  pub vertex_streams: Vec<Vec<u8>>,
  pub index_format: HalaIndexFormat,
  pub index_count: usize,
  pub index_data: Vec<u8>,
  pub sub_meshes: Vec<HalaSubMesh>,
  pub bounds: Option<HalaBounds>,
}

/// The implementation of the writable geometry.
impl HalaWritableGeometry {
  /// Allocate zeroed vertex streams and index buffer.
  /// param vertex_count: The number of vertices.
  /// param layout: The vertex layout, one buffer is made per stream.
  /// param index_count: The number of indices.
  /// param index_format: The index format.
  /// return: The writable geometry.
  pub fn new(
    vertex_count: usize,
    layout: &HalaVertexLayout,
    index_count: usize,
    index_format: HalaIndexFormat,
  ) -> Result<Self, HalaMeshCopyError> {
    let vertex_streams = (0..layout.stream_count())
      .map(|stream| {
        let stride = layout.stream_stride(stream as u8);
        vertex_count.checked_mul(stride)
          .map(|size| vec![0u8; size])
          .ok_or_else(|| HalaMeshCopyError::capacity(&format!(
            "Can not allocate {} vertices of {} bytes in stream {}.", vertex_count, stride, stream)))
      })
      .collect::<Result<Vec<_>, _>>()?;
    let index_size = index_count.checked_mul(index_format.size())
      .ok_or_else(|| HalaMeshCopyError::capacity(&format!("Can not allocate {} indices.", index_count)))?;

    log::trace!("Allocated {} vertices in {} streams and {} {:?} indices.",
      vertex_count, vertex_streams.len(), index_count, index_format);
    Ok(Self {
      name: String::new(),
      layout: layout.clone(),
      vertex_count,
      vertex_streams,
      index_format,
      index_count,
      index_data: vec![0u8; index_size],
      sub_meshes: Vec::new(),
      bounds: None,
    })
  }

  /// Get a writable stream of the vertex buffer, sized by the stream stride.
  /// param stream: The stream index.
  /// return: The stream view.
  pub fn vertex_stream_mut(&mut self, stream: u8) -> Result<HalaBufferViewMut<'_>, HalaMeshCopyError> {
    let stride = self.layout.stream_stride(stream);
    let data = self.vertex_streams.get_mut(stream as usize)
      .ok_or(HalaMeshCopyError::out_of_bounds(&format!("The geometry has no vertex stream {}.", stream)))?;
    if stride == 0 {
      return Ok(HalaBufferViewMut::bytes(data));
    }
    HalaBufferViewMut::new(data, stride)
  }

  pub fn index_buffer_mut(&mut self) -> Result<HalaBufferViewMut<'_>, HalaMeshCopyError> {
    HalaBufferViewMut::new(&mut self.index_data, self.index_format.size())
  }

  /// Check sub-mesh ranges and buffer sizes before the geometry is committed.
  pub fn validate(&self) -> Result<(), HalaMeshCopyError> {
    for (stream, data) in self.vertex_streams.iter().enumerate() {
      let expected = self.vertex_count * self.layout.stream_stride(stream as u8);
      if data.len() != expected {
        return Err(HalaMeshCopyError::out_of_bounds(&format!(
          "The vertex stream {} holds {} bytes, expected {}.", stream, data.len(), expected)));
      }
    }
    if self.index_data.len() != self.index_count * self.index_format.size() {
      return Err(HalaMeshCopyError::out_of_bounds(&format!(
        "The index buffer holds {} bytes, expected {}.",
        self.index_data.len(), self.index_count * self.index_format.size())));
    }
    for sub_mesh in self.sub_meshes.iter() {
      sub_mesh.validate(self.index_count)?;
    }
    Ok(())
  }
}
