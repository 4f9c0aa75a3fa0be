use glam::{
  Mat4,
  Vec3,
  Vec4Swizzles,
};

use crate::buffer::HalaBufferView;
use crate::error::HalaMeshCopyError;
use crate::mesh::HalaIndexFormat;
use crate::mesh::vertex::POSITION_SIZE;

/// Transform Np source positions by Nm matrices into Np x Nm positions.
/// Output slot `i` holds source position `i % Np` transformed by matrix `i / Np`.
pub struct HalaTransformVerticesKernel<'a> {
  input: HalaBufferView<'a>,
  vertex_count: usize,
  matrices: &'a [Mat4],
}

impl<'a> HalaTransformVerticesKernel<'a> {
  /// Create the kernel.
  /// param input: The source vertices; each element starts with a Float32 x3 position.
  /// param vertex_count: The number of source vertices.
  /// param matrices: The transforms, one per copy.
  /// return: The kernel.
  pub fn new(input: HalaBufferView<'a>, vertex_count: usize, matrices: &'a [Mat4]) -> Result<Self, HalaMeshCopyError> {
    if vertex_count > 0 {
      // The last position must be readable.
      input.element(vertex_count - 1, POSITION_SIZE)?;
    }
    Ok(Self {
      input,
      vertex_count,
      matrices,
    })
  }

  /// The number of output positions.
  pub fn output_count(&self) -> usize {
    self.vertex_count * self.matrices.len()
  }

  /// Write the position of output vertex `index` into a POSITION_SIZE byte slot.
  /// `index` must be below `output_count`, which is only driven through `parallel_for`.
  pub(crate) fn execute(&self, index: usize, slot: &mut [u8]) {
    let start = (index % self.vertex_count) * self.input.stride();
    let bytes = &self.input.data()[start..start + POSITION_SIZE];
    let position = Vec3::from_array(bytemuck::pod_read_unaligned::<[f32; 3]>(bytes));
    let matrix = self.matrices[index / self.vertex_count];
    let transformed = (matrix * position.extend(1.0)).xyz();
    slot.copy_from_slice(bytemuck::bytes_of(&transformed.to_array()));
  }
}

/// Replicate Ni source indices into Ni x N 32-bit indices, shifting copy `c` by `c * Nv`.
pub struct HalaOffsetIndicesKernel<'a> {
  input: HalaBufferView<'a>,
  index_format: HalaIndexFormat,
  index_count: usize,
  vertex_count: usize,
}

impl<'a> HalaOffsetIndicesKernel<'a> {
  /// Create the kernel.
  /// param input: The raw source indices.
  /// param index_format: The source index format.
  /// param vertex_count: The number of source vertices.
  /// return: The kernel.
  pub fn new(input: HalaBufferView<'a>, index_format: HalaIndexFormat, vertex_count: usize) -> Result<Self, HalaMeshCopyError> {
    let size = index_format.size();
    if input.len() % size != 0 {
      return Err(HalaMeshCopyError::out_of_bounds(&format!(
        "The index buffer holds {} bytes, not a whole number of {:?} indices.", input.len(), index_format)));
    }
    Ok(Self {
      input: HalaBufferView::new(input.data(), size)?,
      index_format,
      index_count: input.len() / size,
      vertex_count,
    })
  }

  /// The number of output indices for `copies` copies.
  pub fn output_count(&self, copies: usize) -> usize {
    self.index_count * copies
  }

  /// Write output index `index` as a native-endian u32 into a 4 byte slot.
  /// `index` must be below `output_count`, which is only driven through `parallel_for`.
  pub(crate) fn execute(&self, index: usize, slot: &mut [u8]) {
    let copy = index / self.index_count;
    let local = index % self.index_count;
    let size = self.index_format.size();
    let start = local * size;
    let value = self.index_format.read(&self.input.data()[start..start + size]);
    let offset = (copy * self.vertex_count) as u32;
    slot.copy_from_slice(&value.wrapping_add(offset).to_ne_bytes());
  }
}
