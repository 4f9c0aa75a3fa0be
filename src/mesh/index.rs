use serde::{
  Deserialize, Serialize
};

use crate::error::HalaMeshCopyError;

/// The integer type of an index buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalaIndexFormat {
  #[default]
  UInt16,
  UInt32,
}

impl HalaIndexFormat {
  /// Get the byte size of one index.
  pub fn size(&self) -> usize {
    match self {
      HalaIndexFormat::UInt16 => 2,
      HalaIndexFormat::UInt32 => 4,
    }
  }

  /// Read one index from its raw bytes, zero extended.
  /// param bytes: Exactly `size()` bytes in native byte order.
  /// return: The index value.
  pub fn read(&self, bytes: &[u8]) -> u32 {
    match self {
      HalaIndexFormat::UInt16 => bytemuck::pod_read_unaligned::<u16>(bytes) as u32,
      HalaIndexFormat::UInt32 => bytemuck::pod_read_unaligned::<u32>(bytes),
    }
  }
}

/// The primitive type drawn by a sub-mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalaTopology {
  #[default]
  Triangles,
  Quads,
  Lines,
  LineStrip,
  Points,
}

impl TryFrom<u32> for HalaTopology {
  type Error = HalaMeshCopyError;

  fn try_from(value: u32) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(HalaTopology::Triangles),
      2 => Ok(HalaTopology::Quads),
      3 => Ok(HalaTopology::Lines),
      4 => Ok(HalaTopology::LineStrip),
      5 => Ok(HalaTopology::Points),
      _ => Err(HalaMeshCopyError::unsupported_format(&format!("Unknown topology tag {}.", value))),
    }
  }
}

/// A contiguous range of the index buffer drawn as one part of a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HalaSubMesh {
  pub index_start: usize,
  pub index_count: usize,
  #[serde(default)]
  pub topology: HalaTopology,
}

impl HalaSubMesh {
  pub fn new(index_start: usize, index_count: usize, topology: HalaTopology) -> Self {
    Self {
      index_start,
      index_count,
      topology,
    }
  }

  /// Check that the range lies inside an index buffer.
  /// param total_index_count: The number of indices in the buffer.
  pub fn validate(&self, total_index_count: usize) -> Result<(), HalaMeshCopyError> {
    let end = self.index_start.checked_add(self.index_count);
    match end {
      Some(end) if end <= total_index_count => Ok(()),
      _ => Err(HalaMeshCopyError::out_of_bounds(&format!(
        "The sub-mesh [{}, +{}) exceeds the index buffer of {} indices.",
        self.index_start, self.index_count, total_index_count))),
    }
  }
}
