use serde::{
  Deserialize, Serialize
};

use crate::error::HalaMeshCopyError;

/// The maximum number of vertex streams a layout may use.
pub const MAX_VERTEX_STREAMS: u8 = 4;

/// The byte size of a Float32 x3 position.
pub const POSITION_SIZE: usize = 12;

/// The semantic role of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalaVertexAttribute {
  Position,
  Normal,
  Tangent,
  Color,
  TexCoord0,
  TexCoord1,
  TexCoord2,
  TexCoord3,
  TexCoord4,
  TexCoord5,
  TexCoord6,
  TexCoord7,
  BlendWeight,
  BlendIndices,
}

impl TryFrom<u32> for HalaVertexAttribute {
  type Error = HalaMeshCopyError;

  fn try_from(value: u32) -> Result<Self, Self::Error> {
    use HalaVertexAttribute::*;
    let attribute = match value {
      0 => Position,
      1 => Normal,
      2 => Tangent,
      3 => Color,
      4 => TexCoord0,
      5 => TexCoord1,
      6 => TexCoord2,
      7 => TexCoord3,
      8 => TexCoord4,
      9 => TexCoord5,
      10 => TexCoord6,
      11 => TexCoord7,
      12 => BlendWeight,
      13 => BlendIndices,
      _ => return Err(HalaMeshCopyError::unsupported_format(&format!("Unknown vertex attribute tag {}.", value))),
    };
    Ok(attribute)
  }
}

/// The numeric format of one component of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalaVertexAttributeFormat {
  Float32,
  Float16,
  UNorm8,
  SNorm8,
  UNorm16,
  SNorm16,
  UInt8,
  SInt8,
  UInt16,
  SInt16,
  UInt32,
  SInt32,
}

impl HalaVertexAttributeFormat {
  /// Get the byte size of one component.
  /// return: The size in bytes.
  pub fn component_size(&self) -> usize {
    use HalaVertexAttributeFormat::*;
    match self {
      Float32 | UInt32 | SInt32 => 4,
      Float16 | UNorm16 | SNorm16 | UInt16 | SInt16 => 2,
      UNorm8 | SNorm8 | UInt8 | SInt8 => 1,
    }
  }
}

impl TryFrom<u32> for HalaVertexAttributeFormat {
  type Error = HalaMeshCopyError;

  fn try_from(value: u32) -> Result<Self, Self::Error> {
    use HalaVertexAttributeFormat::*;
    let format = match value {
      0 => Float32,
      1 => Float16,
      2 => UNorm8,
      3 => SNorm8,
      4 => UNorm16,
      5 => SNorm16,
      6 => UInt8,
      7 => SInt8,
      8 => UInt16,
      9 => SInt16,
      10 => UInt32,
      11 => SInt32,
      _ => return Err(HalaMeshCopyError::unsupported_format(&format!("Unknown vertex attribute format tag {}.", value))),
    };
    Ok(format)
  }
}

/// One attribute of a vertex: role, component format, component count and the stream holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HalaVertexAttributeDescriptor {
  pub attribute: HalaVertexAttribute,
  pub format: HalaVertexAttributeFormat,
  pub dimension: u8,
  #[serde(default)]
  pub stream: u8,
}

impl HalaVertexAttributeDescriptor {
  /// Create a descriptor in stream 0.
  /// param attribute: The semantic role.
  /// param format: The component format.
  /// param dimension: The component count, 1 to 4.
  /// return: The descriptor.
  pub fn new(attribute: HalaVertexAttribute, format: HalaVertexAttributeFormat, dimension: u8) -> Self {
    Self {
      attribute,
      format,
      dimension,
      stream: 0,
    }
  }

  pub fn with_stream(mut self, stream: u8) -> Self {
    self.stream = stream;
    self
  }

  /// Get the byte size of the attribute inside a vertex.
  /// return: The size in bytes.
  pub fn size(&self) -> usize {
    self.dimension as usize * self.format.component_size()
  }
}

/// An ordered list of vertex attributes.
/// Attributes of a stream are packed back to back in declaration order, without padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<HalaVertexAttributeDescriptor>", into = "Vec<HalaVertexAttributeDescriptor>")]
pub struct HalaVertexLayout {
  attributes: Vec<HalaVertexAttributeDescriptor>,
}

impl TryFrom<Vec<HalaVertexAttributeDescriptor>> for HalaVertexLayout {
  type Error = HalaMeshCopyError;

  fn try_from(attributes: Vec<HalaVertexAttributeDescriptor>) -> Result<Self, Self::Error> {
    Self::new(attributes)
  }
}

impl From<HalaVertexLayout> for Vec<HalaVertexAttributeDescriptor> {
  fn from(layout: HalaVertexLayout) -> Self {
    layout.attributes
  }
}

/// The implementation of the vertex layout.
impl HalaVertexLayout {
  /// Create a layout, checking every dimension and stream index.
  /// param attributes: The attribute descriptors in declaration order.
  /// return: The layout.
  pub fn new(attributes: Vec<HalaVertexAttributeDescriptor>) -> Result<Self, HalaMeshCopyError> {
    for descriptor in attributes.iter() {
      if descriptor.dimension == 0 || descriptor.dimension > 4 {
        return Err(HalaMeshCopyError::invalid_layout(&format!(
          "The attribute {:?} has dimension {}, expected 1 to 4.", descriptor.attribute, descriptor.dimension)));
      }
      if descriptor.stream >= MAX_VERTEX_STREAMS {
        return Err(HalaMeshCopyError::invalid_layout(&format!(
          "The attribute {:?} uses stream {}, only {} streams are available.",
          descriptor.attribute, descriptor.stream, MAX_VERTEX_STREAMS)));
      }
    }
    Ok(Self { attributes })
  }

  pub fn attributes(&self) -> &[HalaVertexAttributeDescriptor] {
    &self.attributes
  }

  pub fn is_empty(&self) -> bool {
    self.attributes.is_empty()
  }

  /// Get the byte size of a whole vertex over all streams.
  /// return: The vertex size in bytes.
  pub fn stride(&self) -> usize {
    self.attributes.iter().map(|descriptor| descriptor.size()).sum()
  }

  /// Get the byte size of the part of a vertex stored in one stream.
  /// param stream: The stream index.
  /// return: The stream stride in bytes.
  pub fn stream_stride(&self, stream: u8) -> usize {
    self.attributes.iter()
      .filter(|descriptor| descriptor.stream == stream)
      .map(|descriptor| descriptor.size())
      .sum()
  }

  /// Get the number of streams the layout spans, including empty streams below the highest used one.
  pub fn stream_count(&self) -> usize {
    self.attributes.iter().map(|descriptor| descriptor.stream as usize + 1).max().unwrap_or(0)
  }

  /// Find an attribute and its byte offset inside its stream.
  /// param attribute: The attribute role.
  /// return: The descriptor and its offset, or None.
  pub fn find(&self, attribute: HalaVertexAttribute) -> Option<(HalaVertexAttributeDescriptor, usize)> {
    let descriptor = self.attributes.iter().find(|descriptor| descriptor.attribute == attribute)?;
    let offset = self.attributes.iter()
      .take_while(|other| other.attribute != attribute)
      .filter(|other| other.stream == descriptor.stream)
      .map(|other| other.size())
      .sum();
    Some((*descriptor, offset))
  }

  /// Derive a layout keeping order, format and dimension but moving Position to
  /// `position_stream` and every other attribute to `other_stream`.
  /// param position_stream: The stream of the position attribute.
  /// param other_stream: The stream of all other attributes.
  /// return: The split layout.
  pub fn split(&self, position_stream: u8, other_stream: u8) -> Result<Self, HalaMeshCopyError> {
    let attributes = self.attributes.iter()
      .map(|descriptor| {
        let stream = if descriptor.attribute == HalaVertexAttribute::Position { position_stream } else { other_stream };
        descriptor.with_stream(stream)
      })
      .collect();
    Self::new(attributes)
  }

  /// Check whether every attribute is a position.
  pub fn is_position_only(&self) -> bool {
    self.attributes.iter().all(|descriptor| descriptor.attribute == HalaVertexAttribute::Position)
  }

  /// Check that the layout is one interleaved stream starting with a Float32 x3 position.
  /// Replication extracts the other attributes by skipping the first POSITION_SIZE bytes of each vertex.
  pub fn validate_leading_position(&self) -> Result<(), HalaMeshCopyError> {
    let first = self.attributes.first()
      .ok_or(HalaMeshCopyError::invalid_layout("The vertex layout is empty."))?;
    if first.attribute != HalaVertexAttribute::Position
      || first.format != HalaVertexAttributeFormat::Float32
      || first.dimension != 3 {
      return Err(HalaMeshCopyError::invalid_layout(&format!(
        "The first vertex attribute must be a Float32 x3 position, found {:?} {:?} x{}.",
        first.attribute, first.format, first.dimension)));
    }
    if self.attributes.iter().skip(1).any(|descriptor| descriptor.attribute == HalaVertexAttribute::Position) {
      return Err(HalaMeshCopyError::invalid_layout("The vertex layout declares more than one position."));
    }
    if self.attributes.iter().any(|descriptor| descriptor.stream != 0) {
      return Err(HalaMeshCopyError::invalid_layout("The vertex layout must be a single interleaved stream."));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use HalaVertexAttribute::*;
  use HalaVertexAttributeFormat::*;

  fn layout(attributes: &[(HalaVertexAttribute, HalaVertexAttributeFormat, u8)]) -> HalaVertexLayout {
    HalaVertexLayout::new(
      attributes.iter().map(|&(a, f, d)| HalaVertexAttributeDescriptor::new(a, f, d)).collect()
    ).unwrap()
  }

  #[test]
  fn stride_sums_every_format_and_dimension() {
    let formats = [
      (Float32, 4), (UInt32, 4), (SInt32, 4),
      (Float16, 2), (UNorm16, 2), (SNorm16, 2), (UInt16, 2), (SInt16, 2),
      (UNorm8, 1), (SNorm8, 1), (UInt8, 1), (SInt8, 1),
    ];
    for (format, size) in formats {
      for dimension in 1..=4u8 {
        let l = layout(&[(Position, Float32, 3), (TexCoord0, format, dimension)]);
        assert_eq!(l.stride(), 12 + size * dimension as usize, "{:?} x{}", format, dimension);
      }
    }
  }

  #[test]
  fn typical_layout_stride() {
    let l = layout(&[(Position, Float32, 3), (Normal, Float32, 3), (Color, UNorm8, 4), (TexCoord0, Float16, 2)]);
    assert_eq!(l.stride(), 12 + 12 + 4 + 4);
  }

  #[test]
  fn split_moves_position_to_its_own_stream() {
    let l = layout(&[(Position, Float32, 3), (Normal, Float32, 3), (Color, UNorm8, 4)]);
    let split = l.split(0, 1).unwrap();
    assert_eq!(split.stream_count(), 2);
    assert_eq!(split.stream_stride(0), 12);
    assert_eq!(split.stream_stride(1), 16);
    assert_eq!(split.stride(), l.stride());
    assert_eq!(split.find(Color), Some((HalaVertexAttributeDescriptor::new(Color, UNorm8, 4).with_stream(1), 12)));
    assert_ne!(split, l);
  }

  #[test]
  fn position_only_layouts() {
    assert!(layout(&[(Position, Float32, 3)]).is_position_only());
    assert!(!layout(&[(Position, Float32, 3), (Color, Float32, 4)]).is_position_only());
    assert_eq!(layout(&[(Position, Float32, 3)]).split(0, 1).unwrap().stream_count(), 1);
  }

  #[test]
  fn layouts_compare_structurally() {
    let a = layout(&[(Position, Float32, 3), (Normal, Float32, 3)]);
    let b = layout(&[(Position, Float32, 3), (Normal, Float32, 3)]);
    let c = layout(&[(Normal, Float32, 3), (Position, Float32, 3)]);
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn rejects_bad_dimensions_and_streams() {
    assert!(HalaVertexLayout::new(vec![HalaVertexAttributeDescriptor::new(Position, Float32, 0)]).is_err());
    assert!(HalaVertexLayout::new(vec![HalaVertexAttributeDescriptor::new(Position, Float32, 5)]).is_err());
    assert!(HalaVertexLayout::new(vec![HalaVertexAttributeDescriptor::new(Position, Float32, 3).with_stream(4)]).is_err());
  }

  #[test]
  fn deserialized_layouts_are_checked() {
    let l: HalaVertexLayout = serde_json::from_str(
      r#"[{ "attribute": "Position", "format": "Float32", "dimension": 3 }, { "attribute": "Color", "format": "UNorm8", "dimension": 4 }]"#
    ).unwrap();
    assert_eq!(l, layout(&[(Position, Float32, 3), (Color, UNorm8, 4)]));
    assert_eq!(serde_json::from_str::<HalaVertexLayout>(&serde_json::to_string(&l).unwrap()).unwrap(), l);

    assert!(serde_json::from_str::<HalaVertexLayout>(
      r#"[{ "attribute": "Position", "format": "Float32", "dimension": 5 }]"#).is_err());
    assert!(serde_json::from_str::<HalaVertexLayout>(
      r#"[{ "attribute": "Position", "format": "Float32", "dimension": 3, "stream": 4 }]"#).is_err());
  }

  #[test]
  fn leading_position_is_validated() {
    assert!(layout(&[(Position, Float32, 3), (Color, UNorm8, 4)]).validate_leading_position().is_ok());
    assert!(layout(&[(Color, UNorm8, 4), (Position, Float32, 3)]).validate_leading_position().is_err());
    assert!(layout(&[(Position, Float16, 4)]).validate_leading_position().is_err());
    assert!(HalaVertexLayout::default().validate_leading_position().is_err());
  }

  #[test]
  fn unknown_tags_are_rejected() {
    assert_eq!(HalaVertexAttributeFormat::try_from(10).unwrap(), UInt32);
    assert_eq!(HalaVertexAttribute::try_from(13).unwrap(), BlendIndices);
    let err = HalaVertexAttributeFormat::try_from(12).unwrap_err();
    assert_eq!(err.kind(), crate::error::HalaMeshCopyErrorKind::UnsupportedFormat);
    assert!(HalaVertexAttribute::try_from(14).is_err());
  }
}
