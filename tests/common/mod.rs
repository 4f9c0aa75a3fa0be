#![allow(dead_code)]

use hala_mesh_copy::prelude::*;

pub fn descriptor(attribute: HalaVertexAttribute, format: HalaVertexAttributeFormat, dimension: u8) -> HalaVertexAttributeDescriptor {
  HalaVertexAttributeDescriptor::new(attribute, format, dimension)
}

pub fn position_layout() -> HalaVertexLayout {
  HalaVertexLayout::new(vec![
    descriptor(HalaVertexAttribute::Position, HalaVertexAttributeFormat::Float32, 3),
  ]).unwrap()
}

pub fn position_color_layout() -> HalaVertexLayout {
  HalaVertexLayout::new(vec![
    descriptor(HalaVertexAttribute::Position, HalaVertexAttributeFormat::Float32, 3),
    descriptor(HalaVertexAttribute::Color, HalaVertexAttributeFormat::UNorm8, 4),
  ]).unwrap()
}

pub fn encode_indices(format: HalaIndexFormat, indices: &[u32]) -> Vec<u8> {
  match format {
    HalaIndexFormat::UInt16 => indices.iter().flat_map(|&index| (index as u16).to_ne_bytes()).collect(),
    HalaIndexFormat::UInt32 => indices.iter().flat_map(|&index| index.to_ne_bytes()).collect(),
  }
}

/// A position-only mesh.
pub fn position_mesh(
  name: &str,
  positions: &[[f32; 3]],
  format: HalaIndexFormat,
  indices: &[u32],
  sub_meshes: Vec<HalaSubMesh>,
) -> HalaMesh {
  let vertex_data = bytemuck::cast_slice(positions).to_vec();
  HalaMesh::new(name, position_layout(), vertex_data, format, encode_indices(format, indices), sub_meshes).unwrap()
}

/// A mesh whose vertices are a Float32 x3 position followed by a UNorm8 x4 color.
pub fn colored_mesh(
  name: &str,
  positions: &[[f32; 3]],
  colors: &[[u8; 4]],
  format: HalaIndexFormat,
  indices: &[u32],
  sub_meshes: Vec<HalaSubMesh>,
) -> HalaMesh {
  let mut vertex_data = Vec::new();
  for (position, color) in positions.iter().zip(colors.iter()) {
    vertex_data.extend_from_slice(bytemuck::bytes_of(position));
    vertex_data.extend_from_slice(color);
  }
  HalaMesh::new(name, position_color_layout(), vertex_data, format, encode_indices(format, indices), sub_meshes).unwrap()
}

/// Two triangles forming a quad in the XY plane.
pub fn quad(format: HalaIndexFormat, sub_meshes: Vec<HalaSubMesh>) -> HalaMesh {
  colored_mesh(
    "quad",
    &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [255, 255, 255, 128]],
    format,
    &[0, 1, 2, 0, 2, 3],
    sub_meshes,
  )
}
