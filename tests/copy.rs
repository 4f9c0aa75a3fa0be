mod common;

use glam::{
  Mat4,
  Vec3,
};

use hala_mesh_copy::prelude::*;
use common::*;

fn assert_same_geometry(copy: &HalaMesh, source: &HalaMesh) {
  assert_eq!(copy.name, source.name);
  assert_eq!(copy.layout, source.layout);
  assert_eq!(copy.vertex_count, source.vertex_count);
  assert_eq!(copy.vertex_streams, source.vertex_streams);
  assert_eq!(copy.index_format, source.index_format);
  assert_eq!(copy.index_data, source.index_data);
  assert_eq!(copy.sub_meshes, source.sub_meshes);
  assert_eq!(copy.bounds, source.bounds);
}

#[test_log::test]
fn copy_round_trips_for_every_sub_mesh_count_and_index_format() -> anyhow::Result<()> {
  let copier = HalaMeshCopier::new(HalaMemoryGeometryStore);
  let sub_mesh_sets = [
    vec![],
    vec![HalaSubMesh::new(0, 6, HalaTopology::Triangles)],
    vec![HalaSubMesh::new(0, 3, HalaTopology::Triangles), HalaSubMesh::new(3, 3, HalaTopology::Triangles)],
  ];
  for format in [HalaIndexFormat::UInt16, HalaIndexFormat::UInt32] {
    for sub_meshes in sub_mesh_sets.iter() {
      let source = quad(format, sub_meshes.clone());
      let mut target = HalaMesh::default();
      copier.copy_to(Some(&source), &mut target)?;
      assert_same_geometry(&target, &source);
    }
  }
  Ok(())
}

#[test_log::test]
fn copy_replaces_previous_content() -> anyhow::Result<()> {
  let copier = HalaMeshCopier::new(HalaMemoryGeometryStore);
  let source = position_mesh("line", &[[0.0, 0.0, 0.0], [0.0, 0.0, 2.0]], HalaIndexFormat::UInt16, &[0, 1],
    vec![HalaSubMesh::new(0, 2, HalaTopology::Lines)]);
  let mut target = quad(HalaIndexFormat::UInt32, vec![HalaSubMesh::new(0, 6, HalaTopology::Triangles)]);
  copier.copy_to(Some(&source), &mut target)?;
  assert_same_geometry(&target, &source);
  assert_eq!(target.indices(), vec![0, 1]);
  Ok(())
}

#[test_log::test]
fn copy_of_absent_source_is_a_no_op() -> anyhow::Result<()> {
  let copier = HalaMeshCopier::new(HalaMemoryGeometryStore);
  let original = quad(HalaIndexFormat::UInt16, vec![HalaSubMesh::new(0, 6, HalaTopology::Triangles)]);
  let mut target = original.clone();
  copier.copy_to(None, &mut target)?;
  assert_eq!(target, original);
  Ok(())
}

#[test_log::test]
fn copy_keeps_every_stream_of_a_split_mesh() -> anyhow::Result<()> {
  let copier = HalaMeshCopier::new(HalaMemoryGeometryStore);
  let source = quad(HalaIndexFormat::UInt16, vec![HalaSubMesh::new(0, 6, HalaTopology::Triangles)]);
  let mut replicated = HalaMesh::default();
  copier.replicate(Some(&source), &[Mat4::IDENTITY, Mat4::from_translation(Vec3::X)], &mut replicated)?;
  assert_eq!(replicated.vertex_streams.len(), 2);

  let mut target = HalaMesh::default();
  copier.copy_to(Some(&replicated), &mut target)?;
  assert_same_geometry(&target, &replicated);
  Ok(())
}
