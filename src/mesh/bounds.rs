use glam::Vec3;
use serde::{
  Deserialize, Serialize
};

/// Axis-aligned bounding box of a mesh, stored as center and half size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HalaBounds {
  pub center: [f32; 3],
  pub extents: [f32; 3],
}

/// Implementation of HalaBounds.
impl HalaBounds {

  /// Create a new HalaBounds instance.
  /// param center: The center of the AABB.
  /// param extents: The extents of the AABB.
  /// return: The new HalaBounds instance.
  pub fn new(center: [f32; 3], extents: [f32; 3]) -> Self {
    Self { center, extents }
  }

  /// Build the smallest AABB holding every point. No points gives an empty box at the origin.
  /// param points: The points to enclose.
  /// return: The AABB.
  pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
    let mut points = points.into_iter();
    let Some(first) = points.next() else {
      return Self::default();
    };
    let (min, max) = points.fold((first, first), |(min, max), point| (min.min(point), max.max(point)));
    Self::from_min_max(min, max)
  }

  pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
    let extents = (max - min) * 0.5;
    Self {
      center: (min + extents).to_array(),
      extents: extents.to_array(),
    }
  }

  pub fn get_min(&self) -> Vec3 {
    Vec3::from(self.center) - Vec3::from(self.extents)
  }

  pub fn get_max(&self) -> Vec3 {
    Vec3::from(self.center) + Vec3::from(self.extents)
  }

  pub fn get_size(&self) -> Vec3 {
    Vec3::from(self.extents) * 2.0
  }

  /// Grows the AABB to include the given point.
  /// param point: The point to include.
  pub fn encapsulate_point(&mut self, point: Vec3) {
    *self = Self::from_min_max(self.get_min().min(point), self.get_max().max(point));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bounds_of_points() {
    let bounds = HalaBounds::from_points([Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 5.0, -2.0)]);
    assert_eq!(bounds.get_min(), Vec3::new(1.0, 0.0, -2.0));
    assert_eq!(bounds.get_max(), Vec3::new(1.0, 5.0, 0.0));
    assert_eq!(bounds.get_size(), Vec3::new(0.0, 5.0, 2.0));
  }

  #[test]
  fn no_points_is_empty() {
    assert_eq!(HalaBounds::from_points(std::iter::empty()), HalaBounds::default());
  }

  #[test]
  fn encapsulate_grows() {
    let mut bounds = HalaBounds::new([0.0; 3], [1.0; 3]);
    bounds.encapsulate_point(Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(bounds.get_max(), Vec3::new(3.0, 1.0, 1.0));
    assert_eq!(bounds.get_min(), Vec3::splat(-1.0));
  }
}
