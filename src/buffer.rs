use rayon::prelude::*;

use crate::error::HalaMeshCopyError;

/// A read-only byte buffer split into elements of `stride` bytes.
#[derive(Debug, Clone, Copy)]
pub struct HalaBufferView<'a> {
  data: &'a [u8],
  stride: usize,
}

impl<'a> HalaBufferView<'a> {
  /// Create a view.
  /// param data: The bytes.
  /// param stride: The distance between two elements, must not be zero.
  /// return: The view.
  pub fn new(data: &'a [u8], stride: usize) -> Result<Self, HalaMeshCopyError> {
    if stride == 0 {
      return Err(HalaMeshCopyError::invalid_layout("A buffer view needs a stride of at least one byte."));
    }
    Ok(Self { data, stride })
  }

  /// View raw bytes one by one.
  pub fn bytes(data: &'a [u8]) -> Self {
    Self { data, stride: 1 }
  }

  pub fn data(&self) -> &'a [u8] {
    self.data
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn stride(&self) -> usize {
    self.stride
  }

  /// Drop the first `offset` bytes, keeping the stride.
  /// param offset: The byte offset of the new start.
  /// return: The view.
  pub fn offset(&self, offset: usize) -> Result<Self, HalaMeshCopyError> {
    let data = self.data.get(offset..)
      .ok_or(HalaMeshCopyError::out_of_bounds(&format!(
        "The offset {} is past the end of a {} byte buffer.", offset, self.data.len())))?;
    Ok(Self { data, stride: self.stride })
  }

  /// Get `size` bytes of the element at `index`.
  /// param index: The element index.
  /// param size: The number of bytes to read from the element start.
  /// return: The element bytes.
  pub fn element(&self, index: usize, size: usize) -> Result<&'a [u8], HalaMeshCopyError> {
    let start = index.checked_mul(self.stride);
    start.and_then(|start| Some(start..start.checked_add(size)?))
      .and_then(|range| self.data.get(range))
      .ok_or_else(|| HalaMeshCopyError::out_of_bounds(&format!(
        "The element {} ({} bytes, stride {}) is outside of a {} byte buffer.",
        index, size, self.stride, self.data.len())))
  }
}

/// A writable byte buffer split into elements of `stride` bytes.
#[derive(Debug)]
pub struct HalaBufferViewMut<'a> {
  data: &'a mut [u8],
  stride: usize,
}

impl<'a> HalaBufferViewMut<'a> {
  /// Create a view.
  /// param data: The bytes.
  /// param stride: The distance between two elements, must not be zero.
  /// return: The view.
  pub fn new(data: &'a mut [u8], stride: usize) -> Result<Self, HalaMeshCopyError> {
    if stride == 0 {
      return Err(HalaMeshCopyError::invalid_layout("A buffer view needs a stride of at least one byte."));
    }
    Ok(Self { data, stride })
  }

  pub fn bytes(data: &'a mut [u8]) -> Self {
    Self { data, stride: 1 }
  }

  pub fn data(&self) -> &[u8] {
    &*self.data
  }

  pub fn data_mut(&mut self) -> &mut [u8] {
    &mut *self.data
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn stride(&self) -> usize {
    self.stride
  }

  /// Get the number of whole elements, failing when the length is not a multiple of the stride.
  pub fn element_count(&self) -> Result<usize, HalaMeshCopyError> {
    if self.data.len() % self.stride != 0 {
      return Err(HalaMeshCopyError::out_of_bounds(&format!(
        "A {} byte buffer does not hold a whole number of {} byte elements.", self.data.len(), self.stride)));
    }
    Ok(self.data.len() / self.stride)
  }
}

/// The byte length needed to address `count` elements of `element_size` bytes spaced by `stride`.
fn strided_extent(stride: usize, element_size: usize, count: usize) -> Option<usize> {
  if count == 0 {
    return Some(0);
  }
  (count - 1).checked_mul(stride)?.checked_add(element_size)
}

/// Copy the first `byte_length` bytes of `src` into `dst`.
/// param src: The source buffer.
/// param dst: The destination buffer.
/// param byte_length: The number of bytes to copy.
pub fn copy_full(src: &HalaBufferView, dst: &mut HalaBufferViewMut, byte_length: usize) -> Result<(), HalaMeshCopyError> {
  if src.len() < byte_length {
    return Err(HalaMeshCopyError::out_of_bounds(&format!(
      "Can not read {} bytes from a {} byte source buffer.", byte_length, src.len())));
  }
  if dst.len() < byte_length {
    return Err(HalaMeshCopyError::capacity(&format!(
      "Can not write {} bytes into a {} byte destination buffer.", byte_length, dst.len())));
  }
  dst.data[..byte_length].copy_from_slice(&src.data[..byte_length]);
  Ok(())
}

/// Copy `count` elements of `element_size` bytes, stepping by each view's own stride.
/// param src: The source view.
/// param dst: The destination view.
/// param element_size: The bytes copied per element.
/// param count: The number of elements.
pub fn copy_strided(src: &HalaBufferView, dst: &mut HalaBufferViewMut, element_size: usize, count: usize) -> Result<(), HalaMeshCopyError> {
  if element_size > src.stride.min(dst.stride) {
    return Err(HalaMeshCopyError::out_of_bounds(&format!(
      "The element size {} exceeds the source stride {} or the destination stride {}.",
      element_size, src.stride, dst.stride)));
  }
  let src_extent = strided_extent(src.stride, element_size, count);
  if src_extent.map_or(true, |extent| extent > src.len()) {
    return Err(HalaMeshCopyError::out_of_bounds(&format!(
      "Can not read {} elements of stride {} from a {} byte source buffer.", count, src.stride, src.len())));
  }
  let dst_extent = strided_extent(dst.stride, element_size, count);
  if dst_extent.map_or(true, |extent| extent > dst.len()) {
    return Err(HalaMeshCopyError::capacity(&format!(
      "Can not write {} elements of stride {} into a {} byte destination buffer.", count, dst.stride, dst.len())));
  }

  for index in 0..count {
    let src_start = index * src.stride;
    let dst_start = index * dst.stride;
    dst.data[dst_start..dst_start + element_size].copy_from_slice(&src.data[src_start..src_start + element_size]);
  }
  Ok(())
}

/// Write `copies` back to back duplicates of `src` at the start of `dst`, in parallel.
/// param src: The source buffer.
/// param dst: The destination buffer.
/// param copies: The number of duplicates.
/// param batch_size: The number of duplicates handled per job.
pub fn replicate(src: &HalaBufferView, dst: &mut HalaBufferViewMut, copies: usize, batch_size: usize) -> Result<(), HalaMeshCopyError> {
  let required = src.len().checked_mul(copies);
  if required.map_or(true, |required| required > dst.len()) {
    let fits = if src.is_empty() { usize::MAX } else { dst.len() / src.len() };
    return Err(HalaMeshCopyError::capacity(&format!(
      "The destination buffer can not fit more than {} copies of the source buffer, {} copies were requested.",
      fits, copies)));
  }
  if src.is_empty() || copies == 0 {
    return Ok(());
  }

  let source = src.data;
  dst.data[..source.len() * copies]
    .par_chunks_mut(source.len())
    .with_min_len(batch_size.max(1))
    .for_each(|copy| copy.copy_from_slice(source));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::HalaMeshCopyErrorKind;

  #[test]
  fn full_copy_checks_both_ends() {
    let src = [1u8, 2, 3, 4];
    let mut dst = [0u8; 4];
    copy_full(&HalaBufferView::bytes(&src), &mut HalaBufferViewMut::bytes(&mut dst), 4).unwrap();
    assert_eq!(dst, src);

    let mut short = [0u8; 3];
    let err = copy_full(&HalaBufferView::bytes(&src), &mut HalaBufferViewMut::bytes(&mut short), 4).unwrap_err();
    assert_eq!(err.kind(), HalaMeshCopyErrorKind::Capacity);
    assert_eq!(short, [0u8; 3]);
  }

  #[test]
  fn strided_copy_strips_leading_bytes() {
    // Two vertices of 3 position bytes followed by 2 attribute bytes.
    let src = [0u8, 0, 0, 10, 11, 0, 0, 0, 20, 21];
    let mut dst = [0u8; 4];
    let view = HalaBufferView::new(&src, 5).unwrap().offset(3).unwrap();
    copy_strided(&view, &mut HalaBufferViewMut::new(&mut dst, 2).unwrap(), 2, 2).unwrap();
    assert_eq!(dst, [10, 11, 20, 21]);
  }

  #[test]
  fn strided_copy_leaves_destination_gaps_untouched() {
    let src = [1u8, 2, 3, 4, 5, 6];
    let mut dst = [9u8; 11];
    copy_strided(
      &HalaBufferView::new(&src, 2).unwrap(),
      &mut HalaBufferViewMut::new(&mut dst, 4).unwrap(),
      2,
      3).unwrap();
    assert_eq!(dst, [1, 2, 9, 9, 3, 4, 9, 9, 5, 6, 9]);
  }

  #[test]
  fn strided_copy_rejects_oversized_elements() {
    let src = [0u8; 8];
    let mut dst = [0u8; 8];
    let err = copy_strided(
      &HalaBufferView::new(&src, 4).unwrap(),
      &mut HalaBufferViewMut::new(&mut dst, 2).unwrap(),
      3,
      2).unwrap_err();
    assert_eq!(err.kind(), HalaMeshCopyErrorKind::OutOfBounds);
  }

  #[test]
  fn strided_copy_rejects_short_source() {
    let src = [0u8; 7];
    let mut dst = [0u8; 8];
    assert!(copy_strided(
      &HalaBufferView::new(&src, 4).unwrap(),
      &mut HalaBufferViewMut::new(&mut dst, 4).unwrap(),
      4,
      2).is_err());
  }

  #[test]
  fn replicate_writes_copies() {
    let src = [1u8, 2, 3];
    let mut dst = [0u8; 10];
    replicate(&HalaBufferView::bytes(&src), &mut HalaBufferViewMut::bytes(&mut dst), 3, 1).unwrap();
    assert_eq!(dst, [1, 2, 3, 1, 2, 3, 1, 2, 3, 0]);
  }

  #[test]
  fn replicate_fails_before_writing_past_capacity() {
    let src = [7u8; 4];
    let mut dst = [0u8; 11];
    let err = replicate(&HalaBufferView::bytes(&src), &mut HalaBufferViewMut::bytes(&mut dst), 3, 64).unwrap_err();
    assert_eq!(err.kind(), HalaMeshCopyErrorKind::Capacity);
    assert!(err.message().contains("more than 2 copies"));
    assert_eq!(dst, [0u8; 11]);
  }

  #[test]
  fn views_reject_zero_stride() {
    assert!(HalaBufferView::new(&[0u8; 4], 0).is_err());
    assert!(HalaBufferView::bytes(&[0u8; 4]).offset(5).is_err());
    assert!(HalaBufferView::new(&[0u8; 8], 4).unwrap().element(1, 5).is_err());
  }
}
