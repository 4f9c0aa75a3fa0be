use rayon::prelude::*;

use crate::buffer::HalaBufferViewMut;
use crate::error::HalaMeshCopyError;

/// Run `kernel(index, slot)` for every element of `output` on the rayon pool.
/// Each call owns the `stride` bytes of its own slot, so kernels never share writes.
/// Returns once every element has been written.
/// param output: The output view; its length must be a whole number of elements.
/// param batch_size: The number of elements handed to a worker at a time.
/// param kernel: The per element function.
pub fn parallel_for<F>(output: &mut HalaBufferViewMut, batch_size: usize, kernel: F) -> Result<(), HalaMeshCopyError>
where
  F: Fn(usize, &mut [u8]) + Sync + Send,
{
  let count = output.element_count()?;
  if count == 0 {
    return Ok(());
  }
  let stride = output.stride();
  let batch_size = batch_size.clamp(1, count);
  let chunk_length = stride.saturating_mul(batch_size).min(output.len()).max(stride);

  output.data_mut()
    .par_chunks_mut(chunk_length)
    .enumerate()
    .for_each(|(batch_index, batch)| {
      let base = batch_index * batch_size;
      for (offset, slot) in batch.chunks_mut(stride).enumerate() {
        kernel(base + offset, slot);
      }
    });
  Ok(())
}
