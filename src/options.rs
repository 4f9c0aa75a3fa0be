use std::path::Path;

use serde::{
  Deserialize, Serialize
};

use crate::error::HalaMeshCopyError;

/// The largest batch size a job is split by.
pub const MAX_BATCH_SIZE: usize = 1 << 20;

fn default_batch_size() -> usize {
  64
}

/// Scheduling options of the copy and replication jobs.
/// Batch sizes only control how work is split between workers, never the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalaCopyOptions {
  #[serde(default = "default_batch_size")]
  pub vertex_batch_size: usize,
  #[serde(default = "default_batch_size")]
  pub index_batch_size: usize,
  #[serde(default = "default_batch_size")]
  pub replicate_batch_size: usize,
}

impl Default for HalaCopyOptions {
  fn default() -> Self {
    HalaCopyOptions {
      vertex_batch_size: default_batch_size(),
      index_batch_size: default_batch_size(),
      replicate_batch_size: default_batch_size(),
    }
  }
}

/// The implementation of the copy options.
impl HalaCopyOptions {
  /// Parse the options from a JSON string. Missing fields take their defaults.
  /// param json: The JSON text.
  /// return: The options.
  pub fn from_json_str(json: &str) -> Result<Self, HalaMeshCopyError> {
    let options: HalaCopyOptions = serde_json::from_str(json)?;
    Ok(options.clamped())
  }

  /// Load the options from a JSON file.
  /// param path: The path to the JSON file.
  /// return: The options.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HalaMeshCopyError> {
    let path = path.as_ref();
    log::debug!("Loading copy options from \"{:?}\".", path);
    let json = std::fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// Bring every batch size into 1..=MAX_BATCH_SIZE.
  /// return: The clamped options.
  pub fn clamped(self) -> Self {
    Self {
      vertex_batch_size: self.vertex_batch_size.clamp(1, MAX_BATCH_SIZE),
      index_batch_size: self.index_batch_size.clamp(1, MAX_BATCH_SIZE),
      replicate_batch_size: self.replicate_batch_size.clamp(1, MAX_BATCH_SIZE),
    }
  }
}
