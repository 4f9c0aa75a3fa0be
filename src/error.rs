use thiserror::Error;

/// The category of a mesh copy failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalaMeshCopyErrorKind {
  /// The destination can not hold the requested data.
  Capacity,
  /// A read or write falls outside of a buffer or index range.
  OutOfBounds,
  /// The vertex layout breaks a precondition of the operation.
  InvalidLayout,
  /// A raw tag does not name a known attribute, format or topology.
  UnsupportedFormat,
  /// The options could not be read or parsed.
  Config,
}

/// The error type of the hala-mesh-copy crate.
#[derive(Error, Debug)]
pub struct HalaMeshCopyError {
  msg: String,
  kind: HalaMeshCopyErrorKind,
  #[source]
  source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// The implementation of the error type of the hala-mesh-copy crate.
impl HalaMeshCopyError {
  /// Create a new error.
  /// param kind: The kind of the error.
  /// param msg: The message of the error.
  /// param source: The source of the error.
  /// return: The error.
  pub fn new(kind: HalaMeshCopyErrorKind, msg: &str, source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self {
      msg: msg.to_string(),
      kind,
      source,
    }
  }

  /// Create a capacity error. Capacity violations are always logged as they happen.
  /// param msg: The message of the error.
  /// return: The error.
  pub fn capacity(msg: &str) -> Self {
    log::error!("{}", msg);
    Self::new(HalaMeshCopyErrorKind::Capacity, msg, None)
  }

  pub fn out_of_bounds(msg: &str) -> Self {
    Self::new(HalaMeshCopyErrorKind::OutOfBounds, msg, None)
  }

  pub fn invalid_layout(msg: &str) -> Self {
    Self::new(HalaMeshCopyErrorKind::InvalidLayout, msg, None)
  }

  pub fn unsupported_format(msg: &str) -> Self {
    Self::new(HalaMeshCopyErrorKind::UnsupportedFormat, msg, None)
  }

  pub fn message(&self) -> &str {
    &self.msg
  }

  pub fn kind(&self) -> HalaMeshCopyErrorKind {
    self.kind
  }
}

impl std::convert::From<std::io::Error> for HalaMeshCopyError {
  fn from(err: std::io::Error) -> Self {
    Self {
      msg: format!("I/O failure: {}", err),
      kind: HalaMeshCopyErrorKind::Config,
      source: Some(Box::new(err)),
    }
  }
}

impl std::convert::From<serde_json::Error> for HalaMeshCopyError {
  fn from(err: serde_json::Error) -> Self {
    Self {
      msg: format!("Parse options failed: {}", err),
      kind: HalaMeshCopyErrorKind::Config,
      source: Some(Box::new(err)),
    }
  }
}

/// The implementation Display trait for the error type of the hala-mesh-copy crate.
impl std::fmt::Display for HalaMeshCopyError {
  /// Format the error.
  /// param f: The formatter.
  /// return: The result.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.msg)
  }
}
