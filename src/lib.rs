pub mod prelude;
pub mod error;
pub mod options;
pub mod mesh;
pub mod buffer;
pub mod parallel;
pub mod kernels;
pub mod store;
pub mod copier;
