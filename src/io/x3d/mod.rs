//! X3D XML output.
//!
//! Scenes are written as X3D 3.3 documents. Named nodes carry `DEF`, repeated
//! content is written as a `USE` reference, and routes follow the nodes.

mod writer;

pub use writer::{X3D_VERSION, write};
