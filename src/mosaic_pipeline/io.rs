//! Frame input and mosaic output module
//!
//! Collaborators around the session: where frames come from and where the
//! finished mosaic goes.

mod source;
mod directory_source;
mod loader;
mod writer;
mod standard_tiff_writer;
pub mod types;

pub use source::{FrameSource, Frames};
pub use directory_source::DirectoryFrameSource;
pub use loader::{decode_image, load_image};
pub use writer::{save_mosaic, MosaicWriter};
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{DeflateLevel, Predictor, TiffCompression, WriterConfig, WriterConfigBuilder};
