pub mod blob;
pub mod form;
pub mod palette;
pub mod poster;
pub mod raster;
pub mod svg;

pub use blob::{blob, BlobShape, BLOB_POINTS};
pub use palette::{palette, palette_index, Rgba};
pub use poster::{compose, generate, Poster, PosterParameters, PosterRng};
pub use raster::RasterOptions;
