pub mod paginator;
pub mod raster;
pub mod writer;
