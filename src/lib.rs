pub mod logger;
pub mod mosaic_pipeline;
