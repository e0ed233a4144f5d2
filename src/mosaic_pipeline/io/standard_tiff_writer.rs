use std::io::{Cursor, Write};

use tiff::encoder::{colortype::RGB8, compression, Compression, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::Image;
use crate::mosaic_pipeline::io::types::{DeflateLevel, Predictor, TiffCompression, WriterConfig};
use crate::mosaic_pipeline::io::writer::MosaicWriter;

impl From<TiffCompression> for Compression {
    fn from(value: TiffCompression) -> Self {
        match value {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate(level) => Compression::Deflate(match level {
                DeflateLevel::Fast => compression::DeflateLevel::Fast,
                DeflateLevel::Balanced => compression::DeflateLevel::Balanced,
                DeflateLevel::Best => compression::DeflateLevel::Best,
            }),
        }
    }
}

impl From<Predictor> for tiff::tags::Predictor {
    fn from(value: Predictor) -> Self {
        match value {
            Predictor::None => tiff::tags::Predictor::None,
            Predictor::Horizontal => tiff::tags::Predictor::Horizontal,
        }
    }
}

fn encode_error(e: tiff::TiffError) -> MosaicError {
    MosaicError::EncodeError(e.to_string())
}

/// Single-page RGB8 TIFF, tagged with the producing software and the mosaic
/// size.
pub struct StandardTiffWriter;

impl MosaicWriter for StandardTiffWriter {
    fn write_mosaic(&self, image: &Image, output: &mut dyn Write, config: &WriterConfig) -> Result<()> {
        if image.is_empty() {
            return Err(MosaicError::InvalidDimensions(image.height(), image.width()));
        }
        if config.rows_per_strip == Some(0) {
            return Err(MosaicError::InvalidConfig("rows_per_strip must be positive".to_string()));
        }
        let (width, height) = image.as_rgb().dimensions();
        debug!(width, height, compression = ?config.compression, "Encoding mosaic");

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut buffer)
                .map_err(encode_error)?
                .with_compression(config.compression.into())
                .with_predictor(config.predictor.into());

            let mut page = encoder.new_image::<RGB8>(width, height).map_err(encode_error)?;
            page.encoder()
                .write_tag(Tag::Software, config.software.as_str())
                .map_err(encode_error)?;
            let description = format!("micromosaic {height}x{width}");
            page.encoder()
                .write_tag(Tag::ImageDescription, description.as_str())
                .map_err(encode_error)?;
            if let Some(rows) = config.rows_per_strip {
                page.rows_per_strip(rows).map_err(encode_error)?;
            }
            page.write_data(image.data()).map_err(encode_error)?;
        }

        let bytes = buffer.into_inner();
        output.write_all(&bytes)?;
        debug!(bytes = bytes.len(), "Mosaic encoded");
        Ok(())
    }
}
