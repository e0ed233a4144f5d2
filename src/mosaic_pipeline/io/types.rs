//! Mosaic output settings

/// Effort spent by the deflate encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeflateLevel {
    Fast,
    #[default]
    Balanced,
    Best,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    None,
    Lzw,
    Deflate(DeflateLevel),
}

impl Default for TiffCompression {
    fn default() -> Self {
        TiffCompression::Deflate(DeflateLevel::default())
    }
}

/// Differencing applied before compression. Mosaics are mostly flat black
/// outside the scanned area, which horizontal differencing shrinks well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predictor {
    None,
    #[default]
    Horizontal,
}

/// How the finished mosaic is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    pub compression: TiffCompression,
    pub predictor: Predictor,
    /// Rows per TIFF strip; `None` leaves the choice to the encoder.
    pub rows_per_strip: Option<u32>,
    /// Value of the `Software` tag.
    pub software: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::default(),
            predictor: Predictor::default(),
            rows_per_strip: None,
            software: concat!("micromosaic ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl WriterConfig {
    pub fn builder() -> WriterConfigBuilder {
        WriterConfigBuilder(WriterConfig::default())
    }
}

pub struct WriterConfigBuilder(WriterConfig);

impl WriterConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.0.compression = compression;
        self
    }

    pub fn predictor(mut self, predictor: Predictor) -> Self {
        self.0.predictor = predictor;
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.0.rows_per_strip = Some(rows);
        self
    }

    pub fn software(mut self, software: impl Into<String>) -> Self {
        self.0.software = software.into();
        self
    }

    pub fn build(self) -> WriterConfig {
        self.0
    }
}
