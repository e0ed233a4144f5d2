use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::mosaic_pipeline::common::error::{MosaicError, Result};
use crate::mosaic_pipeline::frame::Image;
use crate::mosaic_pipeline::io::types::WriterConfig;
use crate::mosaic_pipeline::registration::Registrar;
use crate::mosaic_pipeline::session::MosaicSession;

pub trait MosaicWriter {
    fn write_mosaic(&self, image: &Image, output: &mut dyn Write, config: &WriterConfig) -> Result<()>;
}

/// Writes the session's cropped mosaic to `path`. Returns `false` without
/// creating a file when the session has no frames yet.
#[instrument(skip(session, writer, config, path), fields(path = %path.as_ref().display()))]
pub fn save_mosaic<R, W, P>(session: &MosaicSession<R>, writer: &W, config: &WriterConfig, path: P) -> Result<bool>
where
    R: Registrar,
    W: MosaicWriter + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let Some(mosaic) = session.mosaic() else {
        info!("Nothing to save, session is empty");
        return Ok(false);
    };

    let mut file = std::fs::File::create(path)
        .map_err(|e| MosaicError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
    writer.write_mosaic(&mosaic, &mut file, config)?;

    info!(height = mosaic.height(), width = mosaic.width(), "Saved mosaic");
    Ok(true)
}
