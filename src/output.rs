use std::{
    fs,
    path::{Path, PathBuf},
};

use image::ImageFormat;
use log::{info, warn};

use crate::{bench::TimingSeries, error::RenderError, pixel_buffer::PixelBuffer};

/// Destination for a finished benchmark.
pub trait OutputSink {
    fn persist(&mut self, image: &PixelBuffer, timings: &TimingSeries) -> Result<(), RenderError>;
}

/// Writes the image as PNG and the timings as a text table into `dir`.
///
/// Both files are first written next to their targets with a `.tmp`
/// suffix and only renamed into place once both writes succeeded. A failed
/// rename removes every file this call created.
pub struct FileSink {
    dir: PathBuf,
    image_file: String,
    timing_file: String,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError + '_ {
    move |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_leftovers(paths: &[&Path]) {
    for path in paths {
        if path.is_file() {
            if let Err(cleanup) = fs::remove_file(path) {
                warn!("Could not remove {}: {cleanup}", path.display());
            }
        }
    }
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, image_file: &str, timing_file: &str) -> FileSink {
        FileSink {
            dir: dir.into(),
            image_file: image_file.to_string(),
            timing_file: timing_file.to_string(),
        }
    }

    pub fn image_path(&self) -> PathBuf {
        self.dir.join(&self.image_file)
    }

    pub fn timing_path(&self) -> PathBuf {
        self.dir.join(&self.timing_file)
    }

    fn write_temporaries(
        &self,
        image: &PixelBuffer,
        timings: &TimingSeries,
        image_tmp: &Path,
        timing_tmp: &Path,
    ) -> Result<(), RenderError> {
        image
            .to_image()
            .save_with_format(image_tmp, ImageFormat::Png)
            .map_err(|source| RenderError::Image {
                path: image_tmp.to_path_buf(),
                source,
            })?;
        fs::write(timing_tmp, timings.to_table()).map_err(io_error(timing_tmp))?;
        Ok(())
    }
}

impl OutputSink for FileSink {
    fn persist(&mut self, image: &PixelBuffer, timings: &TimingSeries) -> Result<(), RenderError> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let image_path = self.image_path();
        let timing_path = self.timing_path();
        let image_tmp = tmp_path(&image_path);
        let timing_tmp = tmp_path(&timing_path);

        if let Err(err) = self.write_temporaries(image, timings, &image_tmp, &timing_tmp) {
            remove_leftovers(&[image_tmp.as_path(), timing_tmp.as_path()]);
            return Err(err);
        }

        // Timings go first: if the image rename then fails, the new table is
        // taken back out so the two files never disagree.
        if let Err(err) = fs::rename(&timing_tmp, &timing_path) {
            remove_leftovers(&[image_tmp.as_path(), timing_tmp.as_path()]);
            return Err(io_error(&timing_path)(err));
        }
        if let Err(err) = fs::rename(&image_tmp, &image_path) {
            remove_leftovers(&[image_tmp.as_path(), timing_path.as_path()]);
            return Err(io_error(&image_path)(err));
        }
        info!("Saved image to {}", image_path.display());
        info!("Saved timings to {}", timing_path.display());
        Ok(())
    }
}
