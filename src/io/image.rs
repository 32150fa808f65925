//! Grayscale PNG loading and export around normalized intensity buffers

use image::{GrayImage, ImageBuffer, Luma};
use ndarray::Array2;
use std::path::Path;

use crate::io::error::{InpaintError, Result};
use crate::spatial::padding::{denormalize_samples, mask_from_samples, normalize_samples};

fn load_luma8(path: &Path) -> Result<Array2<u8>> {
    let img = image::open(path).map_err(|e| InpaintError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let gray: GrayImage = img.to_luma8();
    let (width, height) = gray.dimensions();

    Ok(Array2::from_shape_fn(
        (height as usize, width as usize),
        |(r, c)| {
            gray.get_pixel_checked(c as u32, r as u32)
                .map_or(0, |pixel| pixel.0[0])
        },
    ))
}

/// Load an image as grayscale intensities in `[0, 1]`
///
/// Color images are converted to luma first.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let samples = load_luma8(path.as_ref())?;
    Ok(normalize_samples(&samples))
}

/// Load a mask image: any non-zero luma marks a pixel to synthesize
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_mask<P: AsRef<Path>>(path: P) -> Result<Array2<bool>> {
    let samples = load_luma8(path.as_ref())?;
    Ok(mask_from_samples(&samples))
}

/// Export `[0, 1]` intensities as an 8-bit grayscale PNG
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grayscale<P: AsRef<Path>>(image: &Array2<f64>, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    let samples: Array2<u8> = denormalize_samples(image);
    let (rows, cols) = samples.dim();

    let img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_fn(cols as u32, rows as u32, |x, y| {
            Luma([samples.get([y as usize, x as usize]).copied().unwrap_or(0)])
        });

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| InpaintError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| InpaintError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
