// Renders what a live preview would show: the captured frame, newly bright pixels
// blended over it in the highlight colour, and a cross-hair on the centroid.

use crate::settings::RenderSettings;
use image::imageops;
use image::{ImageEncoder, Rgba, RgbaImage};
use spot_tracker::{AnalysisResult, Centroid};
use std::path::Path;

pub fn annotate(frame: &RgbaImage, result: &AnalysisResult, style: &RenderSettings) -> RgbaImage {
    let mut canvas = frame.clone();

    if let Some(overlay) = &result.overlay {
        let [red, green, blue] = style.highlight;
        let layer = overlay.to_rgba(Rgba([red, green, blue, style.highlight_opacity]));
        imageops::overlay(&mut canvas, &layer, 0, 0);
    }

    if let Some(centroid) = result.centroid {
        draw_cross(&mut canvas, centroid, style.marker_radius, opaque(style.marker));
    }

    canvas
}

fn opaque([red, green, blue]: [u8; 3]) -> Rgba<u8> {
    Rgba([red, green, blue, 255])
}

/// Clipped to the canvas; arms that would leave the image are cut short.
fn draw_cross(canvas: &mut RgbaImage, centre: Centroid, radius: u32, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let x_start = centre.x.saturating_sub(radius);
    let x_end = centre.x.saturating_add(radius).min(width.saturating_sub(1));
    let y_start = centre.y.saturating_sub(radius);
    let y_end = centre.y.saturating_add(radius).min(height.saturating_sub(1));

    if centre.y < height {
        for x in x_start..=x_end {
            canvas.put_pixel(x, centre.y, color);
        }
    }
    if centre.x < width {
        for y in y_start..=y_end {
            canvas.put_pixel(centre.x, y, color);
        }
    }
}

pub fn save_png(path: &Path, image: &RgbaImage) -> Result<(), image::error::ImageError> {
    let output = std::io::BufWriter::new(std::fs::File::create(path)?);
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(image.as_raw(), image.width(), image.height(), image::ExtendedColorType::Rgba8)?;

    Ok(())
}
