//! Drawing surface setup and PNG encoding

use crate::error::{DetectorError, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::ops::Range;
use tracing::debug;

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
/// Reference-row marker colour; nothing else is drawn in it.
pub const MARKER_RED: RGBColor = RGBColor(220, 20, 20);

pub const FONT: &str = "sans-serif";

pub(crate) type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
pub(crate) type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Encoded PNG chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    bytes: Vec<u8>,
    labelled: bool,
}

impl ChartImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Whether the title, axis labels and legend were drawn.
    pub fn is_labelled(&self) -> bool {
        self.labelled
    }

    /// Standard base64 of the PNG bytes, for JSON transport.
    pub fn to_base64(&self) -> String {
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.bytes)
    }
}

/// Axis range covering every finite value, padded by 5% on both sides.
/// Degenerate and empty inputs still produce a usable range.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return 0.0..1.0;
    }
    let pad = if (max - min).abs() < f64::EPSILON {
        (min.abs() * 0.05).max(0.5)
    } else {
        (max - min) * 0.05
    };
    (min - pad)..(max + pad)
}

/// Render a `width` x `height` chart to PNG.
///
/// `draw` receives a white drawing area and whether text may be drawn. When
/// no usable font is found the chart is drawn again without any text.
pub fn render_png<F>(width: u32, height: u32, draw: F) -> Result<ChartImage>
where
    F: Fn(&Area<'_>, bool) -> DrawResult,
{
    let (pixels, labelled) = match draw_pixels(width, height, &draw, true) {
        Ok(pixels) => (pixels, true),
        Err(e) => {
            debug!(error = %e, "Chart text unavailable, drawing without labels");
            let pixels = draw_pixels(width, height, &draw, false)
                .map_err(|e| DetectorError::PredictionFailure(format!("chart rendering: {}", e)))?;
            (pixels, false)
        }
    };

    let img = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        DetectorError::PredictionFailure("chart buffer does not match its dimensions".to_string())
    })?;
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(ChartImage { bytes, labelled })
}

fn draw_pixels<F>(
    width: u32,
    height: u32,
    draw: &F,
    with_text: bool,
) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>>
where
    F: Fn(&Area<'_>, bool) -> DrawResult,
{
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root, with_text)?;
        root.present()?;
    }
    Ok(pixels)
}
