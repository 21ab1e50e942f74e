//! Distribution of the first feature

use crate::data::{FeatureNames, ReferenceRow};
use crate::error::Result;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use polars::prelude::DataFrame;

use super::canvas::{padded_range, render_png, ChartImage, FONT, MARKER_RED, SKY_BLUE};
use super::column_values;

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 400;
pub const BINS: usize = 30;

/// Equal-width bin counts over `[min, max]` of the finite values; the maximum
/// falls into the last bin. Returns the range alongside the counts.
pub fn bin_counts(values: &[f64], bins: usize) -> Option<(f64, f64, Vec<usize>)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if finite.is_empty() || bins == 0 {
        return None;
    }

    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some((lo, hi, counts))
}

/// 30-bin histogram of the first feature with a dashed marker at the reference value.
pub fn render(table: &DataFrame, features: &FeatureNames, reference: &ReferenceRow) -> Result<ChartImage> {
    let values: Vec<f64> = column_values(table, features.first())?
        .into_iter()
        .flatten()
        .collect();
    let marker = reference.feature_values[0];

    let bins = bin_counts(&values, BINS);
    let bars: Vec<[(f64, f64); 2]> = match &bins {
        Some((lo, hi, counts)) => {
            let width = (hi - lo) / counts.len() as f64;
            counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(i, &count)| [(lo + i as f64 * width, 0.0), (lo + (i + 1) as f64 * width, count as f64)])
                .collect()
        }
        None => Vec::new(),
    };

    let x_range = padded_range(
        bins.iter()
            .flat_map(|(lo, hi, _)| [*lo, *hi])
            .chain(marker),
    );
    let max_count = bars.iter().map(|bar| bar[1].1).fold(1.0, f64::max);
    let y_max = max_count * 1.05;

    render_png(WIDTH, HEIGHT, |root, with_text| {
        let mut builder = ChartBuilder::on(root);
        builder.margin(10).x_label_area_size(40).y_label_area_size(50);
        if with_text {
            builder.caption(format!("Distribución de {}", features.first()), (FONT, 20));
        }
        let mut chart = builder.build_cartesian_2d(x_range.clone(), 0f64..y_max)?;

        if with_text {
            chart
                .configure_mesh()
                .x_desc(features.first())
                .y_desc("Frecuencia")
                .draw()?;
        }

        chart.draw_series(bars.iter().map(|bar| Rectangle::new(*bar, SKY_BLUE.mix(0.7).filled())))?;
        chart.draw_series(bars.iter().map(|bar| Rectangle::new(*bar, BLACK.stroke_width(1))))?;

        if let Some(value) = marker {
            let line = chart.draw_series(std::iter::once(DashedPathElement::new(
                vec![(value, 0.0), (value, y_max)],
                8,
                5,
                MARKER_RED.stroke_width(2),
            )))?;
            if with_text {
                line.label("Planeta detectado")
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MARKER_RED.stroke_width(2)));
                chart
                    .configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()?;
            }
        }

        Ok(())
    })
}
