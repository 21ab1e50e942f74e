//! First feature against the second

use crate::data::{FeatureNames, ReferenceRow};
use crate::error::Result;
use plotters::prelude::*;
use polars::prelude::DataFrame;

use super::canvas::{padded_range, render_png, ChartImage, FONT, MARKER_RED};
use super::column_values;

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 600;

const POINT_RADIUS: i32 = 3;
const MARKER_RADIUS: i32 = 8;

/// Every row with both features as a translucent point, plus a ringed marker
/// at the reference row when both of its values are present.
pub fn render(table: &DataFrame, features: &FeatureNames, reference: &ReferenceRow) -> Result<ChartImage> {
    let xs = column_values(table, features.first())?;
    let ys = column_values(table, features.second())?;
    let points: Vec<(f64, f64)> = xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();

    let marker = match reference.feature_values {
        [Some(x), Some(y)] => Some((x, y)),
        _ => None,
    };

    let x_range = padded_range(points.iter().map(|p| p.0).chain(marker.map(|m| m.0)));
    let y_range = padded_range(points.iter().map(|p| p.1).chain(marker.map(|m| m.1)));

    render_png(WIDTH, HEIGHT, |root, with_text| {
        let mut builder = ChartBuilder::on(root);
        builder.margin(10).x_label_area_size(40).y_label_area_size(50);
        if with_text {
            builder.caption(format!("{} vs {}", features.second(), features.first()), (FONT, 20));
        }
        let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

        if with_text {
            chart
                .configure_mesh()
                .x_desc(features.first())
                .y_desc(features.second())
                .draw()?;
        }

        let cloud = chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, POINT_RADIUS, BLUE.mix(0.4).filled())),
        )?;
        if with_text {
            cloud
                .label("Exoplanetas")
                .legend(|(x, y)| Circle::new((x + 10, y), POINT_RADIUS, BLUE.mix(0.4).filled()));
        }

        if let Some(p) = marker {
            chart.draw_series(std::iter::once(Circle::new(p, MARKER_RADIUS + 2, BLACK.stroke_width(2))))?;
            let dot = chart.draw_series(std::iter::once(Circle::new(p, MARKER_RADIUS, MARKER_RED.filled())))?;
            if with_text {
                dot.label("Planeta detectado")
                    .legend(|(x, y)| Circle::new((x + 10, y), MARKER_RADIUS / 2, MARKER_RED.filled()));
            }
        }

        if with_text {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    })
}
