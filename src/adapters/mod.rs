use crate::utils::error::{PricingError, Result};
use plotters::prelude::*;

/// One bar per category, rendered to an in-memory PNG. Stands in for the
/// pricing charts the reporter publishes next to the CSV/JSON output.
pub struct BarChartSpec<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub categories: &'a [String],
    pub values: &'a [f64],
    pub width: u32,
    pub height: u32,
}

fn chart_err<E: std::fmt::Display>(e: E) -> PricingError {
    PricingError::ChartError {
        message: e.to_string(),
    }
}

/// Y-axis range for a bar chart: always includes zero, pads the top (and the
/// bottom for negative data) so bars don't touch the frame.
pub fn value_range(values: &[f64]) -> (f64, f64) {
    let mut min = 0.0_f64;
    let mut max = 0.0_f64;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if max <= min {
        // All-zero (or empty) data still needs a drawable range
        return (min, min + 1.0);
    }
    let pad = 0.05 * (max - min);
    let lower = if min < 0.0 { min - pad } else { 0.0 };
    (lower, max + pad)
}

pub fn render_bar_chart(spec: &BarChartSpec) -> Result<Vec<u8>> {
    if spec.categories.is_empty() {
        return Err(PricingError::ChartError {
            message: "no categories to plot".to_string(),
        });
    }
    if spec.categories.len() != spec.values.len() {
        return Err(PricingError::ChartError {
            message: format!(
                "{} categories but {} values",
                spec.categories.len(),
                spec.values.len()
            ),
        });
    }

    let (y_min, y_max) = value_range(spec.values);
    let n = spec.categories.len() as i32;
    let mut buffer = vec![0u8; (spec.width * spec.height * 3) as usize];

    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title, ("sans-serif", 28))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d((0..n).into_segmented(), y_min..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(spec.x_label)
            .y_desc(spec.y_label)
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) if (0..n).contains(i) => {
                    spec.categories[*i as usize].clone()
                }
                _ => String::new(),
            })
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(spec.values.iter().enumerate().map(|(i, &v)| {
                let i = i as i32;
                Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
                    BLUE.mix(0.6).filled(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    let image = image::RgbImage::from_raw(spec.width, spec.height, buffer).ok_or_else(|| {
        PricingError::ChartError {
            message: "pixel buffer size mismatch".to_string(),
        }
    })?;
    let mut png = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(chart_err)?;
    Ok(png)
}
