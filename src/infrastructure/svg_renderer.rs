// SVG chart renderer backed by plotters
use crate::application::chart_renderer::ChartRenderer;
use crate::application::error::WidgetError;
use crate::domain::chart::{
    ChartModel, Mark, Tick, XAxisStyle, AXIS_FONT_SIZE, LINE_WIDTH, ROTATED_TICK_ANGLE,
    ROTATED_TICK_DX_EM, ROTATED_TICK_DY_EM, SERIES_COLOR, TICK_LABEL_PADDING, TICK_SIZE,
    TITLE_FONT_SIZE,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

type DrawResult<T> = Result<T, DrawingAreaErrorKind<std::io::Error>>;

const SERIES: RGBColor = RGBColor(SERIES_COLOR.0, SERIES_COLOR.1, SERIES_COLOR.2);

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgChartRenderer;

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, model: &ChartModel) -> Result<String, WidgetError> {
        let mut svg = String::new();
        let overlay = {
            let root = SVGBackend::with_string(&mut svg, model.layout.canvas_size()).into_drawing_area();
            let overlay = draw_chart(&root, model).map_err(|e| WidgetError::Render(e.to_string()))?;
            root.present()
                .map_err(|e| WidgetError::Render(e.to_string()))?;
            overlay
        };

        // plotters only rotates text by quarter turns, so angled labels are appended as raw SVG.
        if !overlay.is_empty() {
            let close = svg
                .rfind("</svg>")
                .ok_or_else(|| WidgetError::Render("svg document is not closed".to_string()))?;
            svg.insert_str(close, &overlay);
        }
        Ok(svg)
    }
}

/// Draws the chart and returns the SVG elements plotters cannot express.
fn draw_chart(root: &DrawingArea<SVGBackend<'_>, Shift>, model: &ChartModel) -> DrawResult<String> {
    root.fill(&WHITE)?;

    let layout = model.layout;
    let (x0, x1) = widen(model.x_scale().domain);
    let (y0, y1) = widen(model.y_scale().domain);

    let mut chart = ChartBuilder::on(root)
        .margin_top(layout.margin.top as i32)
        .margin_right(layout.margin.right as i32)
        .x_label_area_size(layout.margin.bottom as i32)
        .y_label_area_size(layout.margin.left as i32)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    // x ticks come from the model; plotters only draws the axis line.
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(BLACK)
        .x_labels(0)
        .y_labels(10)
        .label_style(("sans-serif", AXIS_FONT_SIZE).into_font().color(&BLACK))
        .y_desc(model.y_label.as_str())
        .draw()?;

    // Marks carry plot-local pixel coordinates.
    let plot = chart.plotting_area().strip_coord_spec();
    for mark in &model.marks {
        match mark {
            Mark::Line { points } => {
                let path: Vec<(i32, i32)> = points.iter().map(|&(x, y)| (px(x), px(y))).collect();
                plot.draw(&PathElement::new(
                    path,
                    SERIES.stroke_width(LINE_WIDTH.round() as u32),
                ))?;
            }
            Mark::Bar { x, y, width, height } => {
                plot.draw(&Rectangle::new(
                    [(px(*x), px(*y)), (px(x + width), px(y + height))],
                    SERIES.filled(),
                ))?;
            }
        }
    }

    let overlay = draw_x_ticks(root, model)?;

    let title_at = (
        (layout.margin.left + layout.width / 2) as i32,
        (layout.margin.top / 2) as i32,
    );
    root.draw(&Text::new(
        model.title.clone(),
        title_at,
        ("sans-serif", TITLE_FONT_SIZE)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    Ok(overlay)
}

fn draw_x_ticks(root: &DrawingArea<SVGBackend<'_>, Shift>, model: &ChartModel) -> DrawResult<String> {
    let layout = model.layout;
    let axis_y = (layout.margin.top + layout.height) as i32;
    let mut overlay = String::new();

    for Tick { x, label } in &model.x_ticks {
        let tick_x = layout.margin.left as i32 + px(*x);
        root.draw(&PathElement::new(
            vec![(tick_x, axis_y), (tick_x, axis_y + TICK_SIZE as i32)],
            BLACK,
        ))?;

        let label_y = axis_y + TICK_LABEL_PADDING as i32;
        match model.x_axis {
            XAxisStyle::Plain => {
                root.draw(&Text::new(
                    label.clone(),
                    (tick_x, label_y),
                    ("sans-serif", AXIS_FONT_SIZE)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Top)),
                ))?;
            }
            XAxisStyle::Rotated => overlay.push_str(&rotated_label(tick_x, axis_y, label)),
        }
    }
    Ok(overlay)
}

/// An end-anchored label turned about its tick, offset like the plain labels below the axis.
fn rotated_label(tick_x: i32, axis_y: i32, label: &str) -> String {
    format!(
        r##"<text x="0" y="{pad}" dx="{dx}em" dy="{dy}em" text-anchor="end" transform="translate({tick_x},{axis_y}) rotate({angle})" font-family="sans-serif" font-size="{size}" fill="#000000">{label}</text>"##,
        pad = TICK_LABEL_PADDING,
        dx = ROTATED_TICK_DX_EM,
        dy = ROTATED_TICK_DY_EM,
        angle = ROTATED_TICK_ANGLE,
        size = AXIS_FONT_SIZE,
        label = escape_xml(label),
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// plotters needs a non-empty range; a zero-width domain keeps its start at the origin.
fn widen((start, end): (f64, f64)) -> (f64, f64) {
    if end > start { (start, end) } else { (start, start + 1.0) }
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartRequest;
    use crate::domain::date_range::DateRange;
    use crate::domain::meter::{MeterDescriptor, MeterType};
    use crate::domain::sample::{Sample, SAMPLE_DATE_FORMAT};
    use chrono::{NaiveDate, NaiveDateTime};

    fn model(meter_type: MeterType, samples: &[Sample]) -> ChartModel {
        model_between(meter_type, "2024-01-02", samples)
    }

    fn model_between(meter_type: MeterType, to: &str, samples: &[Sample]) -> ChartModel {
        let day = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let request = ChartRequest {
            meter: MeterDescriptor::new("cpu_util", "r1", "%", meter_type),
            resource: "r1".to_string(),
            range: DateRange::new(day("2024-01-01"), day(to)),
        };
        ChartModel::build(&request, samples)
    }

    fn samples() -> Vec<Sample> {
        ["2024-01-01T00:00:00", "2024-01-01T12:00:00", "2024-01-02T00:00:00"]
            .iter()
            .zip([1.0, 2.0, 3.0])
            .map(|(d, v)| Sample::new(NaiveDateTime::parse_from_str(d, SAMPLE_DATE_FORMAT).unwrap(), v))
            .collect()
    }

    #[test]
    fn test_render_bars() {
        let svg = SvgChartRenderer.render(&model(MeterType::Gauge, &samples())).unwrap();
        let empty = SvgChartRenderer.render(&model(MeterType::Gauge, &[])).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("cpu_util for resource r1 (From 2024-01-01 to 2024-01-02)"));
        assert!(svg.contains("Value (%)"));
        assert_eq!(svg.matches("<rect").count(), empty.matches("<rect").count() + 3);
    }

    #[test]
    fn test_render_line() {
        let svg = SvgChartRenderer.render(&model(MeterType::Cumulative, &samples())).unwrap();
        let empty = SvgChartRenderer.render(&model(MeterType::Cumulative, &[])).unwrap();

        assert!(svg.matches("<polyline").count() > empty.matches("<polyline").count());
        assert_eq!(svg.matches("<rect").count(), empty.matches("<rect").count());
    }

    #[test]
    fn test_render_empty_chart_still_has_axes() {
        let svg = SvgChartRenderer.render(&model(MeterType::Gauge, &[])).unwrap();
        assert!(svg.contains("Value (%)"));
        assert!(svg.contains("<line") || svg.contains("<polyline"));
    }

    #[test]
    fn test_week_axis_labels_fall_on_days() {
        let svg = SvgChartRenderer
            .render(&model_between(MeterType::Cumulative, "2024-01-08", &[]))
            .unwrap();
        for label in ["2024", "Tue 02", "Sat 06", "Jan 07", "Mon 08"] {
            assert!(svg.contains(&format!(">\n{label}\n</text>")), "missing {label}");
        }
        assert!(!svg.contains(":40"));
        assert!(!svg.contains("rotate(-65)"));
    }

    #[test]
    fn test_gauge_axis_labels_are_rotated() {
        let svg = SvgChartRenderer
            .render(&model_between(MeterType::Gauge, "2024-01-08", &[]))
            .unwrap();
        assert_eq!(svg.matches("rotate(-65)").count(), 8);
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(r#"dx="-0.8em" dy="0.15em""#));
        assert!(svg.contains(">01-01 00:00:00</text>"));
        assert!(svg.contains(">01-08 00:00:00</text>"));
        assert!(!svg.contains("09:06:40"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_rotated_label_is_escaped() {
        let text = rotated_label(200, 400, "a<b&c");
        assert!(text.contains("translate(200,400) rotate(-65)"));
        assert!(text.contains(">a&lt;b&amp;c</text>"));
    }

    #[test]
    fn test_widen() {
        assert_eq!(widen((1.0, 3.0)), (1.0, 3.0));
        assert_eq!(widen((2.0, 2.0)), (2.0, 3.0));
    }
}
