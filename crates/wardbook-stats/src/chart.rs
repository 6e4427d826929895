//! Four-panel visit chart rendered to SVG.

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use wardbook_contracts::error::{WardError, WardResult};

use crate::aggregate::VisitStatistics;

pub const CHART_TITLE: &str = "Hospital Visit Statistics";

const CHART_SIZE: (u32, u32) = (1400, 1000);
const PIE_START_DEGREES: f64 = 140.0;

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Render visits by date, insurance share, gender and age bracket as a
/// 2x2 grid. Empty tallies render a "No data" panel.
pub fn render_chart(stats: &VisitStatistics, path: &Path) -> WardResult<()> {
    draw(stats, path).map_err(|e| WardError::ChartFailed { reason: e.to_string() })?;
    info!(path = %path.display(), visits = stats.total_visits(), "chart written");
    Ok(())
}

fn draw(stats: &VisitStatistics, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(CHART_TITLE, ("sans-serif", 32).into_font())?;
    let panels = body.split_evenly((2, 2));

    let by_date = owned(stats.by_date.iter().map(|(k, v)| (k.as_str(), *v)));
    let insurance = owned(stats.by_insurance.iter().map(|(k, v)| (k.as_str(), *v)));
    let gender = owned(stats.by_gender.iter().map(|(k, v)| (k.as_str(), *v)));
    let ages = if stats.by_age_bracket.values().all(|c| *c == 0) {
        Vec::new()
    } else {
        owned(stats.by_age_bracket.iter().map(|(k, v)| (k.label(), *v)))
    };

    bar_panel(&panels[0], "Visits by Date", &by_date, BLUE)?;
    pie_panel(&panels[1], "Insurance Breakdown", &insurance)?;
    bar_panel(&panels[2], "Gender Distribution", &gender, MAGENTA)?;
    bar_panel(&panels[3], "Age Group Distribution", &ages, GREEN)?;

    root.present()?;
    Ok(())
}

fn owned<'a>(it: impl Iterator<Item = (&'a str, usize)>) -> Vec<(String, usize)> {
    it.map(|(k, v)| (k.to_string(), v)).collect()
}

fn bar_panel(
    area: &Panel<'_>,
    title: &str,
    data: &[(String, usize)],
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    if data.is_empty() {
        return empty_panel(area, title);
    }
    let y_max = data.iter().map(|(_, c)| *c).max().unwrap_or(0) + 1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d((0..data.len()).into_segmented(), 0..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(data.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => data.get(*i).map(|(l, _)| l.clone()).unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("Visits")
        .draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(8)
            .data(data.iter().enumerate().map(|(i, (_, c))| (i, *c))),
    )?;
    Ok(())
}

fn pie_panel(area: &Panel<'_>, title: &str, data: &[(String, usize)]) -> Result<(), Box<dyn Error>> {
    let total: usize = data.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        return empty_panel(area, title);
    }
    let area = area.titled(title, ("sans-serif", 22).into_font())?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let mut start = PIE_START_DEGREES;
    for (i, (label, count)) in data.iter().enumerate() {
        let share = *count as f64 / total as f64;
        let sweep = 360.0 * share;
        area.draw(&Polygon::new(
            wedge(center, radius, start, sweep),
            Palette99::pick(i).filled(),
        ))?;
        let anchor = on_circle(center, radius * 1.12, start + sweep / 2.0);
        area.draw(&Text::new(
            format!("{label} {:.1}%", share * 100.0),
            anchor,
            ("sans-serif", 15).into_font(),
        ))?;
        start += sweep;
    }
    Ok(())
}

fn empty_panel(area: &Panel<'_>, title: &str) -> Result<(), Box<dyn Error>> {
    let area = area.titled(title, ("sans-serif", 22).into_font())?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (w as i32 / 2 - 30, h as i32 / 2),
        ("sans-serif", 18).into_font(),
    ))?;
    Ok(())
}

/// Polygon approximating a pie wedge, one vertex per degree of arc.
fn wedge(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep.ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for k in 0..=steps {
        let degrees = start + sweep * k as f64 / steps as f64;
        points.push(on_circle(center, radius, degrees));
    }
    points
}

// Counter-clockwise from the positive x axis; pixel y grows downward.
fn on_circle(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let r = degrees.to_radians();
    (
        center.0 + (radius * r.cos()).round() as i32,
        center.1 - (radius * r.sin()).round() as i32,
    )
}
