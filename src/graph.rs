use crate::chart::{Chart, Curve, HeatmapCell, ReferenceLine, Series, Slice, StackLayer, TreemapCell};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;
use std::ops::Range;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const PALETTE: [RGBColor; 8] = [
    RGBColor(59, 130, 246),
    RGBColor(16, 185, 129),
    RGBColor(245, 158, 11),
    RGBColor(244, 63, 94),
    RGBColor(139, 92, 246),
    RGBColor(20, 184, 166),
    RGBColor(236, 72, 153),
    RGBColor(100, 116, 139),
];

fn pick(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// RGB raster a chart is drawn onto
pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Canvas size must be non-zero (got {}x{})", width, height);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| anyhow::anyhow!("Canvas size {}x{} is too large", width, height))?;
        let buffer = vec![0u8; len];
        Ok(Canvas {
            buffer,
            width,
            height,
        })
    }

    /// Draw `chart` over a white background
    pub fn draw(&mut self, chart: &Chart) -> Result<()> {
        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        if chart.is_empty() {
            draw_placeholder(&root, chart.title())?;
        } else {
            match chart {
                Chart::Bar {
                    title,
                    horizontal: true,
                    categories,
                    series,
                } => draw_horizontal_bars(&root, title, categories, series)?,
                Chart::Bar {
                    title,
                    categories,
                    series,
                    ..
                } => draw_vertical_bars(&root, title, categories, series)?,
                Chart::Line {
                    title,
                    curve,
                    filled,
                    categories,
                    series,
                    reference,
                } => draw_lines(&root, title, *curve, *filled, categories, series, reference.as_ref())?,
                Chart::Radar { title, axes, series } => draw_radar(&root, title, axes, series)?,
                Chart::Heatmap { title, name, cells } => draw_heatmap(&root, title, name, cells)?,
                Chart::Treemap { title, cells } => draw_treemap(&root, title, cells)?,
                Chart::Stacked {
                    title,
                    categories,
                    layers,
                } => draw_stacked(&root, title, categories, layers)?,
                Chart::Doughnut { title, slices } => draw_doughnut(&root, title, slices)?,
            }
        }

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Encode the canvas as PNG
    pub fn render(self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&self.buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }
}

/// Draw one chart at the given size and return the PNG bytes
pub fn render_png(chart: &Chart, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(width, height)?;
    canvas
        .draw(chart)
        .with_context(|| format!("Failed to draw {} chart '{}'", chart.kind(), chart.title()))?;
    canvas.render()
}

fn label_at(categories: &[String], x: f64) -> String {
    if x < 0.0 {
        return String::new();
    }
    categories.get(x as usize).cloned().unwrap_or_default()
}

/// Value axis from 0 to a little above the largest value
fn value_range(max: f64) -> Range<f64> {
    if max > 0.0 {
        0.0..max * 1.1
    } else {
        0.0..1.0
    }
}

fn series_max(series: &[Series]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .fold(0.0, f64::max)
}

fn draw_placeholder(root: &Area, title: &str) -> Result<()> {
    let (w, h) = root.dim_in_pixel();
    root.draw_text(
        title,
        &TextStyle::from(("sans-serif", 20).into_font()),
        (10, 10),
    )
    .context("Failed to draw title")?;
    root.draw_text(
        "No data",
        &TextStyle::from(("sans-serif", 16).into_font()).color(&PALETTE[7]),
        (w as i32 / 2 - 30, h as i32 / 2),
    )
    .context("Failed to draw placeholder")?;
    Ok(())
}

fn draw_vertical_bars(root: &Area, title: &str, categories: &[String], series: &[Series]) -> Result<()> {
    let num_categories = categories.len();
    let num_series = series.len().max(1);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..num_categories as f64, value_range(series_max(series)))
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .x_labels(num_categories)
        .x_label_formatter(&|x| label_at(categories, *x))
        .draw()
        .context("Failed to draw mesh")?;

    // side by side when there is more than one series
    let bar_width = 0.8 / num_series as f64;
    for (series_idx, s) in series.iter().enumerate() {
        let color = pick(series_idx);
        let x_offset = (series_idx as f64 - (num_series as f64 - 1.0) / 2.0) * bar_width;
        chart
            .draw_series(s.data.iter().enumerate().map(|(cat_idx, &y)| {
                let x_center = cat_idx as f64 + 0.5 + x_offset;
                Rectangle::new(
                    [(x_center - bar_width / 2.0, 0.0), (x_center + bar_width / 2.0, y)],
                    color.filled(),
                )
            }))
            .context("Failed to draw bars")?;
    }

    Ok(())
}

fn draw_horizontal_bars(root: &Area, title: &str, categories: &[String], series: &[Series]) -> Result<()> {
    let n = categories.len();
    let values = series.first().map(|s| s.data.as_slice()).unwrap_or(&[]);

    // first category at the top
    let reversed: Vec<String> = categories.iter().rev().cloned().collect();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(110)
        .build_cartesian_2d(value_range(series_max(series)), 0.0..n as f64)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .y_labels(n)
        .y_label_formatter(&|y| label_at(&reversed, *y))
        .draw()
        .context("Failed to draw mesh")?;

    let color = pick(0);
    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let row = (n - 1 - i) as f64;
            Rectangle::new([(0.0, row + 0.1), (v, row + 0.9)], color.filled())
        }))
        .context("Failed to draw bars")?;

    Ok(())
}

/// Points of a step line: hold each value until the next category
fn step_points(data: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(data.len() * 2);
    for (i, &y) in data.iter().enumerate() {
        if i > 0 {
            points.push((i as f64, data[i - 1]));
        }
        points.push((i as f64, y));
    }
    points
}

fn draw_lines(
    root: &Area,
    title: &str,
    curve: Curve,
    filled: bool,
    categories: &[String],
    series: &[Series],
    reference: Option<&ReferenceLine>,
) -> Result<()> {
    let last = categories.len().saturating_sub(1).max(1) as f64;
    let top = reference.map_or(0.0, |r| r.value).max(series_max(series));

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..last, value_range(top))
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .x_labels(categories.len().min(12))
        .x_label_formatter(&|x| label_at(categories, x.round()))
        .draw()
        .context("Failed to draw mesh")?;

    for (idx, s) in series.iter().enumerate() {
        let color = pick(idx);
        let points: Vec<(f64, f64)> = match curve {
            Curve::Stepline => step_points(&s.data),
            Curve::Smooth | Curve::Straight => {
                s.data.iter().enumerate().map(|(i, &y)| (i as f64, y)).collect()
            }
        };

        let anno = if filled {
            chart
                .draw_series(AreaSeries::new(points, 0.0, color.mix(0.2).filled()).border_style(color.stroke_width(2)))
                .context("Failed to draw area series")?
        } else {
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .context("Failed to draw line series")?
        };
        anno.label(s.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if let Some(reference) = reference {
        let red = RGBColor(244, 63, 94);
        chart
            .draw_series(LineSeries::new(
                vec![(0.0, reference.value), (last, reference.value)],
                red.stroke_width(1),
            ))
            .context("Failed to draw reference line")?
            .label(reference.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], red.stroke_width(1)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

fn draw_stacked(root: &Area, title: &str, categories: &[String], layers: &[StackLayer]) -> Result<()> {
    let num_categories = categories.len();
    let max_stack = (0..num_categories)
        .map(|c| layers.iter().filter_map(|l| l.data.get(c)).sum::<f64>())
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..num_categories as f64, value_range(max_stack))
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .x_labels(num_categories)
        .x_label_formatter(&|x| label_at(categories, *x))
        .draw()
        .context("Failed to draw mesh")?;

    let bar_width = 0.8;
    for cat_idx in 0..num_categories {
        let x_center = cat_idx as f64 + 0.5;
        let mut y_cumulative = 0.0;

        for (layer_idx, layer) in layers.iter().enumerate() {
            let y_val = layer.data.get(cat_idx).copied().unwrap_or(0.0);
            if y_val <= 0.0 {
                continue;
            }
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [
                        (x_center - bar_width / 2.0, y_cumulative),
                        (x_center + bar_width / 2.0, y_cumulative + y_val),
                    ],
                    pick(layer_idx).filled(),
                )))
                .context("Failed to draw bar")?;

            // the item stacked here differs per category
            if let Some(label) = layer.labels.get(cat_idx).filter(|l| !l.is_empty()) {
                chart
                    .draw_series(std::iter::once(Text::new(
                        label.clone(),
                        (x_center - bar_width / 2.0 + 0.02, y_cumulative + y_val / 2.0),
                        ("sans-serif", 12).into_font(),
                    )))
                    .context("Failed to draw stack label")?;
            }

            y_cumulative += y_val;
        }
    }

    Ok(())
}

fn draw_heatmap(root: &Area, title: &str, name: &str, cells: &[HeatmapCell]) -> Result<()> {
    let n = cells.len();
    let max = cells.iter().map(|c| c.y).fold(0.0, f64::max);
    let categories: Vec<String> = cells.iter().map(|c| c.x.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..n as f64, 0.0..1.0)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| label_at(&categories, *x))
        .y_labels(1)
        .y_label_formatter(&|_| name.to_string())
        .draw()
        .context("Failed to draw mesh")?;

    for (i, cell) in cells.iter().enumerate() {
        let t = if max > 0.0 { cell.y / max } else { 0.0 };
        let color = RGBColor(
            (239.0 - 180.0 * t) as u8,
            (246.0 - 116.0 * t) as u8,
            (255.0 - 9.0 * t) as u8,
        );
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(i as f64, 0.0), (i as f64 + 1.0, 1.0)],
                color.filled(),
            )))
            .context("Failed to draw heatmap cell")?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{}", cell.y),
                (i as f64 + 0.35, 0.5),
                ("sans-serif", 14).into_font(),
            )))
            .context("Failed to draw heatmap value")?;
    }

    Ok(())
}

/// Slice-and-dice layout: each cell takes its share of the remaining
/// rectangle, alternating between vertical and horizontal cuts.
fn treemap_layout(weights: &[f64], bounds: (f64, f64, f64, f64)) -> Vec<(f64, f64, f64, f64)> {
    let mut rects = Vec::with_capacity(weights.len());
    let (mut x, mut y, mut w, mut h) = bounds;
    let mut remaining: f64 = weights.iter().sum();

    for (i, &weight) in weights.iter().enumerate() {
        if i == weights.len() - 1 || remaining <= 0.0 {
            rects.push((x, y, w, h));
            remaining -= weight;
            continue;
        }
        let share = weight / remaining;
        if i % 2 == 0 {
            let cut = w * share;
            rects.push((x, y, cut, h));
            x += cut;
            w -= cut;
        } else {
            let cut = h * share;
            rects.push((x, y, w, cut));
            y += cut;
            h -= cut;
        }
        remaining -= weight;
    }

    rects
}

fn draw_treemap(root: &Area, title: &str, cells: &[TreemapCell]) -> Result<()> {
    let body = root
        .titled(title, ("sans-serif", 20))
        .context("Failed to draw title")?;
    let (w, h) = body.dim_in_pixel();
    let weights: Vec<f64> = cells.iter().map(|c| c.y as f64).collect();
    let rects = treemap_layout(&weights, (0.0, 0.0, w as f64, h as f64));

    for (i, (cell, &(x, y, cw, ch))) in cells.iter().zip(rects.iter()).enumerate() {
        let top_left = (x as i32, y as i32);
        let bottom_right = ((x + cw) as i32, (y + ch) as i32);
        body.draw(&Rectangle::new([top_left, bottom_right], pick(i).filled()))
            .context("Failed to draw treemap cell")?;
        body.draw(&Rectangle::new([top_left, bottom_right], WHITE.stroke_width(2)))
            .context("Failed to draw treemap border")?;
        if cw > 40.0 && ch > 16.0 {
            body.draw_text(
                &format!("{} ({})", cell.x, cell.y),
                &TextStyle::from(("sans-serif", 12).into_font()).color(&WHITE),
                (top_left.0 + 4, top_left.1 + 4),
            )
            .context("Failed to draw treemap label")?;
        }
    }

    Ok(())
}

fn draw_radar(root: &Area, title: &str, axes: &[String], series: &[Series]) -> Result<()> {
    let body = root
        .titled(title, ("sans-serif", 20))
        .context("Failed to draw title")?;
    let (w, h) = body.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let n = axes.len().max(1);

    let point = |axis: usize, value: f64| {
        let angle = -PI / 2.0 + 2.0 * PI * axis as f64 / n as f64;
        let r = radius * value.clamp(0.0, 100.0) / 100.0;
        (
            center.0 + (r * angle.cos()) as i32,
            center.1 + (r * angle.sin()) as i32,
        )
    };

    // grid rings at 25/50/75/100
    let grid = RGBColor(209, 213, 219);
    for ring in [25.0, 50.0, 75.0, 100.0] {
        let mut outline: Vec<(i32, i32)> = (0..n).map(|a| point(a, ring)).collect();
        outline.push(point(0, ring));
        body.draw(&PathElement::new(outline, grid.stroke_width(1)))
            .context("Failed to draw radar grid")?;
    }
    for (a, axis) in axes.iter().enumerate() {
        body.draw(&PathElement::new(vec![center, point(a, 100.0)], grid.stroke_width(1)))
            .context("Failed to draw radar axis")?;
        let (lx, ly) = point(a, 112.0);
        body.draw_text(
            axis,
            &TextStyle::from(("sans-serif", 14).into_font()),
            (lx - 30, ly - 7),
        )
        .context("Failed to draw radar label")?;
    }

    for (idx, s) in series.iter().enumerate() {
        let color = pick(idx);
        let mut outline: Vec<(i32, i32)> = s.data.iter().enumerate().map(|(a, &v)| point(a, v)).collect();
        body.draw(&Polygon::new(outline.clone(), color.mix(0.25).filled()))
            .context("Failed to draw radar area")?;
        if let Some(&first) = outline.first() {
            outline.push(first);
        }
        body.draw(&PathElement::new(outline, color.stroke_width(2)))
            .context("Failed to draw radar outline")?;

        let legend_y = 10 + idx as i32 * 20;
        body.draw(&Rectangle::new([(10, legend_y), (24, legend_y + 14)], color.filled()))
            .context("Failed to draw legend")?;
        body.draw_text(
            &s.name,
            &TextStyle::from(("sans-serif", 14).into_font()),
            (30, legend_y),
        )
        .context("Failed to draw legend")?;
    }

    Ok(())
}

/// Ring segment between two radii, angles in degrees
fn ring_segment(
    center: (i32, i32),
    outer_radius: f64,
    inner_radius: f64,
    start_angle: f64,
    sweep_angle: f64,
) -> Vec<(i32, i32)> {
    let num_points = 100;
    let mut points = Vec::with_capacity(2 * (num_points + 1));

    for i in 0..=num_points {
        let rad = (start_angle + sweep_angle * i as f64 / num_points as f64).to_radians();
        points.push((
            center.0 + (outer_radius * rad.cos()) as i32,
            center.1 + (outer_radius * rad.sin()) as i32,
        ));
    }
    for i in (0..=num_points).rev() {
        let rad = (start_angle + sweep_angle * i as f64 / num_points as f64).to_radians();
        points.push((
            center.0 + (inner_radius * rad.cos()) as i32,
            center.1 + (inner_radius * rad.sin()) as i32,
        ));
    }

    points
}

fn draw_doughnut(root: &Area, title: &str, slices: &[Slice]) -> Result<()> {
    let body = root
        .titled(title, ("sans-serif", 20))
        .context("Failed to draw title")?;
    let (w, h) = body.dim_in_pixel();
    let outer = f64::from(w.min(h)) * 0.4;
    let center = ((w as f64 * 0.4) as i32, h as i32 / 2);

    let mut angle = -90.0;
    for (idx, slice) in slices.iter().enumerate() {
        let sweep = slice.share / 100.0 * 360.0;
        if sweep > 0.0 {
            body.draw(&Polygon::new(
                ring_segment(center, outer, outer * 0.55, angle, sweep),
                pick(idx).filled(),
            ))
            .context("Failed to draw doughnut segment")?;
        }
        angle += sweep;

        let legend_x = (w as f64 * 0.8) as i32 - 40;
        let legend_y = 20 + idx as i32 * 22;
        body.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 14, legend_y + 14)],
            pick(idx).filled(),
        ))
        .context("Failed to draw legend")?;
        body.draw_text(
            &format!("{} {:.1}%", slice.label, slice.share),
            &TextStyle::from(("sans-serif", 13).into_font()),
            (legend_x + 20, legend_y),
        )
        .context("Failed to draw legend")?;
    }

    Ok(())
}
