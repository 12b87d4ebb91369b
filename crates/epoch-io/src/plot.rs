// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Plot
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! SVG summaries of a sampled distribution.
//!
//! 1D: preview curve n(x) with the sampled (x, n) points on top.
//! 2D: preview heat map next to a scatter of particle positions coloured by
//! sampled density. 3D is not supported.

use epoch_core::particles::ParticleBatch;
use epoch_core::preview::PreviewGrid;
use epoch_types::error::{EpochError, EpochResult};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const PANEL_PX: f64 = 480.0;
const MARGIN_PX: f64 = 70.0;
/// Heat-map cells drawn per axis at most; larger previews are strided.
const MAX_HEATMAP_CELLS: usize = 200;
/// Scatter points drawn at most; larger batches are strided.
const MAX_SCATTER_POINTS: usize = 20_000;

/// Viridis anchor colours, low to high.
const COLOUR_STOPS: [(f64, f64, f64); 5] = [
    (68.0, 1.0, 84.0),
    (59.0, 82.0, 139.0),
    (33.0, 145.0, 140.0),
    (94.0, 201.0, 98.0),
    (253.0, 231.0, 37.0),
];

fn colour(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (COLOUR_STOPS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(COLOUR_STOPS.len() - 2);
    let f = scaled - i as f64;
    let (r0, g0, b0) = COLOUR_STOPS[i];
    let (r1, g1, b1) = COLOUR_STOPS[i + 1];
    format!(
        "rgb({:.0},{:.0},{:.0})",
        r0 + f * (r1 - r0),
        g0 + f * (g1 - g0),
        b0 + f * (b1 - b0)
    )
}

fn normalise(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (v - lo) / (hi - lo)
    } else {
        0.5
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

/// Data-to-pixel mapping for one panel.
#[derive(Debug, Clone, Copy)]
struct Panel {
    left: f64,
    top: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Panel {
    fn px(&self, x: f64) -> f64 {
        self.left + normalise(x, self.x_range.0, self.x_range.1) * PANEL_PX
    }

    fn py(&self, y: f64) -> f64 {
        self.top + (1.0 - normalise(y, self.y_range.0, self.y_range.1)) * PANEL_PX
    }
}

/// Accumulates SVG markup.
struct SvgBuilder {
    content: String,
}

impl SvgBuilder {
    fn new(width: f64, height: f64) -> Self {
        let content = format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">
  <style>
    .frame {{ fill: none; stroke: #333333; stroke-width: 1; }}
    .grid {{ stroke: #dddddd; stroke-width: 0.5; }}
    .curve {{ fill: none; stroke: #1f77b4; stroke-width: 1.5; }}
    .sample {{ fill: #ff7f0e; fill-opacity: 0.5; }}
    .label {{ font-family: sans-serif; font-size: 13px; fill: #000000; }}
    .tick {{ font-family: monospace; font-size: 10px; fill: #333333; }}
  </style>
  <rect x="0" y="0" width="{width}" height="{height}" fill="#ffffff" />
"##
        );
        SvgBuilder { content }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        let _ = writeln!(
            self.content,
            r#"  <rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" stroke="none" />"#
        );
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Option<&str>) {
        match fill {
            Some(fill) => {
                let _ = writeln!(
                    self.content,
                    r#"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}" />"#
                );
            }
            None => {
                let _ = writeln!(
                    self.content,
                    r#"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" class="sample" />"#
                );
            }
        }
    }

    fn polyline(&mut self, points: &[(f64, f64)], class: &str) {
        if points.len() < 2 {
            return;
        }
        let coords: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect();
        let _ = writeln!(
            self.content,
            r#"  <polyline points="{}" class="{class}" />"#,
            coords.join(" ")
        );
    }

    fn text(&mut self, x: f64, y: f64, text: &str, class: &str, anchor: &str) {
        let _ = writeln!(
            self.content,
            r#"  <text x="{x:.2}" y="{y:.2}" class="{class}" text-anchor="{anchor}">{text}</text>"#
        );
    }

    /// Frame, bound ticks and axis labels for a panel.
    fn axes(&mut self, panel: &Panel, x_label: &str, y_label: &str) {
        let _ = writeln!(
            self.content,
            r#"  <rect x="{:.2}" y="{:.2}" width="{PANEL_PX}" height="{PANEL_PX}" class="frame" />"#,
            panel.left, panel.top
        );
        let bottom = panel.top + PANEL_PX;
        for (x, anchor) in [(panel.x_range.0, "start"), (panel.x_range.1, "end")] {
            self.text(panel.px(x), bottom + 14.0, &format!("{x:.2e}"), "tick", anchor);
        }
        for y in [panel.y_range.0, panel.y_range.1] {
            self.text(panel.left - 4.0, panel.py(y) + 3.0, &format!("{y:.2e}"), "tick", "end");
        }
        self.text(
            panel.left + PANEL_PX / 2.0,
            bottom + 34.0,
            x_label,
            "label",
            "middle",
        );
        let cy = panel.top + PANEL_PX / 2.0;
        let _ = writeln!(
            self.content,
            r#"  <text x="{:.2}" y="{cy:.2}" class="label" text-anchor="middle" transform="rotate(-90 {:.2} {cy:.2})">{y_label}</text>"#,
            panel.left - 58.0,
            panel.left - 58.0
        );
    }

    fn save(mut self, path: &Path) -> EpochResult<()> {
        self.content.push_str("</svg>\n");
        fs::write(path, self.content.as_bytes())?;
        info!("Plot written to {}", path.display());
        Ok(())
    }
}

fn stride(len: usize, max: usize) -> usize {
    len.div_ceil(max.max(1)).max(1)
}

fn plot_1d<const D: usize>(
    preview: &PreviewGrid<D>,
    batch: &ParticleBatch<D>,
    path: &Path,
) -> EpochResult<()> {
    let axes: &[_] = &preview.axes;
    let xs = &axes[0];
    let ns: Vec<f64> = preview.density.iter().copied().collect();
    let sample_x = batch.axis_values(0);
    let sample_n = batch.densities();

    let x_range = (xs[0], xs[xs.len() - 1]);
    let (_, n_hi) = value_range(ns.iter().chain(sample_n).copied());
    let panel = Panel {
        left: MARGIN_PX,
        top: 30.0,
        x_range,
        y_range: (0.0, if n_hi > 0.0 { n_hi } else { 1.0 }),
    };

    let mut svg = SvgBuilder::new(PANEL_PX + 2.0 * MARGIN_PX, PANEL_PX + 90.0);
    svg.axes(&panel, "x (m)", "n (m^-3)");
    let curve: Vec<(f64, f64)> = xs
        .iter()
        .zip(&ns)
        .map(|(&x, &n)| (panel.px(x), panel.py(n)))
        .collect();
    svg.polyline(&curve, "curve");
    let step = stride(sample_n.len(), MAX_SCATTER_POINTS);
    for i in (0..sample_n.len()).step_by(step) {
        svg.circle(panel.px(sample_x[i]), panel.py(sample_n[i]), 2.0, None);
    }
    svg.text(panel.left + PANEL_PX - 8.0, panel.top + 16.0, "Distribution", "label", "end");
    svg.text(panel.left + PANEL_PX - 8.0, panel.top + 32.0, "Samples", "tick", "end");
    svg.save(path)
}

fn plot_2d<const D: usize>(
    preview: &PreviewGrid<D>,
    batch: &ParticleBatch<D>,
    path: &Path,
) -> EpochResult<()> {
    let axes: &[_] = &preview.axes;
    let xs = &axes[0];
    let ys = &axes[1];
    let (nx, ny) = (xs.len(), ys.len());
    let flat: Vec<f64> = preview.density.iter().copied().collect();
    let (n_lo, n_hi) = value_range(flat.iter().chain(batch.densities()).copied());

    let x_range = (xs[0], xs[nx - 1]);
    let y_range = (ys[0], ys[ny - 1]);
    let left = Panel {
        left: MARGIN_PX,
        top: 30.0,
        x_range,
        y_range,
    };
    let right = Panel {
        left: 2.0 * MARGIN_PX + PANEL_PX,
        ..left
    };

    let mut svg = SvgBuilder::new(2.0 * PANEL_PX + 3.0 * MARGIN_PX, PANEL_PX + 110.0);

    // Heat map: one rect per (strided) lattice point, centred on it.
    let sx = stride(nx, MAX_HEATMAP_CELLS);
    let sy = stride(ny, MAX_HEATMAP_CELLS);
    let cell_w = PANEL_PX / nx.div_ceil(sx) as f64;
    let cell_h = PANEL_PX / ny.div_ceil(sy) as f64;
    for (cy, iy) in (0..ny).step_by(sy).enumerate() {
        for (cx, ix) in (0..nx).step_by(sx).enumerate() {
            let n = flat[iy * nx + ix];
            let x = left.left + cx as f64 * cell_w;
            let y = left.top + PANEL_PX - (cy + 1) as f64 * cell_h;
            svg.rect(x, y, cell_w + 0.5, cell_h + 0.5, &colour(normalise(n, n_lo, n_hi)));
        }
    }
    svg.axes(&left, "x (m)", "y (m)");

    let positions = batch.positions();
    let densities = batch.densities();
    let step = stride(positions.len(), MAX_SCATTER_POINTS);
    for i in (0..positions.len()).step_by(step) {
        let p: &[f64] = &positions[i];
        let fill = colour(normalise(densities[i], n_lo, n_hi));
        svg.circle(right.px(p[0]), right.py(p[1]), 1.5, Some(&fill));
    }
    svg.axes(&right, "x (m)", "y (m)");

    let legend_y = left.top + PANEL_PX + 60.0;
    svg.text(
        left.left,
        legend_y,
        &format!("n (m^-3): {n_lo:.2e} (dark) to {n_hi:.2e} (bright)"),
        "label",
        "start",
    );
    svg.save(path)
}

/// File name used for a plot of the given dimensionality.
pub fn plot_file_name(dimensions: usize) -> String {
    format!("dist-{dimensions}D.svg")
}

/// Render the preview and sampled particles into `dir`.
///
/// Returns the written path. 3D input yields [`EpochError::Unsupported`].
pub fn plot_distribution<const D: usize>(
    preview: &PreviewGrid<D>,
    batch: &ParticleBatch<D>,
    dir: &Path,
) -> EpochResult<PathBuf> {
    let path = dir.join(plot_file_name(D));
    match D {
        1 => plot_1d(preview, batch, &path)?,
        2 => plot_2d(preview, batch, &path)?,
        _ => {
            return Err(EpochError::Unsupported(format!(
                "Visualisation not currently implemented for {D}D."
            )))
        }
    }
    Ok(path)
}
