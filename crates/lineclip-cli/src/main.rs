use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lineclip_core::analysis::{AnalysisConfig, Analyzer};
use lineclip_core::clip::{ClipAxis, Segment};
use lineclip_core::fit::{fit_viewport, FitConfig};
use lineclip_core::geom::{BBox2, Vec2};
use lineclip_core::model::PointSet;
use lineclip_core::observer::ViewportObserver;
use lineclip_core::viewport::{Axis, Viewport};
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lineclip")]
#[command(about = "Clip a fitted line to a plot viewport and follow it through pan/zoom.")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clip the line of a point file to a viewport and print a JSON report.
    Clip {
        input: PathBuf,
        /// XMIN XMAX YMIN YMAX; defaults to the data extents plus margin.
        #[arg(long, num_args = 4, allow_negative_numbers = true)]
        bounds: Option<Vec<f64>>,
        #[arg(long, default_value_t = 0.05)]
        margin: f64,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Clip the line through two points.
    Line {
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p0: Vec2,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p1: Vec2,
        #[arg(long, num_args = 4, allow_negative_numbers = true, required = true)]
        bounds: Vec<f64>,
    },
    /// Summarise a point file.
    Inspect {
        input: PathBuf,
        #[arg(long, default_value_t = 0.05)]
        margin: f64,
    },
    /// Apply pan/zoom steps to the fitted viewport and print each republished segment.
    Replay {
        input: PathBuf,
        /// `pan:DX,DY` or `zoom:FACTOR` (about the viewport centre); repeatable,
        /// applied in the order given.
        #[arg(long = "step", value_parser = parse_step, allow_hyphen_values = true)]
        steps: Vec<ReplayOp>,
        #[arg(long, default_value_t = 0.05)]
        margin: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Clip {
            input,
            bounds,
            margin,
            report,
        } => clip(&input, bounds.as_deref(), margin, report.as_deref()),
        Command::Line { p0, p1, bounds } => line(p0, p1, &bounds),
        Command::Inspect { input, margin } => inspect(&input, margin),
        Command::Replay {
            input,
            steps,
            margin,
        } => replay(&input, &steps, margin),
    }
}

fn clip(input: &Path, bounds: Option<&[f64]>, margin: f64, report: Option<&Path>) -> Result<()> {
    let points = load(input)?;
    let viewport = bounds.map(bbox_from_args).transpose()?;

    let cfg = AnalysisConfig {
        fit: fit_config(margin),
        ..AnalysisConfig::default()
    };
    let report_data = Analyzer::new(cfg)
        .analyze(&points, viewport)
        .with_context(|| format!("clip line from {input:?}"))?;
    let json = serde_json::to_string_pretty(&report_data).context("serialize report")?;

    if let Some(path) = report {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        std::fs::write(path, &json).with_context(|| format!("write report: {path:?}"))?;
        info!(path = %path.display(), "wrote clip report");
    } else {
        println!("{json}");
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct LineOutput {
    axis: ClipAxis,
    segment: Segment,
}

fn line(p0: Vec2, p1: Vec2, bounds: &[f64]) -> Result<()> {
    let rect = bbox_from_args(bounds)?;
    let clipped = lineclip_core::clip::clip_detailed(p0, p1, &rect)?;
    let out = LineOutput {
        axis: clipped.axis,
        segment: clipped.segment,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize segment")?
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectOutput {
    p0: Vec2,
    p1: Vec2,
    line_defined: bool,
    points_total: usize,
    inliers: usize,
    outliers: usize,
    extents: BBox2,
    fitted_viewport: BBox2,
}

fn inspect(input: &Path, margin: f64) -> Result<()> {
    let points = load(input)?;
    let inliers = points.inliers().count();
    let out = InspectOutput {
        p0: points.p0,
        p1: points.p1,
        line_defined: points.line().is_ok(),
        points_total: points.points.len(),
        inliers,
        outliers: points.points.len() - inliers,
        extents: points.extents(),
        fitted_viewport: fit_viewport(&points, &fit_config(margin)),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize summary")?
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ReplayStep {
    step: usize,
    /// `None` for the initial clip against the fitted viewport.
    axis: Option<Axis>,
    bounds: BBox2,
    segment: Segment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ReplayOp {
    Pan(Vec2),
    Zoom(f64),
}

fn replay(input: &Path, ops: &[ReplayOp], margin: f64) -> Result<()> {
    let points = load(input)?;
    let steps = run_replay(&points, ops, margin).with_context(|| format!("replay {input:?}"))?;
    let json = serde_json::to_string_pretty(&steps).context("serialize replay")?;
    println!("{json}");
    Ok(())
}

fn run_replay(points: &PointSet, ops: &[ReplayOp], margin: f64) -> Result<Vec<ReplayStep>> {
    let line = points.line().context("line of point file")?;
    let mut viewport = Viewport::new(fit_viewport(points, &fit_config(margin)));

    let steps: Rc<RefCell<Vec<ReplayStep>>> = Rc::default();
    let published: Rc<RefCell<Option<Segment>>> = Rc::default();
    let mut observer = ViewportObserver::with_line(line, Rc::clone(&published));
    let initial = observer.sync(&viewport);
    steps.borrow_mut().push(ReplayStep {
        step: 0,
        axis: None,
        bounds: viewport.bounds(),
        segment: initial,
    });

    let log = Rc::clone(&steps);
    let subscription = viewport.on_bounds_changed(move |change| {
        let segment = observer.on_viewport_changed(&change.bounds);
        let mut log = log.borrow_mut();
        let step = log.len();
        log.push(ReplayStep {
            step,
            axis: Some(change.axis),
            bounds: change.bounds,
            segment,
        });
    });

    for op in ops {
        match *op {
            ReplayOp::Pan(d) => viewport
                .pan(d.x, d.y)
                .with_context(|| format!("pan by ({}, {})", d.x, d.y))?,
            ReplayOp::Zoom(factor) => {
                let anchor = viewport.bounds().center();
                viewport
                    .zoom(factor, anchor)
                    .with_context(|| format!("zoom by {factor}"))?;
            }
        }
    }
    viewport.unsubscribe(subscription);

    let Some(last) = *published.borrow() else {
        bail!("no segment was published");
    };
    let steps = steps.take();
    info!(steps = steps.len(), ?last, "replay finished");
    Ok(steps)
}

fn load(input: &Path) -> Result<PointSet> {
    ensure_input_file(input)?;
    lineclip_import::import_points(input)
}

fn fit_config(margin: f64) -> FitConfig {
    FitConfig {
        margin_frac: margin,
        ..FitConfig::default()
    }
}

fn bbox_from_args(v: &[f64]) -> Result<BBox2> {
    let [x_min, x_max, y_min, y_max] = v else {
        bail!("expected 4 bounds (XMIN XMAX YMIN YMAX), got {}", v.len());
    };
    if v.iter().any(|b| !b.is_finite()) {
        bail!("bounds must be finite: {v:?}");
    }
    Ok(BBox2::from_limits(*x_min, *x_max, *y_min, *y_max))
}

fn parse_point(s: &str) -> Result<Vec2> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().with_context(|| format!("invalid x in {s:?}"))?;
    let y = y.trim().parse().with_context(|| format!("invalid y in {s:?}"))?;
    Ok(Vec2::new(x, y))
}

fn parse_step(s: &str) -> Result<ReplayOp> {
    let (kind, arg) = s
        .split_once(':')
        .with_context(|| format!("expected pan:DX,DY or zoom:FACTOR, got {s:?}"))?;
    match kind.trim() {
        "pan" => Ok(ReplayOp::Pan(parse_point(arg)?)),
        "zoom" => {
            let factor = arg
                .trim()
                .parse()
                .with_context(|| format!("invalid zoom factor in {s:?}"))?;
            Ok(ReplayOp::Zoom(factor))
        }
        other => bail!("unknown replay step {other:?} in {s:?}"),
    }
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let hint_root = find_workspace_root(&cwd);
            if let Some(root) = hint_root {
                bail!(
                    "input not found: {input:?} (cwd: {cwd:?}).\nHint: run from the workspace root {root:?} or pass an absolute path."
                );
            }
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("Cargo.lock").is_file())
        .map(|dir| dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineclip_core::model::PointRecord;

    #[test]
    fn parses_points_and_bounds() {
        assert_eq!(Vec2::new(-1.5, 2.0), parse_point("-1.5, 2").unwrap());
        assert!(parse_point("3").is_err());
        let b = bbox_from_args(&[10.0, -10.0, 0.0, 1.0]).unwrap();
        assert_eq!(-10.0, b.x_min());
        assert!(bbox_from_args(&[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn cli_accepts_negative_bounds() {
        let cli = Cli::try_parse_from([
            "lineclip", "line", "--p0", "0,0", "--p1", "-1,1", "--bounds", "-5", "5", "-5", "5",
        ])
        .unwrap();
        match cli.cmd {
            Command::Line { p0, p1, bounds } => {
                assert_eq!(Vec2::new(0.0, 0.0), p0);
                assert_eq!(Vec2::new(-1.0, 1.0), p1);
                assert_eq!(vec![-5.0, 5.0, -5.0, 5.0], bounds);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn replay_steps_keep_command_line_order() {
        let cli = Cli::try_parse_from([
            "lineclip", "replay", "points.txt", "--step", "pan:-1,0", "--step", "zoom:2",
            "--step", "pan:0,3",
        ])
        .unwrap();
        match cli.cmd {
            Command::Replay { steps, .. } => assert_eq!(
                vec![
                    ReplayOp::Pan(Vec2::new(-1.0, 0.0)),
                    ReplayOp::Zoom(2.0),
                    ReplayOp::Pan(Vec2::new(0.0, 3.0)),
                ],
                steps
            ),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(parse_step("spin:3").is_err());
        assert!(parse_step("zoom").is_err());
    }

    fn write_diagonal_file(name: &str) -> PathBuf {
        let set = PointSet {
            p0: Vec2::new(0.0, 0.0),
            p1: Vec2::new(1.0, 1.0),
            points: vec![
                PointRecord::new(Vec2::new(0.0, 0.0), 1),
                PointRecord::new(Vec2::new(10.0, 10.0), 1),
            ],
        };
        let dir = std::env::temp_dir().join(format!("lineclip-cli-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("points.txt");
        std::fs::write(&path, lineclip_import::write_points(&set)).unwrap();
        path
    }

    #[test]
    fn replay_applies_steps_in_order() {
        let path = write_diagonal_file("ordered");
        let points = load(&path).unwrap();

        // Fitted to (-1..11, -1..11); zoom 2 about (5, 5) then pan x by 1.
        let steps = run_replay(
            &points,
            &[ReplayOp::Zoom(2.0), ReplayOp::Pan(Vec2::new(1.0, 0.0))],
            0.1,
        )
        .unwrap();
        let axes: Vec<_> = steps.iter().map(|s| s.axis).collect();
        assert_eq!(vec![None, Some(Axis::X), Some(Axis::Y), Some(Axis::X)], axes);
        assert_eq!(BBox2::from_limits(-1.0, 11.0, -1.0, 11.0), steps[0].bounds);

        let last = steps.last().unwrap();
        assert_eq!(3, last.step);
        assert_eq!(BBox2::from_limits(3.0, 9.0, 2.0, 8.0), last.bounds);
        assert_eq!(Vec2::new(2.0, 2.0), last.segment.a);
        assert_eq!(Vec2::new(8.0, 8.0), last.segment.b);

        // Same steps, other order: the pan only moves x, then the zoom reports both axes.
        let swapped = run_replay(
            &points,
            &[ReplayOp::Pan(Vec2::new(1.0, 0.0)), ReplayOp::Zoom(2.0)],
            0.1,
        )
        .unwrap();
        let axes: Vec<_> = swapped.iter().map(|s| s.axis).collect();
        assert_eq!(vec![None, Some(Axis::X), Some(Axis::X), Some(Axis::Y)], axes);
        assert_eq!(
            BBox2::from_limits(3.0, 9.0, 2.0, 8.0),
            swapped.last().unwrap().bounds
        );

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn replay_rejects_bad_zoom() {
        let path = write_diagonal_file("bad-zoom");
        let points = load(&path).unwrap();
        assert!(run_replay(&points, &[ReplayOp::Zoom(0.0)], 0.1).is_err());
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
