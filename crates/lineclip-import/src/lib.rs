//! Reader and writer for the point-file format.
//!
//! ```text
//! x0 y0            first point of the line
//! x1 y1            second point of the line
//! x y status       zero or more samples; status 1 marks an inlier
//! ```
//!
//! Fields are whitespace separated and blank lines are ignored.

use anyhow::{bail, Context, Result};
use lineclip_core::geom::Vec2;
use lineclip_core::model::{PointRecord, PointSet};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

pub fn import_points(path: &Path) -> Result<PointSet> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read points: {path:?}"))?;
    let set = parse_points(&text).with_context(|| format!("parse points: {path:?}"))?;
    debug!(
        path = %path.display(),
        points = set.points.len(),
        "imported point set"
    );
    Ok(set)
}

pub fn parse_points(text: &str) -> Result<PointSet> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|&(n, line)| {
            if line.is_empty() {
                debug!(line = n, "skipping blank line");
                return false;
            }
            true
        });

    let (n, line) = rows.next().context("missing first line point")?;
    let p0 = parse_xy(line).with_context(|| format!("line {n}: first line point"))?;
    let (n, line) = rows.next().context("missing second line point")?;
    let p1 = parse_xy(line).with_context(|| format!("line {n}: second line point"))?;

    let mut points = Vec::new();
    for (n, line) in rows {
        let record = parse_record(line).with_context(|| format!("line {n}: point record"))?;
        points.push(record);
    }

    Ok(PointSet { p0, p1, points })
}

/// Serialises a point set in the format [`parse_points`] reads.
pub fn write_points(set: &PointSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", set.p0.x, set.p0.y);
    let _ = writeln!(out, "{} {}", set.p1.x, set.p1.y);
    for p in &set.points {
        let _ = writeln!(out, "{} {} {}", p.pos.x, p.pos.y, p.status);
    }
    out
}

fn parse_xy(line: &str) -> Result<Vec2> {
    let fields: Vec<_> = line.split_whitespace().collect();
    if fields.len() != 2 {
        bail!("expected `x y`, found {} fields in {line:?}", fields.len());
    }
    Ok(Vec2::new(parse_coord(fields[0])?, parse_coord(fields[1])?))
}

fn parse_record(line: &str) -> Result<PointRecord> {
    let fields: Vec<_> = line.split_whitespace().collect();
    if fields.len() != 3 {
        bail!("expected `x y status`, found {} fields in {line:?}", fields.len());
    }
    let pos = Vec2::new(parse_coord(fields[0])?, parse_coord(fields[1])?);
    let status = fields[2]
        .parse::<i64>()
        .with_context(|| format!("invalid status {:?}", fields[2]))?;
    Ok(PointRecord::new(pos, status))
}

fn parse_coord(field: &str) -> Result<f64> {
    let v = field
        .parse::<f64>()
        .with_context(|| format!("invalid coordinate {field:?}"))?;
    if !v.is_finite() {
        bail!("coordinate is not finite: {field:?}");
    }
    Ok(v)
}
