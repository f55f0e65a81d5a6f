use lineclip_core::geom::Vec2;
use lineclip_import::{import_points, parse_points, write_points};

const SAMPLE: &str = "\
-1.5 0.25
3 4.75
0.1 0.2 1
5 -2 0
-7.25 1e3 1
2 2 -4
";

#[test]
fn parses_line_points_and_statuses() {
    let set = parse_points(SAMPLE).unwrap();
    assert_eq!(Vec2::new(-1.5, 0.25), set.p0);
    assert_eq!(Vec2::new(3.0, 4.75), set.p1);
    assert_eq!(4, set.points.len());
    assert_eq!(2, set.inliers().count());
    assert_eq!(2, set.outliers().count());
    assert_eq!(Vec2::new(-7.25, 1000.0), set.points[2].pos);
    assert_eq!(-4, set.points[3].status);
}

#[test]
fn header_only_file_is_valid() {
    let set = parse_points("0 0\n0 1\n").unwrap();
    assert!(set.points.is_empty());
    assert!(set.line().is_ok());
}

#[test]
fn degenerate_line_is_left_to_the_caller() {
    let set = parse_points("2 3\n2 3\n0 0 1\n").unwrap();
    assert!(set.line().is_err());
}

#[test]
fn written_file_reads_back() {
    let set = parse_points(SAMPLE).unwrap();
    let dir = std::env::temp_dir().join(format!("lineclip-import-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("points.txt");
    std::fs::write(&path, write_points(&set)).unwrap();

    let back = import_points(&path).unwrap();
    assert_eq!(set, back);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_file_names_path() {
    let err = import_points(std::path::Path::new("/definitely/not/here.txt")).unwrap_err();
    assert!(format!("{err:#}").contains("here.txt"));
}
