//! Integration tests for the diff binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{Rgba, RgbaImage};
use png_diff::codec::{read_png, write_png};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn diff(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diff"))
        .args(args)
        .output()
        .expect("Failed to run diff")
}

/// Create temp directory for test files.
fn temp_dir() -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("png-diff-test-{}-{}", std::process::id(), id));
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Writes a solid red 2x2 PNG and a copy with pixel (1, 1) turned blue.
fn red_pair(dir: &Path) -> (PathBuf, PathBuf) {
    let original = RgbaImage::from_pixel(2, 2, RED);
    let mut changed = original.clone();
    changed.put_pixel(1, 1, BLUE);

    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, &original).unwrap();
    write_png(&b, &changed).unwrap();
    (a, b)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_pixel_mode_identical_images_prints_zero() {
    let dir = temp_dir();
    let (a, _) = red_pair(&dir);
    let copy = dir.join("copy.png");
    fs::copy(&a, &copy).unwrap();

    let output = diff(&[Path::new("pixel"), &a, &copy]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "0\n");
}

#[test]
fn test_pixel_mode_counts_changed_pixel() {
    let dir = temp_dir();
    let (a, b) = red_pair(&dir);

    let output = diff(&[Path::new("pixel"), &a, &b]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn test_image_mode_writes_diff_png() {
    let dir = temp_dir();
    let (a, b) = red_pair(&dir);
    let out = dir.join("diff.png");

    let output = diff(&[Path::new("image"), &a, &b, &out]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let diff_image = read_png(&out).unwrap();
    assert_eq!(diff_image.dimensions(), (2, 2));
    assert_eq!(*diff_image.get_pixel(1, 1), RED);
    assert_eq!(*diff_image.get_pixel(0, 0), Rgba([237, 237, 237, 255]));
}

#[test]
fn test_unknown_mode_is_rejected() {
    let dir = temp_dir();
    let (a, b) = red_pair(&dir);
    let out = dir.join("diff.png");

    let output = diff(&[Path::new("foo"), &a, &b, &out]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("First argument must be 'pixel' or 'image'"));
    assert!(!out.exists());
}

#[test]
fn test_wrong_arg_counts_are_rejected() {
    let dir = temp_dir();
    let (a, b) = red_pair(&dir);

    let output = diff(&[Path::new("pixel"), &a, &b, &dir.join("extra.png")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("must specify just 3 args"));

    let output = diff(&[Path::new("image"), &a, &b]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("must specify just 4 args"));

    let output = diff(&[Path::new("pixel")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("must specify just 3 args"));
}

#[test]
fn test_missing_input_fails() {
    let dir = temp_dir();
    let (a, _) = red_pair(&dir);

    let output = diff(&[Path::new("pixel"), &a, &dir.join("missing.png")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.png"));
}

#[test]
fn test_dimension_mismatch_fails_without_output() {
    let dir = temp_dir();
    let (a, _) = red_pair(&dir);
    let wide = dir.join("wide.png");
    write_png(&wide, &RgbaImage::from_pixel(3, 2, RED)).unwrap();
    let out = dir.join("diff.png");

    let output = diff(&[Path::new("image"), &a, &wide, &out]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dimensions do not match"));
    assert!(!out.exists());
}
