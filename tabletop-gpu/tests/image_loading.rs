//! Loading texture images from disk

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use tabletop_core::Error;
use tabletop_gpu::load_image;

#[test]
fn test_load_png_flips_and_expands_to_rgba() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stripes.png");

    let mut img = RgbImage::new(2, 2);
    for x in 0..2 {
        img.put_pixel(x, 0, Rgb([255, 255, 255]));
        img.put_pixel(x, 1, Rgb([10, 20, 30]));
    }
    img.save(&path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.dimensions(), (2, 2));
    assert_eq!(loaded.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    assert_eq!(loaded.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_load_keeps_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alpha.png");
    RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 4])).save(&path).unwrap();

    let loaded = load_image(&path).unwrap();
    assert!(loaded.pixels().all(|p| *p == Rgba([1, 2, 3, 4])));
}

#[test]
fn test_load_rejects_single_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    GrayImage::from_pixel(4, 4, Luma([90])).save(&path).unwrap();

    assert!(matches!(load_image(&path), Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("textures").join("missing.jpg");

    let err = load_image(&path).unwrap_err();
    assert!(matches!(err, Error::Texture { .. }));
    assert!(err.to_string().contains("missing.jpg"));
}

#[test]
fn test_corrupt_file_is_a_texture_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    assert!(matches!(load_image(&path), Err(Error::Texture { .. })));
}
