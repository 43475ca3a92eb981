use image::{Rgba, RgbaImage};

use crate::composite::{decode_icon, fit_to_bounds, render_composite};
use crate::composite_layout::{CompositeConfig, CompositeLayout};
use crate::error::MediaError;

fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(color))
}

const CONFIG: CompositeConfig = CompositeConfig {
    cell_size: 10,
    padding: 2,
};

#[test]
fn layout_depends_only_on_count() {
    assert_eq!(CompositeLayout::for_count(1).unwrap(), CompositeLayout::VerticalStack(1));
    assert_eq!(CompositeLayout::for_count(3).unwrap(), CompositeLayout::VerticalStack(3));
    assert_eq!(CompositeLayout::for_count(4).unwrap(), CompositeLayout::Grid2x2);
    assert_eq!(CompositeLayout::for_count(5).unwrap(), CompositeLayout::Grid2x2PlusOne);
    assert_eq!(CompositeLayout::for_count(6).unwrap(), CompositeLayout::Grid2x3);
    assert!(matches!(
        CompositeLayout::for_count(0),
        Err(MediaError::UnsupportedRuneCount(0))
    ));
    assert!(CompositeLayout::for_count(7).is_err());
}

#[test]
fn canvas_sizes() {
    // cells * 10 + (cells + 1) * 2
    assert_eq!(CompositeLayout::VerticalStack(3).canvas_size(&CONFIG), (14, 38));
    assert_eq!(CompositeLayout::Grid2x2.canvas_size(&CONFIG), (26, 26));
    assert_eq!(CompositeLayout::Grid2x3.canvas_size(&CONFIG), (26, 38));
}

#[test]
fn fifth_icon_is_centered() {
    let origins = CompositeLayout::Grid2x2PlusOne.cell_origins(&CONFIG);
    assert_eq!(origins, vec![(2, 2), (14, 2), (2, 14), (14, 14), (8, 26)]);
}

#[test]
fn six_icons_fill_two_columns() {
    let origins = CompositeLayout::Grid2x3.cell_origins(&CONFIG);
    assert_eq!(origins[4], (2, 26));
    assert_eq!(origins[5], (14, 26));
}

#[test]
fn render_places_icons_in_socket_order() {
    let red = solid(10, 10, [255, 0, 0, 255]);
    let blue = solid(10, 10, [0, 0, 255, 255]);
    let png = render_composite(&[red, blue], &CONFIG).unwrap();

    let canvas = decode_icon(&png).unwrap();
    assert_eq!(canvas.dimensions(), (14, 26));
    assert_eq!(canvas.get_pixel(6, 6), &Rgba([255, 0, 0, 255]));
    assert_eq!(canvas.get_pixel(6, 18), &Rgba([0, 0, 255, 255]));
    // Padding stays transparent.
    assert_eq!(canvas.get_pixel(0, 0)[3], 0);
}

#[test]
fn small_icons_scale_up_and_center() {
    let tiny = solid(5, 5, [0, 255, 0, 255]);
    let png = render_composite(&[tiny], &CONFIG).unwrap();
    let canvas = decode_icon(&png).unwrap();
    assert_eq!(canvas.get_pixel(2, 2), &Rgba([0, 255, 0, 255]));
    assert_eq!(canvas.get_pixel(11, 11), &Rgba([0, 255, 0, 255]));
}

#[test]
fn wide_icons_keep_aspect_ratio() {
    assert_eq!(fit_to_bounds(20, 10, 10, 10), (10, 5));
    assert_eq!(fit_to_bounds(0, 10, 10, 10), (0, 0));
}

#[test]
fn render_rejects_bad_counts() {
    let icons: Vec<RgbaImage> = (0..7).map(|_| solid(1, 1, [0, 0, 0, 255])).collect();
    assert!(render_composite(&icons, &CONFIG).is_err());
    assert!(render_composite(&[], &CONFIG).is_err());
}
