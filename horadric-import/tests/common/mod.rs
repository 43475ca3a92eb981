#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use horadric_media::{ImageFetcher, ImageSource, MediaError};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// A solid-color square PNG.
pub fn png(size: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(size, size, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Serves canned bytes for remote URLs and counts fetches. Unknown URLs
/// fail like a 404 would.
#[derive(Default)]
pub struct FakeFetcher {
    pub responses: HashMap<String, Vec<u8>>,
    pub fetches: AtomicUsize,
}

impl FakeFetcher {
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), bytes);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>, MediaError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match source {
            ImageSource::Local(path) => Ok(std::fs::read(path)?),
            ImageSource::Remote(url) => {
                self.responses
                    .get(url)
                    .cloned()
                    .ok_or_else(|| MediaError::Status {
                        url: url.clone(),
                        status: 404,
                    })
            }
        }
    }
}
