//! Placement of rune icons on a runeword composite.
//!
//! The layout depends only on how many runes the runeword has.

use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Largest runeword the composite can show.
pub const MAX_RUNES: usize = 6;

/// Sizing of a composite canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Width and height of each square icon cell, in pixels.
    pub cell_size: u32,
    /// Gap between cells and around the edge, in pixels.
    pub padding: u32,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            cell_size: 56,
            padding: 4,
        }
    }
}

/// How icons are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeLayout {
    /// One column of 1 to 3 icons.
    VerticalStack(usize),
    /// Two columns, two rows.
    Grid2x2,
    /// A 2x2 grid with the fifth icon centered underneath.
    Grid2x2PlusOne,
    /// Two columns, three rows.
    Grid2x3,
}

impl CompositeLayout {
    /// Layout for a runeword of `count` runes.
    pub fn for_count(count: usize) -> Result<Self, MediaError> {
        match count {
            1..=3 => Ok(Self::VerticalStack(count)),
            4 => Ok(Self::Grid2x2),
            5 => Ok(Self::Grid2x2PlusOne),
            6 => Ok(Self::Grid2x3),
            _ => Err(MediaError::UnsupportedRuneCount(count)),
        }
    }

    pub fn icon_count(&self) -> usize {
        match self {
            Self::VerticalStack(n) => *n,
            Self::Grid2x2 => 4,
            Self::Grid2x2PlusOne => 5,
            Self::Grid2x3 => 6,
        }
    }

    pub fn columns(&self) -> u32 {
        match self {
            Self::VerticalStack(_) => 1,
            _ => 2,
        }
    }

    pub fn rows(&self) -> u32 {
        match self {
            Self::VerticalStack(n) => *n as u32,
            Self::Grid2x2 => 2,
            Self::Grid2x2PlusOne | Self::Grid2x3 => 3,
        }
    }

    /// Canvas `(width, height)` in pixels.
    pub fn canvas_size(&self, config: &CompositeConfig) -> (u32, u32) {
        let span = |cells: u32| cells * config.cell_size + (cells + 1) * config.padding;
        (span(self.columns()), span(self.rows()))
    }

    /// Top-left corner of each icon's cell, in socket order.
    pub fn cell_origins(&self, config: &CompositeConfig) -> Vec<(u32, u32)> {
        let step = config.cell_size + config.padding;
        let columns = self.columns() as usize;
        let (canvas_w, _) = self.canvas_size(config);

        (0..self.icon_count())
            .map(|i| {
                let col = (i % columns) as u32;
                let row = (i / columns) as u32;
                let y = config.padding + row * step;
                if *self == Self::Grid2x2PlusOne && i == 4 {
                    ((canvas_w - config.cell_size) / 2, y)
                } else {
                    (config.padding + col * step, y)
                }
            })
            .collect()
    }
}

impl std::fmt::Display for CompositeLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VerticalStack(n) => write!(f, "vertical stack of {n}"),
            Self::Grid2x2 => f.write_str("2x2 grid"),
            Self::Grid2x2PlusOne => f.write_str("2x2 grid plus one"),
            Self::Grid2x3 => f.write_str("2x3 grid"),
        }
    }
}
