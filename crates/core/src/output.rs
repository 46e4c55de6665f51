//! Output pixels, the output buffer, and rectangular regions.
//!
//! A fresh [`OutputBuffer`] is filled with [`OutputPixel::UNTOUCHED`]. A
//! render overwrites exactly the cells it reaches; cells outside the
//! requested region, or in rows skipped after an abort, keep whatever they
//! held before. Callers must not read them as zero.

use crate::error::LicError;

/// One rendered pixel: grey value and coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputPixel {
    /// Intensity in [0, 1] when `alpha == 1`, zero when masked.
    pub value: f32,
    /// 1 for a valid pixel, 0 for a masked one.
    pub alpha: f32,
}

impl OutputPixel {
    /// A pixel with no usable streamline.
    pub const MASKED: OutputPixel = OutputPixel {
        value: 0.0,
        alpha: 0.0,
    };

    /// Fill value of a buffer cell no render has written. The kernel never
    /// produces it.
    pub const UNTOUCHED: OutputPixel = OutputPixel {
        value: f32::NAN,
        alpha: 0.0,
    };

    /// True for the [`OutputPixel::UNTOUCHED`] fill.
    pub fn is_untouched(&self) -> bool {
        self.value.is_nan()
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Region {
    /// Creates a region; an inverted range is treated as empty.
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self {
            x0,
            y0,
            x1: x1.max(x0),
            y1: y1.max(y0),
        }
    }

    /// The whole `width x height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    /// True if the region covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Fails unless the region fits in `width x height`.
    pub fn check_within(&self, width: usize, height: usize) -> Result<(), LicError> {
        if self.x1 > width || self.y1 > height {
            return Err(LicError::RegionOutOfBounds {
                x0: self.x0,
                y0: self.y0,
                x1: self.x1,
                y1: self.y1,
                width,
                height,
            });
        }
        Ok(())
    }
}

/// Row-major `width x height` buffer of [`OutputPixel`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer {
    width: usize,
    height: usize,
    pixels: Vec<OutputPixel>,
}

impl OutputBuffer {
    /// Creates a buffer filled with [`OutputPixel::UNTOUCHED`].
    pub fn new(width: usize, height: usize) -> Result<Self, LicError> {
        if width == 0 || height == 0 {
            return Err(LicError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(LicError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![OutputPixel::UNTOUCHED; len],
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[OutputPixel] {
        &self.pixels
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> OutputPixel {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Resets every cell to [`OutputPixel::UNTOUCHED`].
    pub fn clear(&mut self) {
        self.pixels.fill(OutputPixel::UNTOUCHED);
    }

    /// Splits the buffer into disjoint bands of `rows` rows (the last may be
    /// shorter), each renderable from its own thread.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is 0.
    pub fn bands_mut(&mut self, rows: usize) -> impl Iterator<Item = OutputBand<'_>> {
        assert!(rows > 0, "band height must be non-zero");
        let width = self.width;
        self.pixels
            .chunks_mut(width.saturating_mul(rows))
            .enumerate()
            .map(move |(i, pixels)| OutputBand {
                y0: i * rows,
                width,
                pixels,
            })
    }

    pub(crate) fn as_band(&mut self) -> OutputBand<'_> {
        OutputBand {
            y0: 0,
            width: self.width,
            pixels: &mut self.pixels,
        }
    }
}

/// A run of full-width rows borrowed mutably from an [`OutputBuffer`].
#[derive(Debug)]
pub struct OutputBand<'a> {
    y0: usize,
    width: usize,
    pixels: &'a mut [OutputPixel],
}

impl OutputBand<'_> {
    /// Image row of the band's first row.
    pub fn y0(&self) -> usize {
        self.y0
    }

    /// Number of rows in the band.
    pub fn rows(&self) -> usize {
        self.pixels.len() / self.width
    }

    /// Row width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The rows covered by the band, as an image region.
    pub fn region(&self) -> Region {
        Region::new(0, self.y0, self.width, self.y0 + self.rows())
    }

    /// Mutable pixels of image row `y`, which must lie in the band.
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [OutputPixel] {
        let start = (y - self.y0) * self.width;
        &mut self.pixels[start..start + self.width]
    }
}
