//! Vector sources: analytic and noise-driven 2D fields to feed the LIC core.
//!
//! A [`VectorSource`] returns a vector at any point of the plane.
//! [`rasterize`] samples one at every pixel centre and splits the result into
//! the X and Y component grids the core consumes.
//!
//! Every source is deterministic. Analytic sources return the zero vector at
//! their singular point, which the kernel renders as a masked pixel.

use glam::Vec2;
use lic_core::{Grid, LicError};
use noise::{NoiseFn, Perlin};

/// A source of 2D vectors.
pub trait VectorSource: Send + Sync {
    /// Vector at `(x, y)` in pixel coordinates.
    fn sample(&self, x: f32, y: f32) -> Vec2;
}

/// Distances below this count as the singular point.
const SINGULARITY_EPS: f32 = 1e-6;

/// Offset between the two noise lookups of [`PerlinFlow`].
const COMPONENT_OFFSET: f64 = 100.0;

/// The same vector everywhere.
pub struct Uniform {
    pub direction: Vec2,
}

/// Circular flow around `center`, counter-clockwise for positive strength.
pub struct Vortex {
    pub center: Vec2,
    pub strength: f32,
}

/// Radial flow toward `center`; a negative strength makes it a source.
pub struct Attractor {
    pub center: Vec2,
    pub strength: f32,
}

/// Hyperbolic flow `(dx, -dy)` around `center`.
pub struct Saddle {
    pub center: Vec2,
}

/// Two offset Perlin samples used as the X and Y components.
pub struct PerlinFlow {
    noise: Perlin,
    scale: f64,
    strength: f32,
}

/// Curl of a scalar Perlin field: divergence-free swirls.
pub struct CurlFlow {
    noise: Perlin,
    scale: f64,
    strength: f32,
    eps: f64,
}

/// Wraps another source and returns NaN inside a disc.
///
/// Streamlines entering the hole freeze, which exercises the kernel's
/// handling of missing data.
pub struct Punctured {
    inner: Box<dyn VectorSource>,
    center: Vec2,
    radius: f32,
}

/// Sum of several sources.
pub struct Composite {
    sources: Vec<Box<dyn VectorSource>>,
}

impl PerlinFlow {
    pub fn new(scale: f64, strength: f32, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            strength,
        }
    }
}

impl CurlFlow {
    /// Creates a curl source with a finite-difference epsilon of 0.001.
    pub fn new(scale: f64, strength: f32, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
            strength,
            eps: 0.001,
        }
    }
}

impl Punctured {
    pub fn new(inner: Box<dyn VectorSource>, center: Vec2, radius: f32) -> Self {
        Self {
            inner,
            center,
            radius,
        }
    }
}

impl Composite {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a source to the composite (builder pattern).
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, source: Box<dyn VectorSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorSource for Uniform {
    fn sample(&self, _x: f32, _y: f32) -> Vec2 {
        self.direction
    }
}

impl VectorSource for Vortex {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        let r = Vec2::new(x, y) - self.center;
        let dist = r.length();
        if dist < SINGULARITY_EPS {
            return Vec2::ZERO;
        }
        r.perp() / dist * self.strength
    }
}

impl VectorSource for Attractor {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        let toward = self.center - Vec2::new(x, y);
        let dist = toward.length();
        if dist < SINGULARITY_EPS {
            return Vec2::ZERO;
        }
        toward / dist * self.strength
    }
}

impl VectorSource for Saddle {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        let r = Vec2::new(x, y) - self.center;
        Vec2::new(r.x, -r.y)
    }
}

impl VectorSource for PerlinFlow {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        let sx = f64::from(x) * self.scale;
        let sy = f64::from(y) * self.scale;
        let dx = self.noise.get([sx, sy]);
        let dy = self
            .noise
            .get([sx + COMPONENT_OFFSET, sy + COMPONENT_OFFSET]);
        Vec2::new(dx as f32, dy as f32) * self.strength
    }
}

impl VectorSource for CurlFlow {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        let sx = f64::from(x) * self.scale;
        let sy = f64::from(y) * self.scale;
        let eps = self.eps * self.scale;
        if eps.abs() < f64::from(SINGULARITY_EPS) {
            return Vec2::ZERO;
        }
        // curl F = (dF/dy, -dF/dx)
        let df_dy =
            (self.noise.get([sx, sy + eps]) - self.noise.get([sx, sy - eps])) / (2.0 * eps);
        let df_dx =
            (self.noise.get([sx + eps, sy]) - self.noise.get([sx - eps, sy])) / (2.0 * eps);
        Vec2::new(df_dy as f32, -df_dx as f32) * self.strength
    }
}

impl VectorSource for Punctured {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        if Vec2::new(x, y).distance(self.center) < self.radius {
            return Vec2::NAN;
        }
        self.inner.sample(x, y)
    }
}

impl VectorSource for Composite {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        self.sources
            .iter()
            .fold(Vec2::ZERO, |acc, s| acc + s.sample(x, y))
    }
}

impl<S: VectorSource + ?Sized> VectorSource for Box<S> {
    fn sample(&self, x: f32, y: f32) -> Vec2 {
        (**self).sample(x, y)
    }
}

/// Samples `source` at every pixel and returns the `(x, y)` component grids.
pub fn rasterize<S: VectorSource + ?Sized>(
    source: &S,
    width: usize,
    height: usize,
) -> Result<(Grid, Grid), LicError> {
    let mut gx = Grid::new(width, height)?;
    let mut gy = Grid::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let v = source.sample(x as f32, y as f32);
            let i = y * width + x;
            gx.data_mut()[i] = v.x;
            gy.data_mut()[i] = v.y;
        }
    }
    Ok((gx, gy))
}
