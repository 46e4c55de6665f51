//! The per-pixel Line Integral Convolution kernel.
//!
//! For a start pixel the kernel traces a streamline forward and backward by
//! fixed unit-length Euler steps, samples the noise field at every visited
//! position and returns the (optionally windowed) mean of those samples.
//!
//! Each directional pass is a [`Streamline`] moving through three states:
//!
//! ```text
//!   Sampling --(zero / NaN / non-normalisable vector)--> Frozen
//!   Sampling | Frozen --(NaN noise or step budget spent)--> Terminated
//! ```
//!
//! `Frozen` is sticky for the rest of the pass: the streamline keeps moving in
//! its last valid direction, so paths run straight through holes and off the
//! field edge instead of stalling. `Terminated` is absorbing.
//!
//! The kernel is a pure function of the pixel position, the two read-only
//! fields and the parameters. Nothing is shared or mutated across pixels.

use glam::Vec2;

use crate::error::LicError;
use crate::grid::{is_degenerate, VectorField};
use crate::noise::NoiseField;
use crate::output::OutputPixel;
use crate::params::LicParams;
use crate::sampler::Interpolation;
use crate::window::WeightWindow;

/// State of one directional integration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// Reading a fresh direction from the field at every step.
    Sampling,
    /// Reusing the last valid direction until the pass ends.
    Frozen,
    /// No further steps.
    Terminated,
}

/// Which way a pass walks along the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Along the field direction; step indices `1, 2, ..`.
    Forward,
    /// Against the field direction; step indices `-1, -2, ..`.
    Backward,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// Signed window index of the `step`-th step (1-based) of this pass.
    pub fn step_index(self, step: usize) -> i64 {
        let step = step as i64;
        match self {
            Direction::Forward => step,
            Direction::Backward => -step,
        }
    }
}

/// Normalises `v`, or `None` if it is zero, infinite or NaN.
///
/// Scales by the largest component first so the squared length neither
/// overflows nor underflows for any finite non-zero input.
fn unit(v: Vec2) -> Option<Vec2> {
    let m = v.abs().max_element();
    if !(m > 0.0 && m.is_finite()) {
        return None;
    }
    let s = v / m;
    let u = s / s.length();
    u.is_finite().then_some(u)
}

/// One forward or backward pass of streamline integration.
#[derive(Debug, Clone)]
pub struct Streamline<'a> {
    field: VectorField<'a>,
    interpolation: Interpolation,
    position: Vec2,
    last_dir: Vec2,
    sign: f32,
    state: PassState,
}

impl<'a> Streamline<'a> {
    /// Starts a pass at `start`. `initial_dir` must be a unit vector; it is
    /// the fallback if the very first field sample is degenerate.
    pub fn new(
        field: VectorField<'a>,
        interpolation: Interpolation,
        start: Vec2,
        initial_dir: Vec2,
        direction: Direction,
    ) -> Self {
        Self {
            field,
            interpolation,
            position: start,
            last_dir: initial_dir,
            sign: direction.sign(),
            state: PassState::Sampling,
        }
    }

    /// Current state.
    pub fn state(&self) -> PassState {
        self.state
    }

    /// Current position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Last valid unit direction (before the pass sign is applied).
    pub fn direction(&self) -> Vec2 {
        self.last_dir
    }

    /// Takes one unit step and returns the new position, or `None` once
    /// terminated.
    pub fn advance(&mut self) -> Option<Vec2> {
        match self.state {
            PassState::Terminated => return None,
            PassState::Sampling => {
                let v = self
                    .field
                    .sample(self.position.x, self.position.y, self.interpolation);
                match unit(v) {
                    Some(dir) => self.last_dir = dir,
                    None => self.state = PassState::Frozen,
                }
            }
            PassState::Frozen => {}
        }
        self.position += self.last_dir * self.sign;
        Some(self.position)
    }

    /// Ends the pass.
    pub fn terminate(&mut self) {
        self.state = PassState::Terminated;
    }

    /// Positions visited by a pass of at most `steps` steps, `start` first.
    ///
    /// Only `start` is returned when the vector there has no direction.
    pub fn trace(
        field: VectorField<'a>,
        interpolation: Interpolation,
        start: Vec2,
        direction: Direction,
        steps: usize,
    ) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(steps + 1);
        points.push(start);
        let Some(dir) = unit(field.sample(start.x, start.y, interpolation)) else {
            return points;
        };
        let mut pass = Streamline::new(field, interpolation, start, dir, direction);
        points.extend((0..steps).map_while(|_| pass.advance()));
        points
    }
}

/// Running weighted sum of noise samples for one pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    /// Sum of `weight * value`.
    pub acc: f32,
    /// Sum of weights.
    pub weight_sum: f32,
    /// Number of samples added, whatever their weight.
    pub samples: usize,
}

impl Accumulator {
    /// Adds one weighted sample.
    pub fn add(&mut self, weight: f32, value: f32) {
        self.acc += weight * value;
        self.weight_sum += weight;
        self.samples += 1;
    }

    /// Resolves the pixel: the weighted mean if `window` deems the total
    /// valid, [`OutputPixel::MASKED`] otherwise.
    pub fn finish(&self, window: &WeightWindow) -> OutputPixel {
        if !window.is_valid(self.weight_sum, self.samples) {
            return OutputPixel::MASKED;
        }
        OutputPixel {
            value: (self.acc / self.weight_sum).clamp(0.0, 1.0),
            alpha: 1.0,
        }
    }
}

/// Computes one output pixel at `(x0, y0)`.
///
/// Does not validate `params`; `num_steps == 0` degenerates to the single
/// start sample, which the baseline threshold masks.
pub fn lic_pixel<N: NoiseField + ?Sized>(
    field: &VectorField<'_>,
    noise: &N,
    params: &LicParams,
    x0: f32,
    y0: f32,
) -> OutputPixel {
    let v0 = field.sample(x0, y0, params.interpolation);
    if is_degenerate(v0) {
        return OutputPixel::MASKED;
    }
    let Some(dir0) = unit(v0) else {
        return OutputPixel::MASKED;
    };

    let num_steps = params.num_steps;
    let window = &params.window;
    let start = Vec2::new(x0, y0);

    let mut acc = Accumulator::default();
    let centre = noise.sample(x0, y0);
    if !centre.is_nan() {
        acc.add(window.weight(0, num_steps), centre);
    }

    for direction in [Direction::Forward, Direction::Backward] {
        let mut pass = Streamline::new(*field, params.interpolation, start, dir0, direction);
        for step in 1..=num_steps {
            let Some(p) = pass.advance() else { break };
            let value = noise.sample(p.x, p.y);
            if value.is_nan() {
                pass.terminate();
                break;
            }
            acc.add(window.weight(direction.step_index(step), num_steps), value);
        }
    }

    acc.finish(window)
}

/// A validated render: vector field, noise and parameters bundled together.
///
/// `Lic` is `Sync` whenever the noise is, so one instance can serve many
/// threads rendering disjoint tiles.
pub struct Lic<'a, N: NoiseField + ?Sized> {
    field: VectorField<'a>,
    noise: &'a N,
    params: LicParams,
}

impl<'a, N: NoiseField + ?Sized> Lic<'a, N> {
    /// Validates `params` and binds the inputs.
    ///
    /// `noise` is normally `params.build_noise()`, but any [`NoiseField`] works.
    pub fn new(field: VectorField<'a>, noise: &'a N, params: LicParams) -> Result<Self, LicError> {
        params.validate()?;
        tracing::debug!(
            width = field.width(),
            height = field.height(),
            frequency = params.frequency,
            num_steps = params.num_steps,
            window = params.window.enabled,
            window_width = params.window.width,
            window_offset = params.window.offset,
            "lic render configured"
        );
        Ok(Self {
            field,
            noise,
            params,
        })
    }

    /// The bound vector field.
    pub fn field(&self) -> &VectorField<'a> {
        &self.field
    }

    /// The validated parameters.
    pub fn params(&self) -> &LicParams {
        &self.params
    }

    /// The pure per-pixel function.
    pub fn pixel(&self, x: usize, y: usize) -> OutputPixel {
        lic_pixel(&self.field, self.noise, &self.params, x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::noise::{CoherentNoise, TileNoise};

    /// Noise that returns `x + 1000 * y` scaled into [0, 1] so tests can tell
    /// exactly which positions were sampled.
    struct Probe;

    impl NoiseField for Probe {
        fn sample(&self, x: f32, y: f32) -> f32 {
            if !x.is_finite() || !y.is_finite() {
                return f32::NAN;
            }
            ((x + 100.0) + 1000.0 * (y + 100.0)) / 1e6
        }
    }

    /// Returns NaN at and beyond `x >= wall`.
    struct Wall {
        wall: f32,
    }

    impl NoiseField for Wall {
        fn sample(&self, x: f32, _y: f32) -> f32 {
            if x >= self.wall {
                f32::NAN
            } else {
                0.25
            }
        }
    }

    fn grids(w: usize, h: usize, ux: f32, uy: f32) -> (Grid, Grid) {
        (Grid::filled(w, h, ux).unwrap(), Grid::filled(w, h, uy).unwrap())
    }

    fn params(num_steps: usize) -> LicParams {
        LicParams {
            num_steps,
            ..LicParams::default()
        }
    }

    #[test]
    fn zero_start_vector_is_masked() {
        let (gx, gy) = grids(8, 8, 0.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let px = lic_pixel(&field, &Probe, &params(5), 3.0, 3.0);
        assert_eq!(px, OutputPixel::MASKED);
    }

    #[test]
    fn nan_start_vector_is_masked() {
        let (gx, gy) = grids(8, 8, f32::NAN, 1.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let px = lic_pixel(&field, &Probe, &params(5), 3.0, 3.0);
        assert_eq!(px, OutputPixel::MASKED);
    }

    #[test]
    fn infinite_start_vector_is_masked() {
        let (gx, gy) = grids(8, 8, f32::INFINITY, f32::INFINITY);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let px = lic_pixel(&field, &Probe, &params(5), 3.0, 3.0);
        assert_eq!(px, OutputPixel::MASKED);
    }

    #[test]
    fn uniform_horizontal_field_averages_the_row() {
        let (gx, gy) = grids(32, 32, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let noise = CoherentNoise::new(0.37, 5).unwrap();
        let (x, y) = (12.0, 9.0);

        let px = lic_pixel(&field, &noise, &params(5), x, y);

        // Same accumulation order as the kernel: centre, forward, backward.
        let mut sum = noise.sample(x, y);
        for i in 1..=5 {
            sum += noise.sample(x + i as f32, y);
        }
        for i in 1..=5 {
            sum += noise.sample(x - i as f32, y);
        }
        let expected = sum / 11.0;
        assert_eq!(px.alpha, 1.0);
        assert!(
            (px.value - expected).abs() < 1e-6,
            "expected {expected}, got {}",
            px.value
        );
    }

    #[test]
    fn scaled_vectors_give_the_same_result_as_unit_vectors() {
        let (ux, uy) = grids(16, 16, 0.0, 1.0);
        let (sx, sy) = grids(16, 16, 0.0, 42.0);
        let unit_field = VectorField::new(ux.view(), uy.view()).unwrap();
        let scaled_field = VectorField::new(sx.view(), sy.view()).unwrap();
        let a = lic_pixel(&unit_field, &Probe, &params(6), 4.0, 7.0);
        let b = lic_pixel(&scaled_field, &Probe, &params(6), 4.0, 7.0);
        assert_eq!(a, b);
    }

    #[test]
    fn extreme_but_finite_magnitudes_trace_like_unit_vectors() {
        let noise = CoherentNoise::new(0.37, 5).unwrap();
        let (ux, uy) = grids(16, 4, 1.0, 0.0);
        let unit_field = VectorField::new(ux.view(), uy.view()).unwrap();
        let reference = lic_pixel(&unit_field, &noise, &params(4), 5.0, 1.0);
        assert_eq!(reference.alpha, 1.0);

        for magnitude in [1e20_f32, 3e38, 1e-23, 1e-44] {
            let (gx, gy) = grids(16, 4, magnitude, 0.0);
            let field = VectorField::new(gx.view(), gy.view()).unwrap();
            let points = Streamline::trace(
                field,
                Interpolation::Nearest,
                Vec2::new(5.0, 1.0),
                Direction::Forward,
                4,
            );
            assert_eq!(
                points.last().copied(),
                Some(Vec2::new(9.0, 1.0)),
                "magnitude {magnitude}"
            );
            let px = lic_pixel(&field, &noise, &params(4), 5.0, 1.0);
            assert_eq!(px, reference, "magnitude {magnitude}");
        }
    }

    #[test]
    fn unit_rejects_zero_infinite_and_nan() {
        assert_eq!(unit(Vec2::ZERO), None);
        assert_eq!(unit(Vec2::new(f32::INFINITY, 1.0)), None);
        assert_eq!(unit(Vec2::new(f32::NAN, 1.0)), None);
        assert_eq!(unit(Vec2::new(0.0, -1e-30)), Some(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn zero_steps_masks_under_the_baseline_threshold() {
        let (gx, gy) = grids(4, 4, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let px = lic_pixel(&field, &Probe, &params(0), 1.0, 1.0);
        assert_eq!(px, OutputPixel::MASKED);
    }

    #[test]
    fn zero_steps_with_window_returns_the_start_sample() {
        let (gx, gy) = grids(4, 4, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let p = LicParams {
            num_steps: 0,
            window: WeightWindow::triangular(3, 0),
            ..LicParams::default()
        };
        let px = lic_pixel(&field, &Probe, &p, 1.0, 2.0);
        assert_eq!(px.alpha, 1.0);
        assert!((px.value - Probe.sample(1.0, 2.0)).abs() < 1e-7);
    }

    #[test]
    fn nan_noise_ends_the_pass_early() {
        let (gx, gy) = grids(32, 4, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        // Forward pass hits the wall after two steps; backward runs in full.
        let wall = Wall { wall: 13.0 };
        let p = params(5);

        let mut acc = Accumulator::default();
        acc.add(1.0, 0.25);
        for _ in 0..(2 + 5) {
            acc.add(1.0, 0.25);
        }
        let px = lic_pixel(&field, &wall, &p, 10.0, 1.0);
        assert_eq!(px, acc.finish(&p.window));
        assert_eq!(px.value, 0.25);
    }

    #[test]
    fn pixel_with_only_the_start_sample_is_masked() {
        let (gx, gy) = grids(8, 1, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        // Every step lands on NaN noise in both directions.
        struct OnlyCentre;
        impl NoiseField for OnlyCentre {
            fn sample(&self, x: f32, _y: f32) -> f32 {
                if x == 4.0 {
                    0.9
                } else {
                    f32::NAN
                }
            }
        }
        let px = lic_pixel(&field, &OnlyCentre, &params(5), 4.0, 0.0);
        assert_eq!(px, OutputPixel::MASKED);
    }

    #[test]
    fn nan_row_freezes_direction_and_keeps_going_straight() {
        // Diagonal flow in the top half, a NaN row at y = 4, zeros below.
        let w = 16;
        let h = 10;
        let mut gx = Grid::filled(w, h, 1.0).unwrap();
        let mut gy = Grid::filled(w, h, 1.0).unwrap();
        for x in 0..w {
            gx.set(x, 4, f32::NAN);
            gy.set(x, 4, f32::NAN);
            for y in 5..h {
                gx.set(x, y, 0.0);
                gy.set(x, y, 0.0);
            }
        }
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let start = Vec2::new(1.0, 1.0);
        let points = Streamline::trace(field, Interpolation::Nearest, start, Direction::Forward, 8);
        assert_eq!(points.len(), 9);
        let d = std::f32::consts::FRAC_1_SQRT_2;
        for (i, p) in points.iter().enumerate() {
            let expected = start + Vec2::splat(d) * i as f32;
            assert!(
                (*p - expected).length() < 1e-4,
                "step {i}: {p} vs {expected}"
            );
        }

        let noise = CoherentNoise::new(0.8, 2).unwrap();
        let px = lic_pixel(&field, &noise, &params(8), 1.0, 1.0);
        assert_eq!(px.alpha, 1.0);
        assert!(px.value.is_finite());
    }

    #[test]
    fn pass_state_machine_transitions() {
        let mut gx = Grid::filled(6, 1, 1.0).unwrap();
        let gy = Grid::filled(6, 1, 0.0).unwrap();
        gx.set(2, 0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let mut pass = Streamline::new(
            field,
            Interpolation::Nearest,
            Vec2::ZERO,
            Vec2::X,
            Direction::Forward,
        );
        assert_eq!(pass.state(), PassState::Sampling);
        assert_eq!(pass.advance(), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(pass.advance(), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(pass.state(), PassState::Sampling);
        // (2, 0) holds a zero vector.
        assert_eq!(pass.advance(), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(pass.state(), PassState::Frozen);
        // Frozen is sticky even though (3, 0) is valid again.
        assert_eq!(pass.advance(), Some(Vec2::new(4.0, 0.0)));
        assert_eq!(pass.state(), PassState::Frozen);
        pass.terminate();
        assert_eq!(pass.state(), PassState::Terminated);
        assert_eq!(pass.advance(), None);
        assert_eq!(pass.position(), Vec2::new(4.0, 0.0));
    }

    #[test]
    fn frozen_pass_keeps_its_last_direction_after_a_turn() {
        // Flow turns from +x to +y at column 3, then hits NaN at row 2.
        let w = 8;
        let h = 8;
        let mut gx = Grid::filled(w, h, 1.0).unwrap();
        let mut gy = Grid::filled(w, h, 0.0).unwrap();
        for y in 0..h {
            for x in 3..w {
                gx.set(x, y, 0.0);
                gy.set(x, y, 1.0);
            }
        }
        for x in 0..w {
            gx.set(x, 2, f32::NAN);
            gy.set(x, 2, f32::NAN);
        }
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let points = Streamline::trace(
            field,
            Interpolation::Nearest,
            Vec2::new(1.0, 0.0),
            Direction::Forward,
            6,
        );
        let expected = [
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (3.0, 2.0),
            (3.0, 3.0),
            (3.0, 4.0),
        ];
        let got: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn backward_pass_starts_from_the_initial_direction() {
        // Forward drifts into a +y region; the backward pass must still start
        // along -x from the start pixel.
        let mut gx = Grid::filled(12, 12, 1.0).unwrap();
        let mut gy = Grid::filled(12, 12, 0.0).unwrap();
        for y in 0..12 {
            for x in 7..12 {
                gx.set(x, y, 0.0);
                gy.set(x, y, 1.0);
            }
        }
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let back = Streamline::trace(
            field,
            Interpolation::Nearest,
            Vec2::new(5.0, 5.0),
            Direction::Backward,
            3,
        );
        let xs: Vec<f32> = back.iter().map(|p| p.x).collect();
        assert_eq!(xs, [5.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn streamline_leaving_the_field_follows_the_edge_vector() {
        let (gx, gy) = grids(4, 4, 0.0, -1.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let points = Streamline::trace(
            field,
            Interpolation::Nearest,
            Vec2::new(2.0, 1.0),
            Direction::Forward,
            4,
        );
        assert_eq!(points.last().copied(), Some(Vec2::new(2.0, -3.0)));
    }

    #[test]
    fn trace_from_degenerate_start_is_a_single_point() {
        let (gx, gy) = grids(4, 4, 0.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let points =
            Streamline::trace(field, Interpolation::Nearest, Vec2::ONE, Direction::Forward, 5);
        assert_eq!(points, vec![Vec2::ONE]);
    }

    #[test]
    fn windowed_steps_outside_the_band_are_ignored() {
        let (gx, gy) = grids(40, 3, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let p = LicParams {
            num_steps: 10,
            window: WeightWindow::triangular(3, 4),
            ..LicParams::default()
        };

        // Noise that differs only at steps more than 3 away from offset 4.
        struct Split {
            far: f32,
        }
        impl NoiseField for Split {
            fn sample(&self, x: f32, _y: f32) -> f32 {
                let step = x - 20.0;
                if (step - 4.0).abs() >= 3.0 {
                    self.far
                } else {
                    0.1 + 0.05 * step
                }
            }
        }
        let a = lic_pixel(&field, &Split { far: 0.0 }, &p, 20.0, 1.0);
        let b = lic_pixel(&field, &Split { far: 1.0 }, &p, 20.0, 1.0);
        assert_eq!(a.alpha, 1.0);
        assert_eq!(a.value.to_bits(), b.value.to_bits());
    }

    #[test]
    fn window_disabled_matches_plain_mean() {
        let mut gx = Grid::new(20, 20).unwrap();
        let mut gy = Grid::new(20, 20).unwrap();
        for y in 0..20 {
            for x in 0..20 {
                gx.set(x, y, (y as f32 - 10.0) * -1.0);
                gy.set(x, y, x as f32 - 10.0);
            }
        }
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let noise = TileNoise::new(1.0, 3).unwrap();
        let p = params(7);
        let px = lic_pixel(&field, &noise, &p, 4.0, 13.0);

        let start = Vec2::new(4.0, 13.0);
        let mut sum = noise.sample(4.0, 13.0);
        let mut count = 1.0_f32;
        for direction in [Direction::Forward, Direction::Backward] {
            let points = Streamline::trace(field, Interpolation::Nearest, start, direction, 7);
            for q in &points[1..] {
                sum += noise.sample(q.x, q.y);
                count += 1.0;
            }
        }
        assert_eq!(px.value.to_bits(), (sum / count).clamp(0.0, 1.0).to_bits());
    }

    #[test]
    fn lic_new_rejects_invalid_params() {
        let (gx, gy) = grids(4, 4, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let noise = CoherentNoise::new(1.0, 0).unwrap();
        let result = Lic::new(field, &noise, params(0));
        assert!(matches!(result, Err(LicError::InvalidParameter { .. })));
    }

    #[test]
    fn lic_accepts_boxed_dyn_noise() {
        let (gx, gy) = grids(4, 4, 1.0, 0.0);
        let field = VectorField::new(gx.view(), gy.view()).unwrap();
        let p = params(3);
        let noise = p.build_noise().unwrap();
        let lic = Lic::new(field, noise.as_ref(), p).unwrap();
        assert_eq!(lic.pixel(1, 1).alpha, 1.0);
        assert_eq!(lic.params().num_steps, 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn component() -> impl Strategy<Value = f32> {
            prop_oneof![
                4 => -2.0_f32..2.0,
                1 => Just(0.0_f32),
                1 => Just(f32::NAN),
            ]
        }

        proptest! {
            #[test]
            fn output_is_in_range_or_masked(
                cells in prop::collection::vec((component(), component()), 36),
                x in 0_usize..6,
                y in 0_usize..6,
                num_steps in 1_usize..20,
                windowed in any::<bool>(),
                offset in -30_i64..30,
            ) {
                let gx = Grid::from_data(6, 6, cells.iter().map(|c| c.0).collect()).unwrap();
                let gy = Grid::from_data(6, 6, cells.iter().map(|c| c.1).collect()).unwrap();
                let field = VectorField::new(gx.view(), gy.view()).unwrap();
                let noise = CoherentNoise::new(0.5, 1).unwrap();
                let p = LicParams {
                    num_steps,
                    window: if windowed {
                        WeightWindow::triangular(3, offset)
                    } else {
                        WeightWindow::disabled()
                    },
                    ..LicParams::default()
                };
                let px = lic_pixel(&field, &noise, &p, x as f32, y as f32);
                if px.alpha == 1.0 {
                    prop_assert!((0.0..=1.0).contains(&px.value), "value {}", px.value);
                } else {
                    prop_assert_eq!(px, OutputPixel::MASKED);
                }
                let (cx, cy) = cells[y * 6 + x];
                if cx == 0.0 && cy == 0.0 {
                    prop_assert_eq!(px, OutputPixel::MASKED);
                }
            }

            #[test]
            fn kernel_is_deterministic(
                ux in -3.0_f32..3.0,
                uy in -3.0_f32..3.0,
                seed: u32,
            ) {
                let (gx, gy) = grids(10, 10, ux, uy);
                let field = VectorField::new(gx.view(), gy.view()).unwrap();
                let a = CoherentNoise::new(1.3, seed).unwrap();
                let b = CoherentNoise::new(1.3, seed).unwrap();
                let p = params(9);
                let pa = lic_pixel(&field, &a, &p, 5.0, 5.0);
                let pb = lic_pixel(&field, &b, &p, 5.0, 5.0);
                prop_assert_eq!(pa.value.to_bits(), pb.value.to_bits());
                prop_assert_eq!(pa.alpha.to_bits(), pb.alpha.to_bits());
            }
        }
    }
}
