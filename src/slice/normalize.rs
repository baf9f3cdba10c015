//! Intensity windowing: discovering the value range of a slice and
//! rescaling its samples into `[0, 1]`.

/// Pixel stride of the coarse range discovery pass, on both axes.
pub const COARSE_STEP: usize = 10;
/// Fewer valid samples than this in the coarse pass triggers a dense pass.
pub const MIN_COARSE_SAMPLES: usize = 10;
/// Range assumed when a slice holds no valid sample at all.
pub const DEFAULT_RANGE: (f64, f64) = (0., 255.);

/// The intensity range a slice is normalized against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntensityRange {
    /// Valid samples span `min..=max`, with `min < max`.
    Span {
        /// Lowest valid sample.
        min: f64,
        /// Highest valid sample.
        max: f64,
    },
    /// Every valid sample holds the same value; shown as mid-gray.
    Constant(f64),
    /// No valid sample was found; `DEFAULT_RANGE` is used.
    Default,
}

impl IntensityRange {
    /// Lower and upper bounds of the window.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            IntensityRange::Span { min, max } => (min, max),
            IntensityRange::Constant(v) => (v, v),
            IntensityRange::Default => DEFAULT_RANGE,
        }
    }

    /// Map a raw value into `[0, 1]`. NaN maps to 0.
    pub fn normalize(&self, value: f64) -> f32 {
        if value.is_nan() {
            return 0.;
        }
        let (min, max) = match *self {
            IntensityRange::Constant(_) => return 0.5,
            IntensityRange::Span { min, max } => (min, max),
            IntensityRange::Default => DEFAULT_RANGE,
        };
        let range = if max - min == 0. { 1. } else { max - min };
        ((value - min) / range).max(0.).min(1.) as f32
    }
}

#[derive(Debug)]
struct RangeAcc {
    min: f64,
    max: f64,
    count: usize,
}

impl RangeAcc {
    fn new() -> Self {
        RangeAcc {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    fn push(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.min = self.min.min(v);
        self.max = self.max.max(v);
        self.count += 1;
    }

    fn finish(self) -> IntensityRange {
        if self.count == 0 {
            IntensityRange::Default
        } else if self.min == self.max {
            IntensityRange::Constant(self.min)
        } else {
            IntensityRange::Span {
                min: self.min,
                max: self.max,
            }
        }
    }
}

fn scan<F>(width: usize, height: usize, step: usize, sample: &F) -> RangeAcc
where
    F: Fn(usize, usize) -> Option<f64>,
{
    let mut acc = RangeAcc::new();
    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            if let Some(v) = sample(x, y) {
                acc.push(v);
            }
        }
    }
    acc
}

/// Find the intensity range of a `width × height` slice. Every 10th pixel
/// is sampled on both axes first; if that yields fewer than 10 valid
/// (in-range, finite) values, every pixel is visited.
///
/// Returns the range and the number of samples it was computed from.
pub fn discover_range<F>(width: usize, height: usize, sample: F) -> (IntensityRange, usize)
where
    F: Fn(usize, usize) -> Option<f64>,
{
    let mut acc = scan(width, height, COARSE_STEP, &sample);
    if acc.count < MIN_COARSE_SAMPLES {
        acc = scan(width, height, 1, &sample);
    }
    let count = acc.count;
    (acc.finish(), count)
}
