/// Interpolation family of a subfunction, with its on-disk discriminant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DegreeKind {
    Linear = 0,
    Quadratic = 1,
    Cubic = 2,
    Quartic = 3,
    Quintic = 4,
    Sinusoidal = 5,
    Plateau = 6,
    ToZero = 7,
    Freeform = 8,
}

impl DegreeKind {
    pub const ALL: [DegreeKind; 9] = [
        DegreeKind::Linear,
        DegreeKind::Quadratic,
        DegreeKind::Cubic,
        DegreeKind::Quartic,
        DegreeKind::Quintic,
        DegreeKind::Sinusoidal,
        DegreeKind::Plateau,
        DegreeKind::ToZero,
        DegreeKind::Freeform,
    ];

    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| *kind as i32 == value)
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Bezier control point of a freeform curve, both coordinates in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlPoint {
    pub x: f32,
    pub y: f32,
}

impl ControlPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Freeform shape: a cubic Bezier from (0, 0) to (1, 1) resampled into a
/// table of evenly spaced outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Freeform {
    points: [ControlPoint; 2],
    values: Vec<f32>,
}

impl Freeform {
    pub const DEFAULT_POINTS: [ControlPoint; 2] =
        [ControlPoint::new(0.3, 0.0), ControlPoint::new(0.7, 1.0)];

    const SAMPLES: usize = 100;

    pub fn new(points: [ControlPoint; 2]) -> Self {
        let mut freeform = Self {
            points,
            values: Vec::with_capacity(Self::SAMPLES + 1),
        };
        freeform.rebuild();
        freeform
    }

    pub fn points(&self) -> [ControlPoint; 2] {
        self.points
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Walks the curve parameter with one Newton step per sample so that the
    /// x coordinate advances by `1 / SAMPLES` each time.
    fn rebuild(&mut self) {
        let [p0, p1] = self.points;
        self.values.clear();

        let mut t = 0.0f32;
        let mut next_x = 0.0f32;
        for _ in 0..Self::SAMPLES {
            self.values.push(bezier3(t, 0.0, p0.y, p1.y, 1.0));

            next_x += 0.01;
            let got_x = bezier3(t, 0.0, p0.x, p1.x, 1.0);
            t += (next_x - got_x) / (3.0 * bezier2(t, p0.x, p1.x - p0.x, 1.0 - p1.x));
        }
        self.values.push(1.0);
    }

    /// Piecewise-linear lookup at normalized position `x`.
    pub fn sample(&self, x: f32, sym_arg: f32, y_start: f32) -> f32 {
        let count = self.values.len();
        let scaled = x * (count as f32 - 2.0);
        let index = (scaled.floor() + 0.01) as i32;
        let frac = scaled - scaled.floor();

        let at = |i: i32| -> f32 {
            let i = i.clamp(0, count as i32 - 1) as usize;
            self.values[i]
        };

        if index == count as i32 - 1 {
            frac * sym_arg * at(index) + y_start
        } else {
            (1.0 - frac) * sym_arg * at(index) + frac * sym_arg * at(index + 1) + y_start
        }
    }
}

impl Default for Freeform {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POINTS)
    }
}

fn bezier2(t: f32, a: f32, b: f32, c: f32) -> f32 {
    let u = 1.0 - t;
    u * u * a + 2.0 * t * u * b + t * t * c
}

fn bezier3(t: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * a + 3.0 * t * u * u * b + 3.0 * t * t * u * c + t * t * t * d
}

/// Interpolation family together with the shape parameter it owns.
///
/// `arg1` means something different per family: lead-in/lead-out bias for
/// quadratic, asymmetry for quartic, skew for quintic, sharpness for
/// plateau. For tozero it is the roll slope recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Degree {
    Linear,
    Quadratic { arg1: f32 },
    Cubic,
    Quartic { arg1: f32 },
    Quintic { arg1: f32 },
    Sinusoidal,
    Plateau { arg1: f32 },
    ToZero { arg1: f32 },
    Freeform(Freeform),
}

impl Degree {
    /// Family defaults applied when switching to `kind`. Quadratic and tozero
    /// keep the previous shape parameter.
    pub fn with_defaults(kind: DegreeKind, previous_arg1: f32) -> Self {
        match kind {
            DegreeKind::Linear => Degree::Linear,
            DegreeKind::Quadratic => Degree::Quadratic {
                arg1: previous_arg1,
            },
            DegreeKind::Cubic => Degree::Cubic,
            DegreeKind::Quartic => Degree::Quartic { arg1: -10.0 },
            DegreeKind::Quintic => Degree::Quintic { arg1: 0.0 },
            DegreeKind::Sinusoidal => Degree::Sinusoidal,
            DegreeKind::Plateau => Degree::Plateau { arg1: 1.0 },
            DegreeKind::ToZero => Degree::ToZero {
                arg1: previous_arg1,
            },
            DegreeKind::Freeform => Degree::Freeform(Freeform::default()),
        }
    }

    /// Rebuilds a degree from a stored `(kind, arg1)` pair without applying
    /// family defaults.
    pub fn from_stored(kind: DegreeKind, arg1: f32) -> Self {
        match kind {
            DegreeKind::Linear => Degree::Linear,
            DegreeKind::Quadratic => Degree::Quadratic { arg1 },
            DegreeKind::Cubic => Degree::Cubic,
            DegreeKind::Quartic => Degree::Quartic { arg1 },
            DegreeKind::Quintic => Degree::Quintic { arg1 },
            DegreeKind::Sinusoidal => Degree::Sinusoidal,
            DegreeKind::Plateau => Degree::Plateau { arg1 },
            DegreeKind::ToZero => Degree::ToZero { arg1 },
            DegreeKind::Freeform => Degree::Freeform(Freeform::default()),
        }
    }

    pub fn kind(&self) -> DegreeKind {
        match self {
            Degree::Linear => DegreeKind::Linear,
            Degree::Quadratic { .. } => DegreeKind::Quadratic,
            Degree::Cubic => DegreeKind::Cubic,
            Degree::Quartic { .. } => DegreeKind::Quartic,
            Degree::Quintic { .. } => DegreeKind::Quintic,
            Degree::Sinusoidal => DegreeKind::Sinusoidal,
            Degree::Plateau { .. } => DegreeKind::Plateau,
            Degree::ToZero { .. } => DegreeKind::ToZero,
            Degree::Freeform(_) => DegreeKind::Freeform,
        }
    }

    /// Shape parameter, `0.0` for families that have none.
    pub fn arg1(&self) -> f32 {
        match *self {
            Degree::Quadratic { arg1 }
            | Degree::Quartic { arg1 }
            | Degree::Quintic { arg1 }
            | Degree::Plateau { arg1 }
            | Degree::ToZero { arg1 } => arg1,
            Degree::Linear | Degree::Cubic | Degree::Sinusoidal | Degree::Freeform(_) => 0.0,
        }
    }

    /// Sets the shape parameter. Returns `false` for families without one.
    pub fn set_arg1(&mut self, value: f32) -> bool {
        match self {
            Degree::Quadratic { arg1 }
            | Degree::Quartic { arg1 }
            | Degree::Quintic { arg1 }
            | Degree::Plateau { arg1 }
            | Degree::ToZero { arg1 } => {
                *arg1 = value;
                true
            }
            Degree::Linear | Degree::Cubic | Degree::Sinusoidal | Degree::Freeform(_) => false,
        }
    }

    /// Whether the curve returns to its start value at the end of the segment.
    pub fn is_symmetric(&self) -> bool {
        match *self {
            Degree::Quadratic { arg1 } => arg1.abs() < 0.5,
            Degree::Quartic { arg1 } => arg1 < 0.0,
            Degree::Quintic { arg1 } => arg1.abs() > 0.005,
            Degree::Plateau { .. } => true,
            _ => false,
        }
    }
}

/// Peak of `x²(x-1)²(x - a)` on `[0, 1]` for the skewed quintic bump, `a = arg1 / 10`.
pub(super) fn quintic_peak(arg1: f32) -> f32 {
    let a = f64::from(arg1) / 10.0;
    if arg1 < 0.0 {
        let s = a.abs();
        let root = -(9.0 + s * (-16.0 + 16.0 * s)).sqrt();
        (0.01728
            + 0.00576 * root
            + s * (-0.0288 - 0.00448 * root
                + s * (0.0032 - 0.00576 * root
                    + s * (-0.0704 + 0.02048 * root + s * (0.1024 - 0.01024 * root + a * 0.04096)))))
            as f32
    } else {
        let root = (9.0 + a * (-16.0 + 16.0 * a)).sqrt();
        (0.01728
            + 0.00576 * root
            + a * (-0.0288 - 0.00448 * root
                + a * (0.0032 - 0.00576 * root
                    + a * (-0.0704 + 0.02048 * root + a * (0.1024 - 0.01024 * root - a * 0.04096)))))
            as f32
    }
}
