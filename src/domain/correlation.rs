//! Pearson correlation between pH and the other time-series columns.

use serde::{Serialize, Serializer};
use std::fmt;

use super::sensor::TimeSeriesSample;

/// A correlation coefficient, or the explicit absence of one when either
/// column has no variance or there are fewer than two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined(v) => Some(*v),
            Correlation::Undefined => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Defined(v) => write!(f, "{}", v),
            Correlation::Undefined => write!(f, "undefined"),
        }
    }
}

impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Correlation::Defined(v) => serializer.serialize_f64(*v),
            Correlation::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

// Checked on the raw values: the mean of a constant column such as 6.1 is
// off by a few ulps, which leaves a tiny nonzero variance.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Pearson correlation of two equally long columns.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Correlation {
    let n = xs.len().min(ys.len());
    if n < 2 || is_constant(&xs[..n]) || is_constant(&ys[..n]) {
        return Correlation::Undefined;
    }

    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return Correlation::Undefined;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Correlation::Defined(r.clamp(-1.0, 1.0))
    } else {
        Correlation::Undefined
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Treatment {
    Tr1,
    Tr2,
    Tr3,
}

impl Treatment {
    pub const ALL: [Treatment; 3] = [Treatment::Tr1, Treatment::Tr2, Treatment::Tr3];

    pub fn name(&self) -> &'static str {
        match self {
            Treatment::Tr1 => "Tr1",
            Treatment::Tr2 => "Tr2",
            Treatment::Tr3 => "Tr3",
        }
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Correlation of pH against Temp and each treatment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationSet {
    pub temp: Correlation,
    pub tr1: Correlation,
    pub tr2: Correlation,
    pub tr3: Correlation,
}

impl CorrelationSet {
    pub fn from_series(series: &[TimeSeriesSample]) -> Self {
        let ph: Vec<f64> = series.iter().map(|s| s.ph).collect();
        let column = |f: fn(&TimeSeriesSample) -> f64| series.iter().map(f).collect::<Vec<_>>();

        Self {
            temp: pearson(&column(|s| s.temp), &ph),
            tr1: pearson(&column(|s| s.tr1), &ph),
            tr2: pearson(&column(|s| s.tr2), &ph),
            tr3: pearson(&column(|s| s.tr3), &ph),
        }
    }

    pub fn treatment(&self, treatment: Treatment) -> Correlation {
        match treatment {
            Treatment::Tr1 => self.tr1,
            Treatment::Tr2 => self.tr2,
            Treatment::Tr3 => self.tr3,
        }
    }

    /// Treatment with the highest defined correlation to pH. Ties keep the
    /// earlier treatment.
    pub fn strongest_treatment(&self) -> Option<(Treatment, f64)> {
        Treatment::ALL
            .iter()
            .filter_map(|t| self.treatment(*t).value().map(|v| (*t, v)))
            .fold(None, |best, (t, v)| match best {
                Some((_, best_v)) if best_v >= v => best,
                _ => Some((t, v)),
            })
    }
}
