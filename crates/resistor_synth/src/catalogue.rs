//! E-series catalogue generation (IEC 60063 preferred numbers).

use crate::error::SynthesisError;

/// Base E24 mantissas, one decade starting at ten.
///
/// `E3`, `E6` and `E12` are regular decimations of this table (stride
/// `24 / k`), not independently tabulated: the historical values here (e.g.
/// `27` rather than the pure-geometric `26.1`) are exactly what E6/E12
/// inherit.
const E24: [f64; 24] = [
    10.0, 11.0, 12.0, 13.0, 15.0, 16.0, 18.0, 20.0, 22.0, 24.0, 27.0, 30.0, 33.0, 36.0, 39.0, 43.0,
    47.0, 51.0, 56.0, 62.0, 68.0, 75.0, 82.0, 91.0,
];

/// Base E192 mantissas, one decade starting at ten.
///
/// `E48` and `E96` are regular decimations of this table (stride `192 / k`).
const E192: [f64; 192] = [
    10.0, 10.1, 10.2, 10.4, 10.5, 10.6, 10.7, 10.9, 11.0, 11.1, 11.3, 11.4, 11.5, 11.7, 11.8, 12.0,
    12.1, 12.3, 12.4, 12.6, 12.7, 12.9, 13.0, 13.2, 13.3, 13.5, 13.7, 13.8, 14.0, 14.2, 14.3, 14.5,
    14.7, 14.9, 15.0, 15.2, 15.4, 15.6, 15.8, 16.0, 16.2, 16.4, 16.5, 16.7, 16.9, 17.2, 17.4, 17.6,
    17.8, 18.0, 18.2, 18.4, 18.7, 18.9, 19.1, 19.3, 19.6, 19.8, 20.0, 20.3, 20.5, 20.8, 21.0, 21.3,
    21.5, 21.8, 22.1, 22.3, 22.6, 22.9, 23.2, 23.4, 23.7, 24.0, 24.3, 24.6, 24.9, 25.2, 25.5, 25.8,
    26.1, 26.4, 26.7, 27.1, 27.4, 27.7, 28.0, 28.4, 28.7, 29.1, 29.4, 29.8, 30.1, 30.5, 30.9, 31.2,
    31.6, 32.0, 32.4, 32.8, 33.2, 33.6, 34.0, 34.4, 34.8, 35.2, 35.7, 36.1, 36.5, 37.0, 37.4, 37.9,
    38.3, 38.8, 39.2, 39.7, 40.2, 40.7, 41.2, 41.7, 42.2, 42.7, 43.2, 43.7, 44.2, 44.8, 45.3, 45.9,
    46.4, 47.0, 47.5, 48.1, 48.7, 49.3, 49.9, 50.5, 51.1, 51.7, 52.3, 53.0, 53.6, 54.2, 54.9, 55.6,
    56.2, 56.9, 57.6, 58.3, 59.0, 59.7, 60.4, 61.2, 61.9, 62.6, 63.4, 64.2, 64.9, 65.7, 66.5, 67.3,
    68.1, 69.0, 69.8, 70.6, 71.5, 72.3, 73.2, 74.1, 75.0, 75.9, 76.8, 77.7, 78.7, 79.6, 80.6, 81.6,
    82.5, 83.5, 84.5, 85.6, 86.6, 87.6, 88.7, 89.8, 90.9, 91.9, 93.1, 94.2, 95.3, 96.5, 97.6, 98.8,
];

/// A named E-series, or an explicit mantissa list supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    E3,
    E6,
    E12,
    E24,
    E48,
    E96,
    E192,
    /// An explicit one-decade mantissa list, in the same convention as
    /// [`E24`]/[`E192`] (starting near ten, strictly ascending).
    Custom(Vec<f64>),
}

impl Series {
    /// Parses one of the seven standard series names (case-insensitive).
    /// Anything else is an `InvalidConfiguration` error, per §7.
    pub fn parse(name: &str) -> Result<Self, SynthesisError> {
        match name.to_ascii_uppercase().as_str() {
            "E3" => Ok(Series::E3),
            "E6" => Ok(Series::E6),
            "E12" => Ok(Series::E12),
            "E24" => Ok(Series::E24),
            "E48" => Ok(Series::E48),
            "E96" => Ok(Series::E96),
            "E192" => Ok(Series::E192),
            other => Err(SynthesisError::InvalidConfiguration(format!(
                "unknown series '{other}'"
            ))),
        }
    }

    /// The one-decade base mantissa list for this series.
    fn base_mantissas(&self) -> Vec<f64> {
        match self {
            Series::E3 => decimate(&E24, 3),
            Series::E6 => decimate(&E24, 6),
            Series::E12 => decimate(&E24, 12),
            Series::E24 => E24.to_vec(),
            Series::E48 => decimate(&E192, 48),
            Series::E96 => decimate(&E192, 96),
            Series::E192 => E192.to_vec(),
            Series::Custom(values) => values.clone(),
        }
    }
}

/// Keeps every `len(table) / k`-th entry of `table`, starting at index zero.
fn decimate(table: &[f64], k: usize) -> Vec<f64> {
    debug_assert!(k > 0 && table.len() % k == 0);
    let stride = table.len() / k;
    table.iter().copied().step_by(stride).collect()
}

/// Generates the ordered catalogue of available values for `series` across
/// the band `[min_value, max_value]`.
///
/// The base mantissa list is multiplied by successive powers of ten, both up
/// and down from its home decade, until the band is exceeded on both sides,
/// then filtered to the band. The result is strictly ascending and free of
/// duplicates.
pub fn generate(series: &Series, min_value: f64, max_value: f64) -> Result<Vec<f64>, SynthesisError> {
    if min_value > max_value {
        return Err(SynthesisError::InvalidRange {
            min: min_value,
            max: max_value,
        });
    }

    let base = series.base_mantissas();
    if base.is_empty() {
        return Ok(Vec::new());
    }

    let mut values = Vec::new();

    // Home decade and upward.
    let mut multiplier = 1.0;
    loop {
        let smallest = base[0] * multiplier;
        values.extend(base.iter().map(|m| m * multiplier));
        if smallest > max_value {
            break;
        }
        multiplier *= 10.0;
    }

    // Downward from the home decade.
    let mut divider = 10.0;
    loop {
        let largest = base[base.len() - 1] / divider;
        if largest < min_value {
            break;
        }
        values.extend(base.iter().map(|m| m / divider));
        divider *= 10.0;
    }

    values.retain(|v| *v >= min_value && *v <= max_value);
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    Ok(values)
}
