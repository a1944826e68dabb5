//! Scientific/metric number formatting for expression leaves (§4.6, §6).
//!
//! This is the one piece of the otherwise out-of-scope CLI/display layer
//! that the engine itself depends on, since `Expression`'s `Display`
//! contract is defined in terms of it.

/// How a rendered mantissa's exponent is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// A metric-prefix letter (`y z a f p n µ m k M G T P E Z Y`), falling
    /// back to engineering automatically when `|exponent| > 24`.
    Metric,
    /// An exponent that is always a multiple of three, in the form `e±NN`.
    Engineering,
    /// Any exponent, in the form `e±NN`.
    Scientific,
}

const METRIC_PREFIXES: &[(i32, &str)] = &[
    (-24, "y"),
    (-21, "z"),
    (-18, "a"),
    (-15, "f"),
    (-12, "p"),
    (-9, "n"),
    (-6, "µ"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
    (15, "P"),
    (18, "E"),
    (21, "Z"),
    (24, "Y"),
];

/// Rounds `value_abs` (assumed positive) to `sig_figs` significant decimal
/// digits, half-up, returning the rounded mantissa as an integer with
/// exactly `sig_figs` digits together with its base-ten exponent (the
/// exponent of the rounded value's leading digit; rounding that carries
/// into an extra digit, e.g. `9.96 -> 10.0`, bumps the exponent).
fn round_to_sig_figs(value_abs: f64, sig_figs: u8) -> (u64, i32) {
    let mut raw_exponent = value_abs.log10().floor() as i32;
    // `log10` can land a hair to the wrong side of a power-of-ten boundary
    // (e.g. 0.001 -> -2.9999999999999996); correct by direct comparison.
    while value_abs / 10f64.powi(raw_exponent) >= 10.0 {
        raw_exponent += 1;
    }
    while value_abs / 10f64.powi(raw_exponent) < 1.0 {
        raw_exponent -= 1;
    }
    let scale = 10f64.powi(sig_figs as i32 - 1 - raw_exponent);
    let mut mantissa_int = (value_abs * scale + 0.5).floor() as u64;
    let mut exponent = raw_exponent;
    let upper = 10u64.pow(sig_figs as u32);
    if mantissa_int >= upper {
        mantissa_int /= 10;
        exponent += 1;
    }
    (mantissa_int, exponent)
}

/// The largest multiple of three not exceeding `exponent`.
fn engineering_exponent(exponent: i32) -> i32 {
    exponent.div_euclid(3) * 3
}

/// Renders a mantissa integer (`sig_figs` digits) with the decimal point
/// placed after `digits_before_point` digits. Pads with trailing zeros if
/// `digits_before_point` exceeds `sig_figs` (coarser group than the
/// requested precision can express, e.g. 1 significant figure grouped to
/// an engineering exponent three decades wide).
fn place_decimal_point(mantissa_int: u64, sig_figs: u8, digits_before_point: i32) -> String {
    let digits = format!("{:0width$}", mantissa_int, width = sig_figs as usize);
    let digits_before_point = digits_before_point as usize;
    if digits_before_point >= digits.len() {
        let mut s = digits;
        s.extend(std::iter::repeat_n('0', digits_before_point - s.len()));
        s
    } else if digits_before_point == 0 {
        format!("0.{digits}")
    } else {
        let (head, tail) = digits.split_at(digits_before_point);
        format!("{head}.{tail}")
    }
}

fn exponent_suffix(exponent: i32) -> String {
    format!("e{}{:02}", if exponent >= 0 { "+" } else { "-" }, exponent.abs())
}

/// Formats `value` with `sig_figs` significant figures in the given style.
///
/// Rounding is always half-up at the requested significance (§6).
pub fn format_value(value: f64, sig_figs: u8, style: NumberStyle) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    let value_abs = value.abs();

    let (mantissa_int, raw_exponent) = round_to_sig_figs(value_abs, sig_figs);

    match style {
        NumberStyle::Scientific => {
            let digits = place_decimal_point(mantissa_int, sig_figs, 1);
            format!("{sign}{digits}{}", exponent_suffix(raw_exponent))
        }
        NumberStyle::Engineering => {
            let target = engineering_exponent(raw_exponent);
            let digits = place_decimal_point(mantissa_int, sig_figs, raw_exponent - target + 1);
            format!("{sign}{digits}{}", exponent_suffix(target))
        }
        NumberStyle::Metric => {
            let target = engineering_exponent(raw_exponent);
            let digits = place_decimal_point(mantissa_int, sig_figs, raw_exponent - target + 1);
            match METRIC_PREFIXES.iter().find(|(exp, _)| *exp == target) {
                Some((_, prefix)) => format!("{sign}{digits}{prefix}"),
                None => format!("{sign}{digits}{}", exponent_suffix(target)),
            }
        }
    }
}
