//! Growth percentage, delta, CAGR and rounding primitives.

/// Rounds to 2 decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(latest - previous) / |previous| * 100`, rounded to 2 decimals.
///
/// `None` when `previous` is zero or either side is not finite.
#[must_use]
pub fn growth_pct(latest: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !latest.is_finite() || !previous.is_finite() {
        return None;
    }
    let pct = (latest - previous) / previous.abs() * 100.0;
    pct.is_finite().then(|| round2(pct))
}

/// Percentage-point difference `latest - previous`, rounded to 2 decimals.
///
/// `None` only when either side is not finite.
#[must_use]
pub fn delta(latest: f64, previous: f64) -> Option<f64> {
    let diff = latest - previous;
    diff.is_finite().then(|| round2(diff))
}

/// Compound annual growth rate in percent, rounded to 2 decimals.
///
/// `None` unless both endpoints are strictly positive and `years > 0`.
#[must_use]
pub fn cagr_pct(latest: f64, base: f64, years: i32) -> Option<f64> {
    if years <= 0 || !latest.is_finite() || !base.is_finite() || latest <= 0.0 || base <= 0.0 {
        return None;
    }
    let rate = ((latest / base).powf(1.0 / f64::from(years)) - 1.0) * 100.0;
    rate.is_finite().then(|| round2(rate))
}
