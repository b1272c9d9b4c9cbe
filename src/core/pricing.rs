use crate::models::{BandMethod, PriceBand, PriceTier, PricingPolicy};

// Tier boundaries in local currency
const BUDGET_CEILING: f64 = 1_500_000.0;
const MID_RANGE_CEILING: f64 = 3_000_000.0;
const PREMIUM_CEILING: f64 = 5_000_000.0;

/// Format an amount as `"<currency> 1,234,567"`, rounded to whole units
///
/// Non-finite amounts are printed as-is.
pub fn format_amount(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{} {}{}", currency, sign, grouped)
}

/// Convert a model price to local currency and format it
pub fn format_price(price: f64, policy: &PricingPolicy) -> String {
    format_amount(price * policy.rate, &policy.currency)
}

/// Segment an estimate by its local-currency price
pub fn price_tier(local_price: f64) -> PriceTier {
    if local_price < BUDGET_CEILING {
        PriceTier::Budget
    } else if local_price < MID_RANGE_CEILING {
        PriceTier::MidRange
    } else if local_price < PREMIUM_CEILING {
        PriceTier::Premium
    } else {
        PriceTier::Luxury
    }
}

/// Percentile with linear interpolation between closest ranks
///
/// `q` is in 0-100. Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Confidence band for an estimate
///
/// With two or more ensemble members the band spans the configured
/// percentiles of their predictions; otherwise it is the estimate plus or
/// minus the fallback fraction.
pub fn confidence_band(prediction: f64, members: &[f64], policy: &PricingPolicy) -> PriceBand {
    if members.len() >= 2 {
        if let (Some(low), Some(high)) = (
            percentile(members, policy.band_low_percentile),
            percentile(members, policy.band_high_percentile),
        ) {
            return PriceBand {
                low: low.min(high),
                high: high.max(low),
                method: BandMethod::EnsemblePercentile,
            };
        }
    }

    let spread = (prediction * policy.band_fraction).abs();
    PriceBand {
        low: prediction - spread,
        high: prediction + spread,
        method: BandMethod::FixedFraction,
    }
}
