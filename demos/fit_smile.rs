//! Fit a smile from raw option quotes.
//!
//! Walks the full pipeline:
//!   1. Start from a chain of bid/ask put quotes
//!   2. Build a smile with each model via `SmileBuilder`
//!   3. Compare fit quality and inspect a dense display curve
//!   4. Calibrate directly in log-moneyness with bounds
//!
//! Run with: `cargo run --example fit_smile`

use volsmile::calibration::{CalibrationConfig, SmileCalibrator, SmileData};
use volsmile::pricing::price_american_option;
use volsmile::smile::ModelKind;
use volsmile::{OptionType, Quote, SmileBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (spot, rate, q, expiry) = (100.0, 0.05, 0.01, 0.25);

    // ---------------------------------------------------------------
    // 1. Synthetic put chain with a downside skew
    // ---------------------------------------------------------------

    let quotes: Vec<Quote> = (0..13)
        .map(|i| {
            let strike = 80.0 + 3.5 * i as f64;
            let vol = 0.22 - 0.004 * (strike - 100.0) + 0.0001 * (strike - 100.0).powi(2);
            let p = price_american_option(spot, strike, expiry, rate, vol, q, OptionType::Put);
            Quote::new(strike, (p - 0.05).max(0.0), p + 0.05)
        })
        .collect();

    // ---------------------------------------------------------------
    // 2-3. Build with each model
    // ---------------------------------------------------------------

    println!("{:>6} {:>12} {:>10} {:>6} {:>6}  status", "Model", "objective", "rms", "nit", "nfev");
    println!("{}", "-".repeat(64));
    for kind in ModelKind::ALL {
        let smile = SmileBuilder::new()
            .spot(spot)
            .rate(rate)
            .dividend_yield(q)
            .expiry(expiry)
            .side(OptionType::Put)
            .model(kind)
            .quotes(&quotes)
            .build()?;
        let c = smile.calibration();
        println!(
            "{:>6} {:>12.4e} {:>10.6} {:>6} {:>6}  {}",
            kind.name(),
            c.objective,
            c.rms_error,
            c.nit,
            c.nfev,
            c.message
        );

        if kind == ModelKind::Svi {
            println!("\n  SVI display curve:");
            for (strike, vol) in smile.curve(9) {
                println!("    K={:>7.2}  vol={:.4}", strike.0, vol.0);
            }
            println!();
        }
    }

    // ---------------------------------------------------------------
    // 4. Direct calibration in log-moneyness, SVI domain enforced
    // ---------------------------------------------------------------

    let k: Vec<f64> = (0..9).map(|i| -0.4 + 0.1 * i as f64).collect();
    let mid: Vec<f64> = k.iter().map(|&x| 0.2 - 0.1 * x + 0.4 * x * x).collect();
    let bid = mid.iter().map(|m| m - 0.01).collect();
    let ask = mid.iter().map(|m| m + 0.01).collect();
    let data = SmileData::new(k, mid, bid, ask)?;

    let config = CalibrationConfig::default().with_bounds(ModelKind::Svi.natural_bounds());
    let fit = SmileCalibrator::new(config).fit(&data, ModelKind::Svi)?;
    println!("Bounded SVI: params {:?}", fit.params);
    println!("             rms {:.6}, {}", fit.rms_error, fit.message);

    Ok(())
}
