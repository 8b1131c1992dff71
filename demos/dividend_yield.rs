//! Dividend yield and early exercise.
//!
//! Uses short-dated index option inputs to show how the dividend yield
//! moves American prices and the implied vols recovered from them, and how
//! much a smile shifts when the yield is ignored.
//!
//! Run with: `cargo run --example dividend_yield`

use volsmile::conventions::{forward_price, log_moneyness};
use volsmile::implied::implied_volatility;
use volsmile::pricing::{european_price, price_american_option};
use volsmile::smile::ModelKind;
use volsmile::{OptionType, Quote, SmileBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spot = 566.345;
    let rate = 0.0486;
    let expiry = 0.015708354371353372;
    let strikes = [550.0, 555.0, 560.0, 565.0, 570.0, 575.0, 580.0];

    println!("Spot={spot}, r={rate}, T={expiry:.6}y\n");
    for q in [0.0, 0.0035192, 0.02] {
        println!(
            "q={q:<9} forward={:.4}",
            forward_price(spot, rate, q, expiry)
        );
    }

    // ---------------------------------------------------------------
    // Price and re-invert across yields
    // ---------------------------------------------------------------

    println!(
        "\n{:>8} {:>10} {:>10} {:>12} {:>12} {:>10}",
        "Strike", "q", "ln(K/F)", "American", "European", "IV"
    );
    println!("{}", "-".repeat(67));
    for &k in &strikes {
        for q in [0.0, 0.0035192] {
            let x = log_moneyness(k, forward_price(spot, rate, q, expiry));
            let a = price_american_option(spot, k, expiry, rate, 0.15, q, OptionType::Put);
            let e = european_price(spot, k, expiry, rate, 0.15, q, OptionType::Put);
            let iv = implied_volatility(a, spot, k, rate, expiry, q, OptionType::Put);
            println!("{k:>8.1} {q:>10.5} {x:>10.5} {a:>12.6} {e:>12.6} {:>10.6}", iv.0);
        }
    }

    // ---------------------------------------------------------------
    // Effect of ignoring the yield when building a smile
    // ---------------------------------------------------------------

    let true_q = 0.0035192;
    let quotes: Vec<Quote> = strikes
        .iter()
        .map(|&k| {
            let p = price_american_option(spot, k, expiry, rate, 0.15, true_q, OptionType::Put);
            Quote::new(k, 0.97 * p, 1.03 * p)
        })
        .collect();

    let build = |q: f64| {
        SmileBuilder::new()
            .spot(spot)
            .rate(rate)
            .dividend_yield(q)
            .expiry(expiry)
            .side(OptionType::Put)
            .model(ModelKind::Slv)
            .quotes(&quotes)
            .build()
    };
    let with_q = build(true_q)?;
    let without_q = build(0.0)?;

    println!("\n{:>8} {:>12} {:>12}", "Strike", "vol (q)", "vol (q=0)");
    for &k in &strikes {
        println!(
            "{k:>8.1} {:>12.6} {:>12.6}",
            with_q.vol(k)?.0,
            without_q.vol(k)?.0
        );
    }

    Ok(())
}
