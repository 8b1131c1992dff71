//! Extract implied volatility from American option prices.
//!
//! Shows how to:
//!   - Price an American option with Barone-Adesi–Whaley
//!   - Invert the price back to a volatility by bisection
//!   - Invert a full bid/ask quote
//!
//! Run with: `cargo run --example implied_vol`

use volsmile::implied::{ImpliedVolConfig, implied_volatility, implied_volatility_with, quote_vols};
use volsmile::pricing::price_american_option;
use volsmile::{MarketParams, OptionType, Quote};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spot = 100.0;
    let strike = 105.0;
    let expiry = 0.5;
    let rate = 0.05;
    let q = 0.01;

    println!("Spot={spot}, Strike={strike}, T={expiry}y, r={rate}, q={q}\n");
    println!("{:>6} {:>8} {:>12} {:>12} {:>10}", "Side", "Vol", "Price", "Implied", "Error");
    println!("{}", "-".repeat(52));

    for side in [OptionType::Call, OptionType::Put] {
        for sigma in [0.10, 0.20, 0.40, 0.80] {
            let price = price_american_option(spot, strike, expiry, rate, sigma, q, side);
            let iv = implied_volatility(price, spot, strike, rate, expiry, q, side);
            println!(
                "{:>6} {:>8.2} {:>12.6} {:>12.8} {:>10.2e}",
                side.to_string(),
                sigma,
                price,
                iv.0,
                (iv.0 - sigma).abs()
            );
        }
    }

    // A looser tolerance trades accuracy for fewer pricer calls.
    let price = price_american_option(spot, strike, expiry, rate, 0.25, q, OptionType::Put);
    let loose = ImpliedVolConfig::default().with_tol(1e-4);
    let iv = implied_volatility_with(price, spot, strike, rate, expiry, q, OptionType::Put, &loose);
    println!("\nWith tol=1e-4: implied {:.6} (true 0.25)", iv.0);

    // Bid/mid/ask inversion of a single quote.
    let market = MarketParams {
        spot,
        rate,
        dividend_yield: q,
        time_to_expiry: expiry,
        side: "puts".parse()?,
    };
    let quote = Quote::new(strike, 0.98 * price, 1.02 * price);
    let vols = quote_vols(&quote, &market, &ImpliedVolConfig::default());
    println!(
        "Quote {:.4}/{:.4}: bid vol {:.4}, mid vol {:.4}, ask vol {:.4}",
        quote.bid, quote.ask, vols.bid.0, vols.mid.0, vols.ask.0
    );

    Ok(())
}
