//! Compare the four smile models side by side.
//!
//! Shows how to:
//!   - Evaluate RFV, SLV, SABR and SVI on a log-moneyness grid
//!   - Name parameters through `ModelKind::param_names`
//!   - Scan a curve for poles and negative vols
//!
//! Run with: `cargo run --example smile_models`

use volsmile::smile::{ModelKind, SmileDiagnostics, SviParams, evaluate_model};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = [0.2, 0.3, 0.1, 0.2, 0.1];
    let k: Vec<f64> = (0..9).map(|i| -0.4 + 0.1 * i as f64).collect();

    print!("{:>8}", "k");
    for kind in ModelKind::ALL {
        print!(" {:>10}", kind.name());
    }
    println!();
    println!("{}", "-".repeat(8 + 11 * ModelKind::ALL.len()));

    let curves: Vec<Vec<f64>> = ModelKind::ALL
        .iter()
        .map(|&kind| evaluate_model(kind, &k, &params))
        .collect();
    for (i, ki) in k.iter().enumerate() {
        print!("{ki:>8.2}");
        for curve in &curves {
            print!(" {:>10.5}", curve[i]);
        }
        println!();
    }

    println!();
    for kind in ModelKind::ALL {
        let names = kind.param_names();
        let described: Vec<String> = names
            .iter()
            .zip(params)
            .map(|(n, v)| format!("{n}={v}"))
            .collect();
        println!("{kind}: {}", described.join(", "));
    }

    let svi = SviParams::from_params(&params);
    println!(
        "\nSVI well posed: {}, minimum vol {:.4}",
        svi.is_well_posed(),
        svi.min_vol()
    );

    // RFV with d² > 4e has real poles.
    let poles = [0.2, 0.0, 0.0, -3.0, 0.5];
    let report = SmileDiagnostics::scan(ModelKind::Rfv, &poles, -1.0, 1.0, 201)?;
    println!("\nRFV {poles:?} on [-1, 1]:");
    for issue in report.issues.iter().take(5) {
        println!("  {issue:?}");
    }
    println!("  ({} issues total)", report.issues.len());

    Ok(())
}
