use tracing_subscriber::EnvFilter;
use vix_lib::{default_configs, QuoteTable, VixCalculator};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/data/quotes_20240102.csv".to_string());

    println!("VIX Calculation Demo");
    println!("====================");

    let table = QuoteTable::from_path(&path)?;
    println!("Loaded {} quotes from {}\n", table.len(), path);

    let calculator = VixCalculator::new(&table).with_config(default_configs::parallel());

    for date in table.trade_dates() {
        match calculator.calculate_detailed(date) {
            Ok(b) => {
                println!("{} ({} quotes)", b.trade_date, b.rows);
                for (label, term) in [("near", &b.near), ("next", &b.next)] {
                    println!(
                        "  {} {} ({:>2}d): F = {:.2}, K0 = {}, sigma^2 = {:.6}, strikes = {}",
                        label,
                        term.expiry,
                        term.days,
                        term.forward,
                        term.k0,
                        term.sigma_sq,
                        term.strikes_used
                    );
                }
                println!("  VIX = {:.2}\n", b.vix);
            }
            Err(e) => println!("{}: no index value ({})\n", date, e),
        }
    }

    Ok(())
}
