use anyhow::{bail, Result};
use comtrade_countries::{CodeTable, CountryRecord};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Inspect the country code table from the command line.
///
/// Usage: `inspect [--data <countries.csv>] [CODE...]`
/// where CODE is an ISO2/ISO3 code or an M49 number. With no codes, prints
/// summary counts only.
fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let loaded;
    let table: &CodeTable = if let Some(pos) = args.iter().position(|a| a == "--data") {
        if pos + 1 >= args.len() {
            bail!("--data requires a path");
        }
        let path = args.remove(pos + 1);
        args.remove(pos);
        info!("loading {}", path);
        loaded = CodeTable::load_path(&path)?;
        &loaded
    } else {
        CodeTable::builtin()
    };

    info!(
        "{} records, {} countries, {} aggregate regions, {} LDCs",
        table.len(),
        table.countries_only().count(),
        table.all(true).filter(|r| r.non_country_region).count(),
        table.countries_only().filter(|r| r.ldc).count(),
    );

    for code in &args {
        match resolve(table, code) {
            Some(rec) => print_record(code, rec),
            None => println!("{code}: not found"),
        }
    }

    Ok(())
}

/// Try the code against each index in turn: M49 first for numeric input
/// (falling back to the Comtrade variant), otherwise ISO2/ISO3 by length.
fn resolve<'t>(table: &'t CodeTable, code: &str) -> Option<&'t CountryRecord> {
    if let Ok(n) = code.trim().parse::<u32>() {
        return table
            .by_m49(n)
            .or_else(|_| table.by_m49_comtrade(n))
            .ok();
    }
    match code.trim().len() {
        2 => table.by_iso2(code).ok(),
        3 => table.by_iso3(code).ok(),
        _ => None,
    }
}

fn print_record(query: &str, rec: &CountryRecord) {
    let centroid = match (rec.latitude, rec.longitude) {
        (Some(lat), Some(lon)) => format!("({lat}, {lon})"),
        _ => "no centroid".to_string(),
    };
    println!(
        "{query}: {} [{}/{}] iso2={} iso3={} m49={} comtrade={} {} ldc={} aggregate={}",
        rec.country,
        rec.region,
        rec.subregion,
        rec.iso2,
        rec.iso3,
        rec.m49,
        rec.m49_comtrade,
        centroid,
        rec.ldc,
        rec.non_country_region,
    );
}
