use chrono::NaiveDate;
use demand_forecast::{
    fit_report, Interval, IntervalForecast, Method, NutsRegion, Series, Timeseries,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Demand Forecast: Basic Forecast Example");
    println!("=======================================\n");

    let last_available_year = 2018.0;
    let target_year = 2030.0;

    // Population history per NUTS2 region, dated as published
    let first_of_year = |year: i32| NaiveDate::from_ymd_opt(year, 1, 1);
    let mut history = Vec::new();
    for (offset, value) in [1.00, 1.02, 1.05, 1.06, 1.08, 1.11, 1.13, 1.15, 1.18]
        .into_iter()
        .enumerate()
    {
        if let Some(date) = first_of_year(2010 + offset as i32) {
            history.push((date, 4.0 * value));
        }
    }
    let upper_bavaria = Timeseries::from_dated(history);

    println!("Fit of each regression family on DE21:");
    for (method, accuracy) in fit_report(upper_bavaria.get_coef(), upper_bavaria.data()) {
        println!("  {:<16} {}", method.to_string(), accuracy);
    }
    println!();

    // Published growth corridor for DE11
    let stuttgart = Timeseries::new([(2016.0, 2.7), (2017.0, 2.75), (2018.0, 2.8)]);
    let corridor = IntervalForecast::new([
        (Interval::new(2018.0, 2025.0)?, 0.5),
        (Interval::new(2025.0, 2035.0)?, -0.2),
    ])?;

    let mut germany = NutsRegion::branch("DE");
    germany.insert(NutsRegion::leaf(
        "DE11",
        Series::step_sequence(stuttgart, corridor)?,
    ))?;
    germany.insert(NutsRegion::leaf(
        "DE21",
        Series::regression(upper_bavaria, Method::Linear),
    ))?;

    for node in germany.get_nodes_dfs() {
        println!(
            "{:<5} 2017: {:>8.3}  {}: {:>8.3}",
            node.code(),
            node.get_value(2017.0, last_available_year)?,
            target_year,
            node.get_value(target_year, last_available_year)?
        );
    }

    println!("\nShares of the target year population:");
    for (code, share) in germany.leaf_shares(target_year, last_available_year)? {
        println!("  {}: {:.1}%", code, share * 100.0);
    }

    Ok(())
}
