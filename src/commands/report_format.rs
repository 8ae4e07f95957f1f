use crate::domain::metric::Metric;
use crate::services::result_types::{PercentileBand, ResultSet};

const REPORTED_METRICS: [Metric; 6] = [
    Metric::Customers,
    Metric::Headcount,
    Metric::TotalRevenue,
    Metric::TotalCosts,
    Metric::NetEarnings,
    Metric::Usage,
];

pub fn format_forecast_report(result: &ResultSet) -> String {
    let final_month = &result.final_month;
    let seed = match result.seed {
        Some(seed) => seed.to_string(),
        None => "n/a".to_string(),
    };
    let break_even = match result.break_even_month {
        Some(month) => {
            let label = result
                .months
                .get(month - 1)
                .map(|summary| summary.label.as_str())
                .unwrap_or_default();
            format!("month {month} ({label})")
        }
        None => "not reached".to_string(),
    };

    let mut lines = Vec::new();
    lines.push("Forecast Report".to_string());
    lines.push(format!("Seed: {seed}"));
    lines.push(format!("Months: {}", result.horizon()));
    lines.push(format!("Trials: {}", result.trials));
    lines.push(format!("Degenerate trials excluded: {}", result.degenerate_trials));
    lines.push(format!("Break-even: {break_even}"));
    lines.push(String::new());
    lines.push(format!(
        "Final month {} ({}):",
        final_month.month, final_month.label
    ));
    lines.push(format!("Metric | {}", percentile_header(&result.percentiles)));
    lines.push("-------|------".to_string());
    for metric in REPORTED_METRICS {
        if let Some(band) = final_month.band(metric) {
            let decimals = if metric.is_count() { 0 } else { 2 };
            lines.push(format_band_row(metric.name(), band, decimals));
        }
    }
    lines.push(format_band_row(
        "cumulative-earnings",
        &final_month.cumulative_earnings,
        2,
    ));
    lines.push(String::new());

    let summary = &result.summary;
    lines.push("Summary (medians across trials):".to_string());
    lines.push(format!(
        "Revenue per employee: {:.2}",
        summary.revenue_per_employee
    ));
    lines.push(format!("Cost per employee: {:.2}", summary.cost_per_employee));
    lines.push(format!(
        "Earnings per employee: {:.2}",
        summary.earnings_per_employee
    ));
    lines.push(format!(
        "Profit margin: {}",
        format_ratio(summary.final_profit_margin)
    ));
    lines.push(format!(
        "Salary share of costs: {}",
        format_ratio(summary.salary_share_of_costs)
    ));
    lines.push(format!(
        "Cost growth multiple: {}",
        summary
            .cost_growth_multiple
            .map_or_else(|| "n/a".to_string(), |value| format!("{value:.2}x"))
    ));
    lines.push(format!("Profitable months: {:.0}", summary.profitable_months));
    lines.push(format!("Max drawdown: {:.2}", summary.max_drawdown));
    lines.push(format!(
        "Trials breaking even: {} of {}",
        summary.trials_breaking_even, result.trials
    ));

    lines.join("\n")
}

fn percentile_header(percentiles: &[f64]) -> String {
    percentiles
        .iter()
        .map(|percentile| format!("P{percentile}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_band_row(name: &str, band: &PercentileBand, decimals: usize) -> String {
    let values = band
        .points
        .iter()
        .map(|point| format!("{:.decimals$}", point.value))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{name} | {values}")
}

fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.1}%", value * 100.0),
        None => "n/a".to_string(),
    }
}
