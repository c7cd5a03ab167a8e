//! Output formatting for CLI

use crate::analysis::{LearningCurve, SeriesPoint};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the statistics of one evaluation checkpoint
pub fn print_point(point: &SeriesPoint) {
    print_kv("Evaluated", &point.evaluated.to_string());
    print_kv("Uncaptured", &point.uncaptured.to_string());
    match point.stats {
        Some(stats) => {
            print_kv("Mean length", &format!("{:.2}", stats.mean));
            print_kv("Std deviation", &format!("{:.2}", stats.std_dev));
            print_kv("Min / max", &format!("{} / {}", stats.min, stats.max));
            print_kv("Mean abs. error", &format!("{:.2}", stats.mean_absolute_error));
        }
        None => print_kv("Mean length", "no captured episode"),
    }
}

/// Print the last `rows` checkpoints of a curve as a table
pub fn print_curve_tail(curve: &LearningCurve, rows: usize) {
    if curve.is_empty() {
        return;
    }
    print_subsection("Latest checkpoints");
    println!("  {:>10} {:>12} {:>10} {:>10}", "episode", "mean length", "std dev", "uncaptured");
    let skip = curve.len().saturating_sub(rows);
    for point in curve.points.iter().skip(skip) {
        let (mean, std_dev) = point.stats.map_or_else(
            || ("-".to_string(), "-".to_string()),
            |stats| (format!("{:.2}", stats.mean), format!("{:.2}", stats.std_dev)),
        );
        println!(
            "  {:>10} {:>12} {:>10} {:>10}",
            format_number(point.episode),
            mean,
            std_dev,
            point.uncaptured
        );
    }
}
