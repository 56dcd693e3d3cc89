//! Console formatting for CLI reports

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
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

/// Percentages of X wins, O wins and draws, one per line
pub fn outcome_lines(result: &TrainingResult) -> Vec<String> {
    vec![
        format!("X wins {:.2}% times", result.x_win_rate * 100.0),
        format!("O wins {:.2}% times", result.o_win_rate * 100.0),
        format!("Draws {:.2}% times", result.draw_rate * 100.0),
    ]
}

pub fn print_outcomes(result: &TrainingResult) {
    for line in outcome_lines(result) {
        println!("  {line}");
    }
}
