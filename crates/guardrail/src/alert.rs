//! Plain-text budget alerts for UX surfaces.

use skybroker_core::ledger::LedgerEntry;

use crate::evaluate::{BudgetStatus, SpendLimits, budget_status};

/// Format a one-budget alert with a ten-segment progress bar.
///
/// `context` labels the budget (e.g. "Total", "Daily").
pub fn format_budget_alert(spent: f64, limit: f64, context: &str) -> String {
    let (status, percentage) = budget_status(spent, limit);
    let remaining = (limit - spent).max(0.0);

    let filled = ((percentage / 10.0) as usize).min(10);
    let bar = if status == BudgetStatus::Exceeded {
        let over = (((percentage - 100.0) / 10.0) as usize).min(5);
        format!("{}{}", "#".repeat(10), "+".repeat(over))
    } else {
        format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
    };

    let mut alert = format!(
        "Budget {context}: ${spent:.2} / ${limit:.2} ({percentage:.1}%)\n   [{bar}] ${remaining:.2} remaining"
    );

    match status {
        BudgetStatus::Exceeded => {
            alert.push_str(&format!("\n   BUDGET EXCEEDED by ${:.2}!", spent - limit));
        }
        BudgetStatus::Danger => {
            alert.push_str(&format!("\n   Only ${remaining:.2} left! (90% spent)"));
        }
        BudgetStatus::Critical => {
            alert.push_str("\n   Budget running low - 75% spent");
        }
        BudgetStatus::Warning => {
            alert.push_str("\n   Half of budget used");
        }
        BudgetStatus::Safe => {}
    }

    alert
}

/// Format a spending summary: total and daily alerts plus the most recent
/// ledger entries.
pub fn format_spending_summary(
    total_spent: f64,
    daily_spent: f64,
    limits: &SpendLimits,
    entries: &[LedgerEntry],
) -> String {
    let mut summary = String::from("Spending Summary\n");
    summary.push_str(&"-".repeat(40));
    summary.push_str("\n\n");

    summary.push_str(&format_budget_alert(total_spent, limits.total, "Total"));
    summary.push_str("\n\n");
    summary.push_str(&format_budget_alert(daily_spent, limits.daily, "Daily"));
    summary.push('\n');

    if !entries.is_empty() {
        summary.push_str("\nRecent orders:\n");
        for entry in entries.iter().rev().take(3) {
            summary.push_str(&format!(
                "   - ${:.2} {} ({})\n",
                entry.cost,
                entry.archive_id,
                entry.timestamp.format("%Y-%m-%d %H:%M UTC")
            ));
        }
    }

    summary
}
