//! Aggregate report over the ticket set.

use std::collections::BTreeMap;

use crate::models::{Priority, TicketCounts, TicketStats};

/// Build the stats report from raw grouped counts.
///
/// Every known priority appears in `priority_breakdown`, zero-filled, and
/// unknown stored values keep their literal key. `category_breakdown` only
/// holds categories that occur. `avg_tickets_per_day` divides the total by
/// the number of calendar days (UTC) between the first and last ticket,
/// inclusive, rounded to one decimal.
pub fn build_ticket_stats(counts: &TicketCounts) -> TicketStats {
    let mut priority_breakdown: BTreeMap<String, i64> = Priority::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), 0))
        .collect();
    for (priority, count) in &counts.by_priority {
        *priority_breakdown.entry(priority.clone()).or_default() += count;
    }

    let mut category_breakdown = BTreeMap::new();
    for (category, count) in &counts.by_category {
        if *count > 0 {
            *category_breakdown.entry(category.clone()).or_default() += count;
        }
    }

    TicketStats {
        total_tickets: counts.total,
        open_tickets: counts.open,
        avg_tickets_per_day: avg_per_day(counts),
        priority_breakdown,
        category_breakdown,
    }
}

fn avg_per_day(counts: &TicketCounts) -> f64 {
    let (Some(first), Some(last)) = (counts.first_created_at, counts.last_created_at) else {
        return 0.0;
    };
    if counts.total == 0 {
        return 0.0;
    }

    let day_span = (last.date_naive() - first.date_naive()).num_days() + 1;
    if day_span <= 0 {
        return 0.0;
    }

    round1(counts.total as f64 / day_span as f64)
}

// Decimal formatting rounds the exact binary value with ties to even,
// so 1.25 becomes 1.2 and 0.15 (stored just below) becomes 0.1.
fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
