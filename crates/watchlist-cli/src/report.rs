//! Plain-text rendering of a ranked watch-list.

use serde::Serialize;
use signal_ranker::{CrossSectionStats, RankedRow};
use std::fmt::Write;

/// `$1,234.56`
pub fn format_dollars(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, frac)
}

/// Fraction rendered as a percentage with two decimals.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn render_table(rows: &[RankedRow<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<8} {:>12} {:>9} {:>9} {:>9} {:>9} {:>5} {:>8}",
        "#", "Ticker", "Last", "Mom 5d", "Mom 20d", "Vol 30d", "Sent", "News", "Score"
    );
    let _ = writeln!(out, "{}", "-".repeat(82));

    for (i, row) in rows.iter().enumerate() {
        let record = row.record;
        let _ = writeln!(
            out,
            "{:<4} {:<8} {:>12} {:>9} {:>9} {:>9} {:>9.3} {:>5} {:>8.3}",
            i + 1,
            row.symbol,
            format_dollars(record.last_price),
            format_percent(record.momentum_5),
            format_percent(record.momentum_20),
            format_percent(record.realized_vol_30),
            record.headline_sentiment.unwrap_or(0.0),
            record.news_count.unwrap_or(0),
            row.score
        );
    }

    out
}

/// Detail view for one ticker: features, standardized columns and headlines.
pub fn render_inspection(row: &RankedRow<'_>, rank: usize) -> String {
    let record = row.record;
    let mut out = String::new();

    let _ = writeln!(out, "## {} (rank {}) - latest price {}", row.symbol, rank + 1, format_dollars(record.last_price));
    let _ = writeln!(out, "  Momentum 5d:      {}", format_percent(record.momentum_5));
    let _ = writeln!(out, "  Momentum 20d:     {}", format_percent(record.momentum_20));
    let _ = writeln!(out, "  Realized vol 30d: {}", format_percent(record.realized_vol_30));
    let _ = writeln!(out, "  Avg volume:       {:.0}", record.avg_volume);
    let _ = writeln!(out, "  Latest volume:    {:.0}", record.volume_latest);
    let _ = writeln!(out, "  z(mom5) {:+.3}  z(sent) {:+.3}  z(vol) {:+.3}  score {:+.3}", row.z_mom5, row.z_sent, row.z_vol, row.score);

    let _ = writeln!(out, "### Top headlines");
    if record.headlines.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for headline in &record.headlines {
        let published = headline
            .published_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        let _ = writeln!(out, "- {}", headline.title.as_deref().unwrap_or("(untitled)"));
        let _ = writeln!(out, "  {} - {}", headline.source.as_deref().unwrap_or("unknown source"), published);
        if let Some(url) = &headline.url {
            let _ = writeln!(out, "  {}", url);
        }
    }

    out
}

#[derive(Serialize)]
pub struct JsonReport<'a, 'r> {
    pub ranked: usize,
    pub rows: &'r [RankedRow<'a>],
    pub stats: &'r CrossSectionStats,
}
