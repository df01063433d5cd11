//! Report output: console tables plus CSV and HTML exports

use crate::edge::RankedRow;
use crate::error::ExportError;
use crate::odds::PricedQuote;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

const RULE: &str = "══════════════════════════════════════════════════════════════════════════════════════════════";
const THIN: &str = "──────────────────────────────────────────────────────────────────────────────────────────────";

fn pct(x: f64) -> String {
    format!("{:.1}%", x * 100.0)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        s.chars().take(width.saturating_sub(1)).chain(['…']).collect()
    }
}

/// Ranked table for the terminal
pub fn format_ranked_table(title: &str, rows: &[RankedRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  {title}");
    let _ = writeln!(out, "{RULE}");

    if rows.is_empty() {
        let _ = writeln!(out, "  No eligible players with a 2+ TD price");
        let _ = writeln!(out, "{RULE}");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>3}  {:<4} {:<24} {:<3} {:<12} {:>6} {:>7} {:>7} {:>7} {:>7}",
        "#", "TEAM", "PLAYER", "POS", "BOOK", "ODDS", "MODEL", "IMPL", "EDGE", "STAKE"
    );
    let _ = writeln!(out, "{THIN}");
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<4} {:<24} {:<3} {:<12} {:>6} {:>7} {:>7} {:>7} {:>7.2}",
            i + 1,
            truncate(&row.team, 4),
            truncate(&row.player, 24),
            truncate(&row.position, 3),
            truncate(&row.book, 12),
            row.odds.to_string(),
            pct(row.model_prob),
            pct(row.implied_prob),
            pct(row.edge),
            row.stake_units,
        );
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// Every accepted 2+ quote, for `--dump-odds`
pub fn format_odds_dump(quotes: &[PricedQuote]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  2+ TD QUOTES ({} accepted)", quotes.len());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{:<24} {:<14} {:<36} {:>6} {:>5} {:>7}",
        "PLAYER", "BOOK", "MARKET", "ODDS", "LINE", "IMPL"
    );
    let _ = writeln!(out, "{THIN}");
    for q in quotes {
        let line = q.quote.point.map(|p| format!("{p:.1}")).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<24} {:<14} {:<36} {:>6} {:>5} {:>7}",
            truncate(&q.quote.player, 24),
            truncate(&q.quote.book, 14),
            truncate(&q.quote.market, 36),
            q.odds.to_string(),
            line,
            pct(q.odds.implied_probability()),
        );
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// Column order of [`ExportRow`]
const EXPORT_HEADER: [&str; 17] = [
    "rank",
    "player",
    "team",
    "position",
    "book",
    "market",
    "odds",
    "model_prob",
    "implied_prob",
    "edge",
    "full_kelly",
    "stake_units",
    "games",
    "raw_rate",
    "shrunk_rate",
    "feature_season",
    "fallback_season",
];

/// Flat export row
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    rank: usize,
    player: &'a str,
    team: &'a str,
    position: &'a str,
    book: &'a str,
    market: &'a str,
    odds: i32,
    model_prob: f64,
    implied_prob: f64,
    edge: f64,
    full_kelly: f64,
    stake_units: Decimal,
    games: u32,
    raw_rate: f64,
    shrunk_rate: f64,
    feature_season: i32,
    fallback_season: bool,
}

impl<'a> ExportRow<'a> {
    fn new(rank: usize, row: &'a RankedRow) -> Self {
        Self {
            rank,
            player: &row.player,
            team: &row.team,
            position: &row.position,
            book: &row.book,
            market: &row.market,
            odds: row.odds.value(),
            model_prob: row.model_prob,
            implied_prob: row.implied_prob,
            edge: row.edge,
            full_kelly: row.full_kelly,
            stake_units: row.stake_units,
            games: row.games,
            raw_rate: row.raw_rate,
            shrunk_rate: row.shrunk_rate,
            feature_season: row.feature_season.season(),
            fallback_season: row.feature_season.is_fallback(),
        }
    }
}

/// Write the ranked table as CSV, replacing any existing file
pub fn write_csv(path: &Path, rows: &[RankedRow]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    // serialize only emits a header with the first row
    if rows.is_empty() {
        writer.write_record(EXPORT_HEADER).map_err(csv_err)?;
    }
    for (i, row) in rows.iter().enumerate() {
        writer.serialize(ExportRow::new(i + 1, row)).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote CSV report");
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the ranked table as a plain HTML `<table>`
pub fn render_html(rows: &[RankedRow]) -> String {
    const HEADERS: [&str; 10] = [
        "rank",
        "team",
        "player",
        "position",
        "book",
        "odds",
        "model_prob",
        "implied_prob",
        "edge",
        "stake_units",
    ];

    let mut html = String::from("<table>\n  <thead>\n    <tr>");
    for h in HEADERS {
        let _ = write!(html, "<th>{h}</th>");
    }
    html.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for (i, row) in rows.iter().enumerate() {
        let cells = [
            (i + 1).to_string(),
            escape_html(&row.team),
            escape_html(&row.player),
            escape_html(&row.position),
            escape_html(&row.book),
            row.odds.to_string(),
            format!("{:.4}", row.model_prob),
            format!("{:.4}", row.implied_prob),
            format!("{:.4}", row.edge),
            format!("{:.4}", row.stake_units),
        ];
        html.push_str("    <tr>");
        for cell in cells {
            let _ = write!(html, "<td>{cell}</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

/// Write the HTML table to a file
pub fn write_html(path: &Path, rows: &[RankedRow]) -> Result<(), ExportError> {
    std::fs::write(path, render_html(rows)).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote HTML report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::AmericanOdds;
    use crate::player::PlayerKey;
    use crate::stats::FeatureSeason;
    use rust_decimal_macros::dec;

    fn row(player: &str) -> RankedRow {
        let odds = AmericanOdds::new(350).unwrap();
        RankedRow {
            key: PlayerKey::from_name(player),
            player: player.to_string(),
            team: "PHI".to_string(),
            position: "RB".to_string(),
            book: "draftkings".to_string(),
            market: "player_tds_over".to_string(),
            odds,
            model_prob: 0.3,
            implied_prob: odds.implied_probability(),
            edge: 0.3 - odds.implied_probability(),
            full_kelly: 0.1,
            stake_units: dec!(0.05),
            games: 12,
            raw_rate: 1.1,
            shrunk_rate: 0.95,
            feature_season: FeatureSeason::Fallback(2023),
        }
    }

    #[test]
    fn test_console_table() {
        let table = format_ranked_table("REPORT", &[row("Saquon Barkley")]);
        assert!(table.contains("Saquon Barkley"));
        assert!(table.contains("+350"));
        assert!(table.contains("30.0%"));

        let empty = format_ranked_table("REPORT", &[]);
        assert!(empty.contains("No eligible players"));
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&path, &[row("Saquon Barkley"), row("Jalen Hurts")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("rank,player,team,position,book"));
        assert!(lines.next().unwrap().starts_with("1,Saquon Barkley,PHI,RB,draftkings"));
        assert!(text.contains(",2023,true"));
    }

    #[test]
    fn test_csv_export_without_rows_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.trim_end(), EXPORT_HEADER.join(","));

        // Same columns the populated export writes
        let full = dir.path().join("full.csv");
        write_csv(&full, &[row("Saquon Barkley")]).unwrap();
        let full_text = std::fs::read_to_string(&full).unwrap();
        assert_eq!(full_text.lines().next(), Some(EXPORT_HEADER.join(",").as_str()));
    }

    #[test]
    fn test_html_escapes() {
        let html = render_html(&[row("D'Andre <Swift>")]);
        assert!(html.starts_with("<table>"));
        assert!(html.contains("D&#39;Andre &lt;Swift&gt;"));
        assert!(html.contains("<td>+350</td>"));
        assert!(html.contains("<td>0.0500</td>"));
    }
}
