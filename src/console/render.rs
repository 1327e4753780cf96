//! Plain-text rendering of records and reports

use chrono::NaiveDate;

use super::command::COMMANDS;
use crate::models::{campaign, campaign_daily_metric, channel};
use crate::repositories::MappingRow;
use crate::services::{CampaignDetail, DbSnapshot, PerformanceReport};

const EMPTY: &str = "(no rows)";

/// Fixed-width table; each column is as wide as its widest cell
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(headers.iter().copied(), &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');

    if rows.is_empty() {
        out.push_str(EMPTY);
        out.push('\n');
    }
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Labeled field view, labels padded to a common width
pub fn detail(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(label, value)| format!("{label:<width$} : {value}\n"))
        .collect()
}

pub fn campaigns(rows: &[campaign::Model]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|c| {
            vec![
                c.campaign_id.to_string(),
                c.name.clone(),
                c.status.clone(),
                date(c.start_date),
                date(c.end_date),
                cents(c.budget_cents),
            ]
        })
        .collect();
    table(&["ID", "NAME", "STATUS", "START", "END", "BUDGET"], &rows)
}

pub fn channels(rows: &[channel::Model]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|c| vec![c.channel_id.to_string(), c.name.clone(), c.channel_type.clone()])
        .collect();
    table(&["ID", "NAME", "TYPE"], &rows)
}

pub fn mappings(rows: &[MappingRow]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|m| {
            vec![
                m.campaign_id.to_string(),
                m.campaign_name.clone(),
                m.channel_id.to_string(),
                m.channel_name.clone(),
            ]
        })
        .collect();
    table(&["CAMPAIGN", "CAMPAIGN NAME", "CHANNEL", "CHANNEL NAME"], &rows)
}

pub fn campaign_detail(detail_view: &CampaignDetail) -> String {
    let c = &detail_view.campaign;
    let mut out = detail(&[
        ("id", c.campaign_id.to_string()),
        ("name", c.name.clone()),
        ("status", c.status.clone()),
        ("start_date", date(c.start_date)),
        ("end_date", date(c.end_date)),
        ("budget", cents(c.budget_cents)),
        ("created_at", c.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ]);
    out.push_str("\nchannels:\n");
    out.push_str(&channels(&detail_view.channels));
    out
}

pub fn channel_detail(c: &channel::Model, linked: &[campaign::Model]) -> String {
    let mut out = detail(&[
        ("id", c.channel_id.to_string()),
        ("name", c.name.clone()),
        ("type", c.channel_type.clone()),
        ("created_at", c.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ]);
    out.push_str("\ncampaigns:\n");
    out.push_str(&campaigns(linked));
    out
}

pub fn performance(report: &PerformanceReport, days: &[campaign_daily_metric::Model]) -> String {
    let t = &report.totals;
    let mut out = detail(&[
        ("campaign", report.campaign_id.to_string()),
        ("range", format!("{} .. {}", date(report.start), date(report.end))),
        ("impressions", t.impressions.to_string()),
        ("clicks", t.clicks.to_string()),
        ("spend", cents(t.spend_cents)),
        ("revenue", cents(t.revenue_cents)),
        ("CTR", format!("{:.2}%", report.ctr * 100.0)),
        ("CPC", format!("{:.2}", report.cpc)),
        ("ROAS", format!("{:.2}", report.roas)),
    ]);

    if !days.is_empty() {
        let rows: Vec<Vec<String>> = days
            .iter()
            .map(|d| {
                vec![
                    d.metric_date.to_string(),
                    d.impressions.to_string(),
                    d.clicks.to_string(),
                    cents(d.spend_cents),
                    cents(d.revenue_cents),
                ]
            })
            .collect();
        out.push('\n');
        out.push_str(&table(
            &["DATE", "IMPRESSIONS", "CLICKS", "SPEND", "REVENUE"],
            &rows,
        ));
    }
    out
}

pub fn snapshot(s: &DbSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("campaigns ({}):\n", s.campaigns.len()));
    out.push_str(&campaigns(&s.campaigns));
    out.push_str(&format!("\nchannels ({}):\n", s.channels.len()));
    out.push_str(&channels(&s.channels));
    out.push_str(&format!("\nlinks ({}):\n", s.stats.links));
    out.push_str(&mappings(&s.mappings));
    out.push('\n');
    out.push_str(&detail(&[
        ("links", s.stats.links.to_string()),
        (
            "campaigns with channels",
            s.stats.campaigns_with_channels.to_string(),
        ),
        (
            "channels with campaigns",
            s.stats.channels_with_campaigns.to_string(),
        ),
    ]));
    out
}

pub fn help() -> String {
    let width = COMMANDS.iter().map(|(u, _)| u.len()).max().unwrap_or(0);
    let mut out = String::from("Commands:\n");
    for (usage, description) in COMMANDS {
        out.push_str(&format!("  {usage:<width$}  {description}\n"));
    }
    out.push_str("\nDates are YYYY-MM-DD. Quote names containing spaces.\n");
    out
}

fn date(value: Option<NaiveDate>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Cents as a decimal amount
fn cents(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_widths_follow_content() {
        let rendered = table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "Spring Sale".to_string()],
                vec!["10".to_string(), "X".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  -----------");
        assert_eq!(lines[2], "1   Spring Sale");
        assert_eq!(lines[3], "10  X");
    }

    #[test]
    fn test_empty_table_says_so() {
        let rendered = table(&["ID"], &[]);
        assert!(rendered.ends_with("(no rows)\n"));
    }

    #[test]
    fn test_cents_formatting() {
        assert_eq!(cents(0), "0.00");
        assert_eq!(cents(50_000), "500.00");
        assert_eq!(cents(1_205), "12.05");
    }

    #[test]
    fn test_help_lists_every_command() {
        let text = help();
        for (usage, _) in COMMANDS {
            assert!(text.contains(usage));
        }
    }
}
