use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::shot::{Player, Shot};
use crate::zones::{ZoneSummary, zone_of};

pub struct ExportReport {
    pub players: usize,
    pub zone_rows: usize,
    pub shot_rows: usize,
}

pub struct ExportProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Writes per-player totals, zone breakdowns and raw shots to an `.xlsx` workbook.
pub fn export_shot_report_with_progress(
    path: &Path,
    players: &[&Player],
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportReport> {
    let total = players.len();
    let mut summary_rows = vec![header(&[
        "Player", "Player ID", "FGA", "FGM", "FG%", "eFG%",
    ])];
    let mut zone_rows = vec![header(&[
        "Player", "Zone", "FGA", "FGM", "FG%", "Share of FGA",
    ])];
    let mut shot_rows = vec![header(&["Player", "Made", "LOC_X", "LOC_Y", "Zone"])];

    for (idx, player) in players.iter().enumerate() {
        let summary = ZoneSummary::from_shots(&player.shots);
        summary_rows.push(summary_row(player, &summary));
        zone_rows.extend(player_zone_rows(player, &summary));
        shot_rows.extend(player.shots.iter().map(|s| shot_row(player, s)));
        on_progress(ExportProgress {
            current: idx + 1,
            total,
            message: format!("Summarised {}", player.name),
        });
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Zones")?;
        write_rows(sheet, &zone_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shots")?;
        write_rows(sheet, &shot_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: total,
        zone_rows: zone_rows.len().saturating_sub(1),
        shot_rows: shot_rows.len().saturating_sub(1),
    })
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn summary_row(player: &Player, summary: &ZoneSummary) -> Vec<String> {
    vec![
        player.name.clone(),
        player.id.clone(),
        summary.attempts().to_string(),
        summary.makes().to_string(),
        pct_cell(summary.fg_pct()),
        pct_cell(summary.efg_pct()),
    ]
}

fn player_zone_rows(player: &Player, summary: &ZoneSummary) -> Vec<Vec<String>> {
    summary
        .lines()
        .iter()
        .filter(|line| line.attempts > 0)
        .map(|line| {
            vec![
                player.name.clone(),
                line.zone.label().to_string(),
                line.attempts.to_string(),
                line.makes.to_string(),
                pct_cell(line.fg_pct()),
                format!("{:.1}", 100.0 * summary.attempt_share(line.zone)),
            ]
        })
        .collect()
}

fn shot_row(player: &Player, shot: &Shot) -> Vec<String> {
    vec![
        player.name.clone(),
        if shot.made { "1" } else { "0" }.to_string(),
        shot.x.to_string(),
        shot.y.to_string(),
        zone_of(shot).label().to_string(),
    ]
}

fn pct_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
