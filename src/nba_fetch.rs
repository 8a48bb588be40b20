use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::http_client::http_client;
use crate::shot::{Player, Shot};

const SHOT_CHART_URL: &str = "https://stats.nba.com/stats/shotchartdetail";

/// Fetches one player's regular-season attempts, makes and misses.
pub fn fetch_player_shots(id: &str, name: &str, season: &str) -> Result<Player> {
    let client = http_client()?;
    let query = shot_chart_query(id, season);
    info!(id, season, "fetching shot chart");
    let resp = client
        .get(SHOT_CHART_URL)
        .query(&query)
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }
    let mut player = parse_shot_chart_json(&body)?;
    player.id = id.to_string();
    if player.name.is_empty() {
        player.name = name.to_string();
    }
    debug!(id, shots = player.shots.len(), "shot chart parsed");
    Ok(player)
}

fn shot_chart_query(id: &str, season: &str) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&'static str, String)> = vec![
        ("PlayerID", id.to_string()),
        ("Season", season.to_string()),
        ("SeasonType", "Regular Season".to_string()),
        ("ContextMeasure", "FGA".to_string()),
    ];
    for key in [
        "TeamID",
        "LeagueID",
        "LastNGames",
        "Month",
        "OpponentTeamID",
        "Period",
        "PlayerPosition",
        "RookieYear",
        "SeasonSegment",
        "VsConference",
        "VsDivision",
        "GameID",
        "DateFrom",
        "DateTo",
        "Location",
        "Outcome",
        "GameSegment",
        "AheadBehind",
        "ClutchTime",
        "PointDiff",
        "RangeType",
        "StartPeriod",
        "EndPeriod",
        "StartRange",
        "EndRange",
        "ContextFilter",
    ] {
        let value = match key {
            "TeamID" | "LastNGames" | "Month" | "OpponentTeamID" | "Period" => "0",
            "LeagueID" => "00",
            _ => "",
        };
        query.push((key, value.to_string()));
    }
    query
}

#[derive(Debug, Deserialize)]
struct ShotChartResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    name: String,
    #[serde(default)]
    headers: Vec<String>,
    #[serde(rename = "rowSet", default)]
    row_set: Vec<Vec<Value>>,
}

/// Parses a `shotchartdetail` response. Columns are located by header name.
pub fn parse_shot_chart_json(raw: &str) -> Result<Player> {
    let resp: ShotChartResponse = serde_json::from_str(raw).context("invalid shot chart json")?;
    let set = resp
        .result_sets
        .iter()
        .find(|s| s.name == "Shot_Chart_Detail")
        .or_else(|| resp.result_sets.first())
        .ok_or_else(|| anyhow!("response has no result sets"))?;

    let col = |name: &str| set.headers.iter().position(|h| h == name);
    let loc_x = col("LOC_X").ok_or_else(|| anyhow!("missing LOC_X column"))?;
    let loc_y = col("LOC_Y").ok_or_else(|| anyhow!("missing LOC_Y column"))?;
    let made_col = col("SHOT_MADE_FLAG").ok_or_else(|| anyhow!("missing SHOT_MADE_FLAG column"))?;
    let distance = col("SHOT_DISTANCE");
    let zone = col("SHOT_ZONE_BASIC");
    let action = col("ACTION_TYPE");
    let player_name = col("PLAYER_NAME");
    let player_id = col("PLAYER_ID");

    let mut shots = Vec::with_capacity(set.row_set.len());
    for (idx, row) in set.row_set.iter().enumerate() {
        let x = row
            .get(loc_x)
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("row {idx}: LOC_X is not a number"))?;
        let y = row
            .get(loc_y)
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("row {idx}: LOC_Y is not a number"))?;
        let made = match row.get(made_col) {
            Some(Value::Bool(b)) => *b,
            Some(v) if v.as_i64() == Some(1) => true,
            Some(v) if v.as_i64() == Some(0) => false,
            _ => return Err(anyhow!("row {idx}: SHOT_MADE_FLAG is not 0/1")),
        };
        shots.push(Shot {
            made,
            x,
            y,
            distance: distance.and_then(|i| row.get(i)).and_then(Value::as_f64),
            zone: string_cell(row, zone),
            action: string_cell(row, action),
        });
    }

    let first = set.row_set.first();
    let name = first
        .and_then(|row| string_cell(row, player_name))
        .unwrap_or_default();
    let id = first
        .and_then(|row| player_id.and_then(|i| row.get(i)))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();

    Ok(Player {
        name,
        id,
        bio: None,
        shots,
    })
}

fn string_cell(row: &[Value], idx: Option<usize>) -> Option<String> {
    row.get(idx?)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_carries_season_and_fga() {
        let q = shot_chart_query("201939", "2024-25");
        assert!(q.contains(&("PlayerID", "201939".to_string())));
        assert!(q.contains(&("ContextMeasure", "FGA".to_string())));
        assert!(q.contains(&("LeagueID", "00".to_string())));
    }

    #[test]
    fn empty_row_set_is_empty_player() {
        let raw = r#"{"resultSets":[{"name":"Shot_Chart_Detail","headers":["LOC_X","LOC_Y","SHOT_MADE_FLAG"],"rowSet":[]}]}"#;
        let player = parse_shot_chart_json(raw).unwrap();
        assert!(player.shots.is_empty());
        assert!(player.name.is_empty());
    }

    #[test]
    fn missing_columns_fail() {
        let raw = r#"{"resultSets":[{"name":"Shot_Chart_Detail","headers":["LOC_X"],"rowSet":[]}]}"#;
        assert!(parse_shot_chart_json(raw).is_err());
        assert!(parse_shot_chart_json(r#"{"resultSets":[]}"#).is_err());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
