use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{info, warn};

use ballin::config::{self, AppConfig};
use ballin::nba_fetch;
use ballin::roster::Roster;

fn main() -> Result<()> {
    config::load_dotenv();
    ballin::logging::init_cli_logging()?;
    let cfg = AppConfig::from_env();
    cfg.install_roster()?;

    let season = parse_season_arg().unwrap_or_else(|| cfg.season.clone());
    let only = parse_only_arg();
    let pause = std::env::var("BALLIN_FETCH_PAUSE_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(600);

    let store = cfg.store();
    let roster = Roster::active();
    let targets = roster
        .iter()
        .filter(|(name, id)| match &only {
            Some(filter) => filter
                .iter()
                .any(|f| f.as_str() == *id || f.eq_ignore_ascii_case(name)),
            None => true,
        })
        .collect::<Vec<_>>();
    if targets.is_empty() {
        return Err(anyhow!("no roster players matched"));
    }

    println!(
        "Fetching {} players for {} into {}",
        targets.len(),
        season,
        store.root().display()
    );
    let mut saved = 0usize;
    let mut errors = Vec::new();
    for (idx, (name, id)) in targets.iter().enumerate() {
        if idx > 0 && pause > 0 {
            std::thread::sleep(Duration::from_millis(pause));
        }
        match nba_fetch::fetch_player_shots(id, name, &season)
            .and_then(|player| store.save(&player).map(|path| (player, path)))
        {
            Ok((player, path)) => {
                saved += 1;
                info!(player = %name, shots = player.shots.len(), path = %path.display(), "saved");
            }
            Err(err) => {
                warn!(player = %name, error = %format!("{err:#}"), "fetch failed");
                errors.push(format!("{name} ({id}): {err:#}"));
            }
        }
    }

    println!("Saved {saved}/{}", targets.len());
    if !errors.is_empty() {
        println!("  errors: {}", errors.len());
        for err in errors.iter().take(6) {
            println!("   - {err}");
        }
    }
    Ok(())
}

fn parse_season_arg() -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--season=") {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == "--season"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

/// `--only 201939,Stephen Curry` restricts the run to matching ids or names.
fn parse_only_arg() -> Option<Vec<String>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        let raw = if let Some(raw) = arg.strip_prefix("--only=") {
            Some(raw)
        } else if arg == "--only" {
            args.get(idx + 1).map(String::as_str)
        } else {
            None
        };
        if let Some(raw) = raw {
            let items = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>();
            if !items.is_empty() {
                return Some(items);
            }
        }
    }
    None
}
