use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing::warn;

use ballin::config::{self, AppConfig};
use ballin::export;
use ballin::roster::Roster;

fn main() -> Result<()> {
    config::load_dotenv();
    ballin::logging::init_cli_logging()?;
    let cfg = AppConfig::from_env();
    cfg.install_roster()?;

    let out = parse_out_arg().unwrap_or_else(|| PathBuf::from("shot_report.xlsx"));
    let store = cfg.store();

    let mut players = Vec::new();
    for (name, id) in Roster::active().iter() {
        match store.load(id) {
            Ok(player) => players.push(player),
            Err(err) => warn!(player = %name, error = %err, "skipped"),
        }
    }
    if players.is_empty() {
        return Err(anyhow!(
            "no player records found under {}",
            store.root().display()
        ));
    }

    let refs = players.iter().map(|p| p.as_ref()).collect::<Vec<_>>();
    let report = export::export_shot_report_with_progress(&out, &refs, |p| {
        eprintln!("[{}/{}] {}", p.current, p.total, p.message);
    })?;

    println!("Export complete: {}", out.display());
    println!(
        "Players: {} | zone rows: {} | shot rows: {}",
        report.players, report.zone_rows, report.shot_rows
    );
    Ok(())
}

fn parse_out_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--out=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
