use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use ballin::config::{self, AppConfig};
use ballin::sessions::FormSession;
use ballin::synthetic::{self, ShooterProfile};

const DEFAULT_DAYS: u32 = 5;
const DEFAULT_SHOTS: usize = 60;

fn main() -> Result<()> {
    config::load_dotenv();
    ballin::logging::init_cli_logging()?;
    let cfg = AppConfig::from_env();

    let days: u32 = parse_num_arg("--days")?.unwrap_or(DEFAULT_DAYS);
    let shots: usize = parse_num_arg("--shots")?.unwrap_or(DEFAULT_SHOTS);
    let seed: u64 = parse_num_arg("--seed")?.unwrap_or(7);
    let profile = match parse_str_arg("--profile").as_deref() {
        Some("spot-up") => ShooterProfile::spot_up(),
        Some("interior") => ShooterProfile::interior(),
        _ => ShooterProfile::default(),
    };

    let library = cfg.sessions();
    let mut rng = StdRng::seed_from_u64(seed);
    let today = Local::now().date_naive();

    let first = session_day(today, days.saturating_sub(1))?;
    info!(first = %first, days, "seeding sessions");

    for offset in (0..days).rev() {
        let date = session_day(today, offset)?;
        let recorded_at = date.and_hms_opt(18, 0, 0).map(|t| t.to_string());
        let session = synthetic::generate_session(&mut rng, &profile, shots, recorded_at);
        let made = session.shots.iter().filter(|s| s.made).count();
        let path = library
            .write_accuracy_session(date, &session)
            .with_context(|| format!("write accuracy session for {date}"))?;
        info!(date = %date, shots = session.shots.len(), made, path = %path.display(), "accuracy session");

        if offset % 2 == 0 {
            let form = FormSession {
                score: Some(60.0 + (made as f64 / shots.max(1) as f64) * 40.0),
                notes: vec!["elbow in".to_string(), "hold follow-through".to_string()],
            };
            library
                .write_form_session(date, &form)
                .with_context(|| format!("write form session for {date}"))?;
        }
    }

    println!(
        "Seeded {days} days of sessions under {}",
        library.root().display()
    );
    Ok(())
}

fn parse_str_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_num_arg<T: FromStr>(name: &str) -> Result<Option<T>> {
    let Some(raw) = parse_str_arg(name) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| anyhow!("{name} {raw} is not a valid count"))
}

/// Sessions are spaced two days apart, counting back from `today`.
fn session_day(today: NaiveDate, offset: u32) -> Result<NaiveDate> {
    today
        .checked_sub_signed(ChronoDuration::days(i64::from(offset) * 2))
        .ok_or_else(|| anyhow!("{offset} sessions back from {today} is out of the calendar range"))
}
