use color_eyre::eyre::{Result, WrapErr};
use database::{ScenarioLoader, SquadLoader};
use env_logger::Env;
use log::info;
use match_core::utils::TimeEstimation;
use match_core::{FootballEngine, MatchConfig, MatchResult, NarrativeScenario};
use std::env;
use std::str::FromStr;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_SEED: u64 = 42;

fn main() -> Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let seed: u64 = env_or("SEED", DEFAULT_SEED)?;
    let matches: u64 = env_or("MATCHES", 1)?;

    let mut config = MatchConfig::default().with_seed(seed);
    config.duration_seconds = env_or("DURATION", config.duration_seconds)?;
    config.verbose = env::var("VERBOSE").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let fixture = match env::var("SQUADS") {
        Ok(path) => SquadLoader::from_path(&path).wrap_err_with(|| format!("loading squads from {path}"))?,
        Err(_) => SquadLoader::bundled()?,
    };

    let scenario = load_scenario()?;

    info!(
        "{} vs {}, {} match(es) from seed {}, {:.0}s each",
        fixture.home.team_name, fixture.away.team_name, matches, seed, config.duration_seconds
    );

    if matches <= 1 {
        let (result, estimated) = TimeEstimation::estimate(|| {
            FootballEngine::play(&fixture.home, &fixture.away, &config, scenario.as_ref())
        });
        let result = result?;

        log_summary(&result);
        info!("match played: {} ms", estimated);

        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let seeds: Vec<u64> = (seed..seed + matches).collect();

        let (results, estimated) = TimeEstimation::estimate(|| {
            FootballEngine::play_batch(&fixture.home, &fixture.away, &config, scenario.as_ref(), &seeds)
        });
        let results = results?;

        results.iter().for_each(log_summary);

        let home_wins = results.iter().filter(|r| r.home_goals() > r.away_goals()).count();
        let away_wins = results.iter().filter(|r| r.away_goals() > r.home_goals()).count();

        info!(
            "batch of {} played: {} ms, home wins {}, draws {}, away wins {}",
            results.len(),
            estimated,
            home_wins,
            results.len() - home_wins - away_wins,
            away_wins
        );

        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}

/// `SCENARIO=bundled` uses the shipped storyline, any other value is a path.
fn load_scenario() -> Result<Option<NarrativeScenario>> {
    match env::var("SCENARIO") {
        Ok(value) if value == "bundled" => Ok(Some(ScenarioLoader::bundled()?)),
        Ok(path) => Ok(Some(
            ScenarioLoader::from_path(&path).wrap_err_with(|| format!("loading scenario from {path}"))?,
        )),
        Err(_) => Ok(None),
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .wrap_err_with(|| format!("invalid {name}={value}")),
        Err(_) => Ok(default),
    }
}

fn log_summary(result: &MatchResult) {
    let stats = &result.statistics;

    info!(
        "seed {}: {}-{}, possession {:.1}%/{:.1}%, shots {}/{}, xG {:.2}/{:.2}, {} anomalies, {:.0}x realtime",
        result.seed,
        result.home_goals(),
        result.away_goals(),
        stats.home.possession_percent,
        stats.away.possession_percent,
        stats.home.shots,
        stats.away.shots,
        stats.home.expected_goals,
        stats.away.expected_goals,
        stats.anomalies,
        result.performance.simulation_speed
    );
}
