//! SportsEdge CLI - Command-line interface for odds analytics

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use sportsedge::analysis::performance::{PropForm, Trend};
use sportsedge::analysis::{
    analyze, insights, project_trend, prop_outlook, scan_listings, GameLog, Metric, PropSide,
    ScanConfig, ScanReport,
};
use sportsedge::core::{
    decimal_odds, expected_value, format_odds, implied_probability, payout, KellyCalculator,
    DEFAULT_MIN_MIDDLE,
};
use sportsedge::data::{latest_snapshot, load_listings, sample_listings, sport_key};
use sportsedge::models::GameListing;

#[cfg(feature = "fetch")]
use sportsedge::fetch::{FeedConfig, OddsApiClient};

const DEFAULT_ODDS_DIR: &str = "data/odds";

#[derive(Parser)]
#[command(name = "sportsedge")]
#[command(author, version, about = "Sports betting odds analytics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to odds snapshot directory
    #[arg(long, default_value = DEFAULT_ODDS_DIR)]
    odds_dir: PathBuf,

    /// Show info-level logs
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert American odds to probability, decimal odds and payout
    Convert {
        /// American odds (e.g. -110, +150)
        #[arg(allow_negative_numbers = true)]
        odds: i32,

        /// Stake for the payout
        #[arg(long, default_value = "100")]
        stake: f64,
    },

    /// Expected value of a bet
    Ev {
        /// American odds
        #[arg(allow_negative_numbers = true)]
        odds: i32,

        /// Win probability (0-1); defaults to the implied probability
        #[arg(short, long)]
        probability: Option<f64>,

        #[arg(long, default_value = "100")]
        stake: f64,
    },

    /// Kelly criterion stake sizing
    Kelly {
        /// American odds
        #[arg(allow_negative_numbers = true)]
        odds: i32,

        /// Win probability (0-1)
        #[arg(short, long)]
        probability: f64,

        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Kelly multiplier (0.25 = quarter Kelly)
        #[arg(long, default_value = "1.0")]
        kelly: f64,

        /// Maximum share of bankroll per bet
        #[arg(long, default_value = "0.05")]
        max_fraction: f64,
    },

    /// Scan listings for arbitrage, middles and value bets
    Scan {
        /// Feed JSON file; defaults to the latest snapshot, then sample data
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Sport name or feed key
        #[arg(short, long, default_value = "NBA")]
        sport: String,

        /// Minimum line gap for middles
        #[arg(long, default_value_t = DEFAULT_MIN_MIDDLE)]
        min_middle: f64,

        /// Minimum EV in dollars for value bets
        #[arg(long, default_value = "5.0")]
        min_ev: f64,

        #[arg(long, default_value = "100")]
        stake: f64,

        /// Price value bets against the no-vig consensus
        #[arg(long)]
        no_vig: bool,

        /// Bankroll for Kelly stake suggestions
        #[arg(long, default_value = "1000")]
        bankroll: f64,

        /// Number of value bets to show
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Player form from a game log JSON file
    Player {
        /// JSON array of game logs, oldest first
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "points", value_parser = parse_metric)]
        metric: Metric,

        /// Prop line to check hit rates against
        #[arg(short, long)]
        line: Option<f64>,

        /// Days to project ahead
        #[arg(long, default_value = "5")]
        days: usize,
    },

    /// Fetch live odds and save a snapshot (requires fetch feature)
    #[cfg(feature = "fetch")]
    Fetch {
        /// Sport name or feed key
        #[arg(short, long, default_value = "NBA")]
        sport: String,

        /// Scan the fetched listings with default thresholds
        #[arg(long)]
        scan: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::INFO } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    println!("{}", format!("SportsEdge CLI v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
    println!();

    if cli.interactive {
        run_interactive(&cli.odds_dir)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Convert { odds, stake } => convert(odds, stake)?,
            Commands::Ev {
                odds,
                probability,
                stake,
            } => show_ev(odds, probability, stake)?,
            Commands::Kelly {
                odds,
                probability,
                bankroll,
                kelly,
                max_fraction,
            } => {
                let calc = KellyCalculator::new(bankroll, kelly, max_fraction, 0.30);
                show_kelly(&calc, odds, probability)?;
            }
            Commands::Scan {
                file,
                sport,
                min_middle,
                min_ev,
                stake,
                no_vig,
                bankroll,
                top,
            } => {
                let config = ScanConfig {
                    min_middle,
                    min_ev,
                    stake,
                    no_vig,
                };
                let games = load_games(&cli.odds_dir, file.as_deref(), &sport)?;
                run_scan(&games, &config, bankroll, top)?;
            }
            Commands::Player {
                file,
                metric,
                line,
                days,
            } => run_player(&file, metric, line, days)?,
            #[cfg(feature = "fetch")]
            Commands::Fetch { sport, scan } => run_fetch(&cli.odds_dir, &sport, scan)?,
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn parse_metric(s: &str) -> Result<Metric, String> {
    match s.to_ascii_lowercase().as_str() {
        "points" | "pts" => Ok(Metric::Points),
        "rebounds" | "reb" => Ok(Metric::Rebounds),
        "assists" | "ast" => Ok(Metric::Assists),
        "minutes" | "min" => Ok(Metric::Minutes),
        other => Err(format!("unknown metric `{}`", other)),
    }
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    Ok(pb)
}

/// Dollar EV, green when positive and red when negative
fn format_ev(ev: f64) -> ColoredString {
    let text = format!("${:+.2}", ev);
    if ev > 0.0 {
        text.green()
    } else if ev < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

fn format_point(point: Option<f64>) -> String {
    point.map(|p| format!("{:+.1}", p)).unwrap_or_default()
}

fn convert(odds: i32, stake: f64) -> Result<()> {
    let probability = implied_probability(odds)?;
    let decimal = decimal_odds(odds)?;
    let winnings = payout(odds, stake)?;

    println!("{}", "Odds Conversion:".yellow().bold());
    println!("{}", "-".repeat(40));
    println!("{:<22} {:>12}", "American", format_odds(odds));
    println!("{:<22} {:>12.3}", "Decimal", decimal);
    println!("{:<22} {:>11.1}%", "Implied probability", probability * 100.0);
    println!("{:<22} {:>12}", format!("Payout on ${:.2}", stake), format!("${:.2}", winnings));

    Ok(())
}

fn show_ev(odds: i32, probability: Option<f64>, stake: f64) -> Result<()> {
    let implied = implied_probability(odds)?;
    let p = probability.unwrap_or(implied);
    let ev = expected_value(odds, p, stake)?;

    println!("{}", "Expected Value:".yellow().bold());
    println!("{}", "-".repeat(40));
    println!("{:<22} {:>12}", "Odds", format_odds(odds));
    println!("{:<22} {:>11.1}%", "Implied probability", implied * 100.0);
    println!("{:<22} {:>11.1}%", "Win probability", p * 100.0);
    println!("{:<22} {:>12.2}", "Stake", stake);
    println!("{:<22} {:>12}", "EV", format_ev(ev));

    if ev > 0.0 {
        println!();
        println!("{} Value bet", "→".green());
    }

    Ok(())
}

fn show_kelly(calc: &KellyCalculator, odds: i32, probability: f64) -> Result<()> {
    let sizing = calc.calculate_single(probability, odds)?;

    println!("{}", "Kelly Stake Sizing:".yellow().bold());
    println!("{}", "-".repeat(40));
    println!("{:<22} {:>12}", "Odds", format_odds(sizing.american_odds));
    println!("{:<22} {:>12.3}", "Decimal", sizing.decimal_odds);
    println!("{:<22} {:>11.1}%", "Win probability", sizing.probability * 100.0);
    println!("{:<22} {:>11.2}%", "Full Kelly", sizing.kelly_fraction * 100.0);
    println!("{:<22} {:>12.2}", "Bankroll", calc.bankroll);

    let stake = format!("${:.2}", sizing.stake);
    if sizing.stake > 0.0 {
        println!("{:<22} {:>12}", "Recommended stake", stake.green());
    } else {
        println!("{:<22} {:>12}", "Recommended stake", stake.dimmed());
        println!("{}", "(no edge at this price)".dimmed());
    }

    Ok(())
}

/// Listings from a file, the latest snapshot for the sport, or sample data
fn load_games(odds_dir: &Path, file: Option<&Path>, sport: &str) -> Result<Vec<GameListing>> {
    if let Some(path) = file {
        return load_listings(path).with_context(|| format!("Failed to load {:?}", path));
    }

    let key = sport_key(sport);
    match latest_snapshot(odds_dir, &key) {
        Some(snapshot) => {
            println!("{}: {:?}", "Snapshot".green(), snapshot.path);
            load_listings(&snapshot.path)
                .with_context(|| format!("Failed to load {:?}", snapshot.path))
        }
        None => {
            warn!("No snapshot for {} in {:?}, using sample data", key, odds_dir);
            println!("{}", "(no snapshot found, showing sample data)".dimmed());
            Ok(sample_listings(&key))
        }
    }
}

fn run_scan(games: &[GameListing], config: &ScanConfig, bankroll: f64, top: usize) -> Result<()> {
    let pb = spinner("Scanning markets...")?;
    let report = scan_listings(games, config);
    pb.finish_and_clear();
    let report = report?;

    println!(
        "{}: {} games\n",
        "Scanned".green(),
        report.games_scanned
    );

    print_arbitrage(&report);
    print_middles(&report);
    print_value_bets(&report, bankroll, top)?;

    Ok(())
}

fn print_arbitrage(report: &ScanReport) {
    println!("{}", "Arbitrage:".yellow().bold());
    if report.arbitrage.is_empty() {
        println!("{}\n", "(none)".dimmed());
        return;
    }

    println!("{:<40} {:>8} {:>8} {:>9}", "Game", "Home", "Away", "Profit");
    println!("{}", "-".repeat(68));
    for arb in &report.arbitrage {
        println!(
            "{:<40} {:>8} {:>8} {:>9}",
            truncate(&arb.game, 40),
            format_odds(arb.best_home),
            format_odds(arb.best_away),
            format!("{:.2}%", arb.profit_pct).green()
        );
    }
    println!();
}

fn print_middles(report: &ScanReport) {
    println!("{}", "Middles:".yellow().bold());
    if report.middles.is_empty() {
        println!("{}\n", "(none)".dimmed());
        return;
    }

    println!(
        "{:<32} {:<6} {:>6} {:<28} {:<28}",
        "Game", "Type", "Size", "Side 1", "Side 2"
    );
    println!("{}", "-".repeat(104));
    for m in &report.middles {
        println!(
            "{:<32} {:<6} {:>6.1} {:<28} {:<28}",
            truncate(&m.game, 32),
            m.kind.as_str(),
            m.middle_size,
            truncate(&format!("{} {} {} ({})", m.book1, m.outcome1, m.line1, format_odds(m.odds1)), 28),
            truncate(&format!("{} {} {} ({})", m.book2, m.outcome2, m.line2, format_odds(m.odds2)), 28),
        );
    }
    println!();
}

fn print_value_bets(report: &ScanReport, bankroll: f64, top: usize) -> Result<()> {
    println!("{}", "Value Bets:".yellow().bold());
    if report.value_bets.is_empty() {
        println!("{}\n", "(none)".dimmed());
        return Ok(());
    }

    let shown: Vec<_> = report.value_bets.iter().take(top).collect();
    let kelly = KellyCalculator::with_defaults(bankroll);
    let bets: Vec<(f64, i32)> = shown.iter().map(|b| (b.model_prob, b.odds)).collect();
    let sizings = kelly.calculate_multiple(&bets)?;

    println!(
        "{:<32} {:<8} {:<24} {:>7} {:<12} {:>7} {:>10} {:>9}",
        "Game", "Market", "Outcome", "Odds", "Book", "Prob", "EV", "Stake"
    );
    println!("{}", "-".repeat(118));
    for (bet, sizing) in shown.iter().zip(&sizings) {
        let outcome = format!("{} {}", bet.outcome, format_point(bet.point));
        println!(
            "{:<32} {:<8} {:<24} {:>7} {:<12} {:>6.1}% {:>10} {:>9}",
            truncate(&bet.game, 32),
            truncate(&bet.bet_type, 8),
            truncate(outcome.trim_end(), 24),
            format_odds(bet.odds),
            truncate(&bet.bookmaker, 12),
            bet.model_prob * 100.0,
            format_ev(bet.ev),
            format!("${:.2}", sizing.stake)
        );
    }

    if report.value_bets.len() > shown.len() {
        println!(
            "{}",
            format!("... {} more", report.value_bets.len() - shown.len()).dimmed()
        );
    }
    println!();

    Ok(())
}

fn trend_label(trend: Trend) -> ColoredString {
    match trend {
        Trend::Up => "up".green(),
        Trend::Down => "down".red(),
        Trend::Neutral => "neutral".normal(),
    }
}

fn run_player(file: &Path, metric: Metric, line: Option<f64>, days: usize) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read game log {:?}", file))?;
    let logs: Vec<GameLog> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse game log {:?}", file))?;

    let Some(summary) = analyze(&logs, metric) else {
        println!("{}", "No games in log.".red());
        return Ok(());
    };

    println!("{} ({:?}, {} games)", "Performance".yellow().bold(), metric, logs.len());
    println!("{}", "-".repeat(40));
    println!("{:<16} {:>12}", "Trend", trend_label(summary.trend));
    println!("{:<16} {:>12.1}", "Last 5 avg", summary.last_5_avg);
    println!("{:<16} {:>12.1}", "Last 10 avg", summary.last_10_avg);
    println!("{:<16} {:>12.2}", "Consistency", summary.consistency);
    println!("{:<16} {:>12.1}", "Peak", summary.peak);
    println!("{:<16} {:>12}", "Peak date", summary.peak_date);
    println!("{:<16} {:>11.1}%", "Momentum", summary.momentum * 100.0);
    println!();

    if let Some(i) = insights(&logs) {
        println!(
            "Scoring L5: avg {:.1}, range {:.0}-{:.0}, trend {}",
            i.avg_points,
            i.floor,
            i.ceiling,
            trend_label(i.trend)
        );
        println!();
    }

    if let Some(line) = line {
        println!("{} {:.1}", "Prop line".yellow().bold(), line);
        for side in [PropSide::Over, PropSide::Under] {
            if let Some(outlook) = prop_outlook(&logs, metric, line, side) {
                let form = match outlook.form {
                    PropForm::Hot => "hot".red().bold(),
                    PropForm::Rising => "rising".green(),
                    PropForm::Cooling => "cooling".dimmed(),
                };
                println!(
                    "  {:<6} L5 {:>5.0}%  L10 {:>5.0}%  {}",
                    format!("{:?}", side),
                    outlook.hit_rate_5,
                    outlook.hit_rate_10,
                    form
                );
            }
        }
        println!();
    }

    let values: Vec<f64> = logs.iter().map(|log| metric.value(log)).collect();
    let projection = project_trend(&values, days);
    if projection.is_empty() {
        println!("{}", "(need at least 3 games to project)".dimmed());
    } else {
        let shown: Vec<String> = projection.iter().map(|v| format!("{:.1}", v)).collect();
        println!("{}: {}", "Projection".green(), shown.join(", "));
    }

    Ok(())
}

#[cfg(feature = "fetch")]
fn run_fetch(odds_dir: &Path, sport: &str, scan: bool) -> Result<()> {
    let key = sport_key(sport);
    println!("{}: {}", "Fetching".green(), key);

    // Create runtime for async operations
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let client = OddsApiClient::new(FeedConfig::from_env())?;

    let pb = spinner(&format!("Fetching {} odds...", key))?;
    let result = rt.block_on(client.fetch_events(&key));
    pb.finish_and_clear();
    let events = result.with_context(|| format!("Failed to fetch odds for {}", key))?;

    let path = sportsedge::data::save_snapshot(odds_dir, &key, &events, chrono::Utc::now())
        .context("Failed to save snapshot")?;
    println!("{}: {:?}", "Saved".green(), path);
    println!("Events: {}", events.len());
    println!();

    if scan {
        let games = sportsedge::data::to_listings(events);
        run_scan(&games, &ScanConfig::default(), 1_000.0, 20)?;
    }

    Ok(())
}

fn run_interactive(odds_dir: &Path) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Choose Quit to exit.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec![
            "Convert odds",
            "Expected value",
            "Kelly stake",
            "Scan markets",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        // Bad numbers from a prompt are reported and the menu comes back
        let outcome = match selection {
            0 => {
                let odds: i32 = Input::with_theme(&theme)
                    .with_prompt("American odds")
                    .interact_text()?;
                println!();
                convert(odds, 100.0)
            }
            1 => {
                let odds: i32 = Input::with_theme(&theme)
                    .with_prompt("American odds")
                    .interact_text()?;
                let probability: f64 = Input::with_theme(&theme)
                    .with_prompt("Win probability (0-1)")
                    .interact_text()?;
                let stake: f64 = Input::with_theme(&theme)
                    .with_prompt("Stake")
                    .default(100.0)
                    .interact_text()?;
                println!();
                show_ev(odds, Some(probability), stake)
            }
            2 => {
                let odds: i32 = Input::with_theme(&theme)
                    .with_prompt("American odds")
                    .interact_text()?;
                let probability: f64 = Input::with_theme(&theme)
                    .with_prompt("Win probability (0-1)")
                    .interact_text()?;
                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Bankroll")
                    .default(1_000.0)
                    .interact_text()?;
                println!();
                show_kelly(&KellyCalculator::with_defaults(bankroll), odds, probability)
            }
            3 => {
                let sport: String = Input::with_theme(&theme)
                    .with_prompt("Sport")
                    .default("NBA".to_string())
                    .interact_text()?;
                let no_vig = Select::with_theme(&theme)
                    .with_prompt("Probability model")
                    .items(&["Market implied", "No-vig consensus"])
                    .default(0)
                    .interact()?
                    == 1;
                println!();
                let config = ScanConfig {
                    no_vig,
                    ..ScanConfig::default()
                };
                load_games(odds_dir, None, &sport)
                    .and_then(|games| run_scan(&games, &config, 1_000.0, 20))
            }
            4 => {
                println!("Goodbye!");
                break;
            }
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            println!("{}: {}", "Error".red(), e);
        }
        println!();
    }

    Ok(())
}

/// Truncate text to fit display width
fn truncate(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        text.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("points"), Ok(Metric::Points));
        assert_eq!(parse_metric("REB"), Ok(Metric::Rebounds));
        assert!(parse_metric("steals").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Celtics", 10), "Celtics");
        assert_eq!(truncate("Philadelphia 76ers", 8), "Philade…");
    }

    #[test]
    fn test_format_point() {
        assert_eq!(format_point(Some(-3.5)), "-3.5");
        assert_eq!(format_point(Some(220.0)), "+220.0");
        assert_eq!(format_point(None), "");
    }

    #[test]
    fn test_cli_parses_negative_odds() {
        let cli = Cli::try_parse_from(["sportsedge", "convert", "-110"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Convert { odds: -110, .. })));
    }

    #[test]
    fn test_load_games_falls_back_to_sample() {
        let dir = tempfile::tempdir().unwrap();
        let games = load_games(dir.path(), None, "NBA").unwrap();
        assert_eq!(games.len(), 2);
        assert!(games.iter().all(|g| g.sport_key == "basketball_nba"));
    }
}
