//! Mix Tester CLI Tool
//!
//! Command-line tool for trying mixes offline, without the HTTP service.
//!
//! Usage:
//!   cargo run --bin mix-tester -- --help
//!   cargo run --bin mix-tester mix --text "ana, bob (cid, dora) eva"
//!   cargo run --bin mix-tester mix --text "ana, bob, cid" --seed 42 --reshuffles 2
//!   cargo run --bin mix-tester normalize --text "a;b - c,c"
//!   cargo run --bin mix-tester groups --text "(ana, bob) [cid, dora]"
//!   cargo run --bin mix-tester voice ana bob "cid junior"

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use team_mixer::config::MixSettings;
use team_mixer::groups::extract_groups;
use team_mixer::report::render;
use team_mixer::roster::{normalize, roster_from_names};
use team_mixer::types::{Group, MentionMap, Roster};

#[derive(Parser)]
#[command(name = "mix-tester")]
#[command(about = "Offline team mixing tool for trying listings without the service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mix a player listing into two teams
    Mix {
        /// Player listing, e.g. "ana, bob (cid, dora) eva"
        #[arg(short, long)]
        text: String,
        /// Players per team
        #[arg(long, default_value = "5")]
        team_size: usize,
        /// RNG seed for reproducible draws
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of extra reshuffles to print after the first draw
        #[arg(short, long, default_value = "0")]
        reshuffles: u32,
    },
    /// Show the deduplicated roster parsed from a listing
    Normalize {
        /// Player listing
        #[arg(short, long)]
        text: String,
    },
    /// Show the anti-stacking groups parsed from a listing
    Groups {
        /// Player listing
        #[arg(short, long)]
        text: String,
    },
    /// Mix a voice channel roster (names given as arguments, no parsing)
    Voice {
        /// Member display names
        #[arg(required = true)]
        names: Vec<String>,
        /// Players per team
        #[arg(long, default_value = "5")]
        team_size: usize,
        /// RNG seed for reproducible draws
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn settings_for(team_size: usize) -> MixSettings {
    MixSettings {
        team_size,
        ..MixSettings::default()
    }
}

fn print_mix(roster: &Roster, groups: &[Group], settings: &MixSettings, seed: Option<u64>) {
    let mut rng = make_rng(seed);
    let report = render(roster, groups, settings, &mut rng);

    println!("{}", report.text);
    println!();
    println!(
        "📊 {} players, {} groups, {} waitlisted",
        roster.len(),
        groups.len(),
        report.assignment.waitlist.len()
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // The CLI has no chat platform behind it, so there are no mention ids
    // to resolve. Tokens like <@123> get dropped the same way the service
    // drops unknown mentions.
    let mentions = MentionMap::new();

    match cli.command {
        Commands::Mix {
            text,
            team_size,
            seed,
            reshuffles,
        } => {
            let roster = normalize(&text, &mentions);
            let groups = extract_groups(&text, &mentions);
            let settings = settings_for(team_size);

            print_mix(&roster, &groups, &settings, seed);

            for round in 1..=reshuffles {
                println!();
                println!("🔁 Reshuffle {}:", round);
                println!();
                // Derive follow-up seeds so --seed stays reproducible end to end
                print_mix(&roster, &groups, &settings, seed.map(|s| s.wrapping_add(round as u64)));
            }
        }

        Commands::Normalize { text } => {
            let roster = normalize(&text, &mentions);
            if roster.is_empty() {
                println!("No players found.");
            } else {
                println!("✅ {} players:", roster.len());
                for player in &roster {
                    println!("  - {}", player);
                }
            }
        }

        Commands::Groups { text } => {
            let groups = extract_groups(&text, &mentions);
            if groups.is_empty() {
                println!("No groups found.");
            } else {
                println!("✅ {} groups:", groups.len());
                for (i, group) in groups.iter().enumerate() {
                    let members: Vec<String> =
                        group.members().iter().map(|p| p.to_string()).collect();
                    println!("  Group {}: {}", i + 1, members.join(", "));
                }
            }
        }

        Commands::Voice {
            names,
            team_size,
            seed,
        } => {
            let roster = roster_from_names(&names);
            let settings = settings_for(team_size);
            print_mix(&roster, &[], &settings, seed);
        }
    }

    Ok(())
}
