mod audio;
mod error;
mod games;
mod terminal;

use clap::{Parser, Subcommand};
use error::{Error, Result};
use games::color_fill::FillConfig;
use games::scavenger::ScavengerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "lab-games",
    version,
    about = "Two small terminal games",
    long_about = "A colour fill puzzle and a falling-asteroid arcade game.\n\nRun without a command to pick a game from a menu.\n\nExamples:\n  lab-games fill --size 6\n  lab-games scavenger --seed 7 --mute"
)]
struct Cli
{
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// List the available games.
    List,

    /// Fill the grid so no two neighbouring cells share a colour.
    Fill {
        /// Board edge length in cells.
        #[arg(long)]
        size: Option<usize>,
    },

    /// Dodge falling asteroids and collect energy crystals.
    Scavenger {
        /// Seed for asteroid and crystal placement.
        #[arg(long, env = "LAB_GAMES_SEED")]
        seed: Option<u64>,

        /// Play without sound.
        #[arg(long, env = "LAB_GAMES_MUTE", value_parser = clap::builder::FalseyValueParser::new())]
        mute: bool,
    },
}

fn main()
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()>
{
    match cli.command {
        None => interactive_menu(),
        Some(Commands::List) => {
            list_games();
            Ok(())
        }
        Some(Commands::Fill { size }) => games::color_fill::run(FillConfig::from_size(size)?),
        Some(Commands::Scavenger { seed, mute }) => {
            games::scavenger::run(ScavengerConfig::new(seed, mute))
        }
    }
}

fn run_default(name: &str) -> Result<()>
{
    log::debug!("launching {name} with defaults");
    match name {
        "fill" => games::color_fill::run(FillConfig::default()),
        "scavenger" => games::scavenger::run(ScavengerConfig::default()),
        _ => Err(Error::Usage(format!(
            "Unknown game '{name}'. Run with --help."
        ))),
    }
}

fn interactive_menu() -> Result<()>
{
    let registry = games::registry();
    println!("Lab Games");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        println!("  {}. {} - {}", idx + 1, game.name, game.description);
    }
    println!();
    print!("Enter number or name (default 1, q to quit): ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let choice = input.trim();

    if choice.is_empty() {
        return run_default(registry[0].name);
    }
    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= registry.len() {
            return run_default(registry[index - 1].name);
        }
    }
    if let Some(game) = games::find(choice) {
        return run_default(game.name);
    }

    Err(Error::Usage("Invalid selection.".to_string()))
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<10} - {}", game.name, game.description);
    }
}
