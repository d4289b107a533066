use clap::{Parser, Subcommand};
use std::path::PathBuf;
use team_forge::strategy::MoveStrategy;
use team_forge::types::Type;
use team_forge::{run, CliOptions, Command};

#[derive(Debug, Parser)]
#[command(name = "team-forge", version, about = "Searches for a team that beats the Elite Four")]
struct Cli {
    /// JSON config file; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON candidate pool; the built-in pool is used otherwise
    #[arg(long, global = true)]
    pool: Option<PathBuf>,
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the genetic search and print the best team
    Optimize {
        #[arg(long)]
        generations: Option<usize>,
        #[arg(long)]
        population: Option<usize>,
        /// Write a JSON summary here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the per-opponent table as CSV here
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Only consider pool entries with at least one of these types
        #[arg(long, value_delimiter = ',')]
        require_types: Vec<Type>,
        /// Only consider pool entries whose base stats sum to at least this
        #[arg(long)]
        min_total_stats: Option<u32>,
    },
    /// Study a named team: per-opponent and per-member results, level sweep
    Analyze {
        #[arg(long, value_delimiter = ',', required = true)]
        team: Vec<String>,
        #[arg(long, default_value_t = 100)]
        simulations: usize,
        /// Write the full analysis as JSON here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write team_performance.csv and individual_performance.csv here
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Battle a named team against every opponent, or just one
    Simulate {
        #[arg(long, value_delimiter = ',', required = true)]
        team: Vec<String>,
        #[arg(long, default_value_t = 100)]
        simulations: usize,
        #[arg(long)]
        strategy: Option<MoveStrategy>,
        #[arg(long)]
        opponent: Option<String>,
    },
    /// Print one full match against the first opponent
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let command = match cli.command {
        Commands::Optimize {
            generations,
            population,
            output,
            csv,
            require_types,
            min_total_stats,
        } => Command::Optimize {
            generations,
            population,
            output,
            csv,
            required_types: require_types,
            min_total_stats,
        },
        Commands::Analyze {
            team,
            simulations,
            output,
            csv_dir,
        } => Command::Analyze {
            team,
            simulations,
            output,
            csv_dir,
        },
        Commands::Simulate {
            team,
            simulations,
            strategy,
            opponent,
        } => Command::Simulate {
            team,
            simulations,
            strategy,
            opponent,
        },
        Commands::Demo => Command::Demo,
    };
    run(CliOptions {
        config_path: cli.config,
        pool_path: cli.pool,
        seed: cli.seed,
        command,
    })
}
