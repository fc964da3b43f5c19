use clap::{Args, Parser, Subcommand};
use common::api::{RunConfig, RunSettings};
use common::results::Mode;
use std::path::PathBuf;

pub const DEFAULT_SERVER: &str = "http://localhost:8080";

#[derive(Parser, Debug)]
#[command(
    name = "tankview-terminal",
    about = "Replay tank battles, read their results and drive simulator runs from the terminal"
)]
pub struct Cli {
    /// File the TUI writes its logs to
    #[arg(long, env = "TANKVIEW_LOG", default_value = "tankview-terminal.log", global = true)]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Step through snapshot files (.json or .json.gz)
    Replay(ReplayArgs),
    /// Show a results file, or the latest results on the server
    Results(ResultsArgs),
    /// Start a simulator run on the server and follow its output
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Snapshot file, or a directory to pick one from
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Milliseconds between snapshots while playing
    #[arg(long, default_value_t = 500)]
    pub speed_ms: u64,
}

#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// basic | comparative | competition
    #[arg(long)]
    pub mode: Mode,

    /// Read results from this file instead of the server
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Map file giving the board size for board dumps
    #[arg(long)]
    pub map: Option<PathBuf>,

    #[arg(long, env = "TANKVIEW_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(long, env = "TANKVIEW_SERVER", default_value = DEFAULT_SERVER, global = true)]
    pub server: String,

    /// Ask the simulator for verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print the simulator command and exit without submitting
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub mode: RunMode,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RunMode {
    /// One game between two algorithms
    Basic {
        #[arg(long)]
        game_map: String,
        #[arg(long)]
        game_manager: String,
        #[arg(long)]
        algorithm1: String,
        #[arg(long)]
        algorithm2: String,
    },
    /// One map and two algorithms across every game manager in a folder
    Comparative {
        #[arg(long)]
        game_map: String,
        #[arg(long)]
        game_managers_folder: String,
        #[arg(long)]
        algorithm1: String,
        #[arg(long)]
        algorithm2: String,
        #[arg(long)]
        num_threads: Option<u32>,
    },
    /// Every algorithm in a folder against each other over a folder of maps
    Competition {
        #[arg(long)]
        game_maps_folder: String,
        #[arg(long)]
        game_manager: String,
        #[arg(long)]
        algorithms_folder: String,
        #[arg(long)]
        num_threads: Option<u32>,
    },
}

impl RunArgs {
    pub fn config(&self) -> RunConfig {
        let settings = match self.mode.clone() {
            RunMode::Basic {
                game_map,
                game_manager,
                algorithm1,
                algorithm2,
            } => RunSettings::Basic {
                game_map,
                game_manager,
                algorithm1,
                algorithm2,
            },
            RunMode::Comparative {
                game_map,
                game_managers_folder,
                algorithm1,
                algorithm2,
                num_threads,
            } => RunSettings::Comparative {
                game_map,
                game_managers_folder,
                algorithm1,
                algorithm2,
                num_threads,
            },
            RunMode::Competition {
                game_maps_folder,
                game_manager,
                algorithms_folder,
                num_threads,
            } => RunSettings::Competition {
                game_maps_folder,
                game_manager,
                algorithms_folder,
                num_threads,
            },
        };
        RunConfig {
            settings,
            verbose: self.verbose,
        }
    }

    /// Map whose header sizes the result board dumps, when the mode has one.
    pub fn map_path(&self) -> Option<&str> {
        match &self.mode {
            RunMode::Basic { game_map, .. } | RunMode::Comparative { game_map, .. } => {
                Some(game_map)
            }
            RunMode::Competition { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_subcommand_builds_config() {
        let cli = Cli::try_parse_from([
            "tankview-terminal",
            "run",
            "--verbose",
            "comparative",
            "--game-map",
            "maps/m.txt",
            "--game-managers-folder",
            "gms",
            "--algorithm1",
            "a.so",
            "--algorithm2",
            "b.so",
            "--num-threads",
            "3",
        ])
        .unwrap();

        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = args.config();
        assert_eq!(config.mode(), Mode::Comparative);
        assert!(config.verbose);
        assert_eq!(args.map_path(), Some("maps/m.txt"));
        assert!(config.command_preview().contains("numThreads=\"3\""));
    }

    #[test]
    fn results_mode_is_validated() {
        assert!(Cli::try_parse_from(["tankview-terminal", "results", "--mode", "tournament"]).is_err());

        let cli =
            Cli::try_parse_from(["tankview-terminal", "results", "--mode", "competition"]).unwrap();
        let Command::Results(args) = cli.command else {
            panic!("expected results");
        };
        assert_eq!(args.mode, Mode::Competition);
        assert!(args.file.is_none());
    }
}
