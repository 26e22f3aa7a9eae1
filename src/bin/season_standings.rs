use std::env;
use std::process::ExitCode;

use getopts::Options;
use log::error;

use grand_prix_times::modules::helpers::config::Config;
use grand_prix_times::modules::helpers::logging::setup_logging;
use grand_prix_times::modules::standings::Standings;
use grand_prix_times::modules::store::postgres::PgStore;
use grand_prix_times::modules::traits::race_catalog::RaceCatalog;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} -s SEASON_ID", program);
    print!("{}", opts.usage(&brief));
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("s", "season", "id of the season", "SEASON_ID");
    opts.optflag("h", "help", "print this help menu");
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, opts);
            return ExitCode::FAILURE;
        }
    };

    let season_id: i32 = match matches.opt_str("s").map(|season| season.parse()) {
        Some(Ok(season_id)) if !matches.opt_present("h") => season_id,
        _ => {
            print_usage(&program, opts);
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = setup_logging(&config) {
        eprintln!("Error setting up logging: {}", error);
        return ExitCode::FAILURE;
    }

    let mut store = match PgStore::connect(&config) {
        Ok(store) => store,
        Err(error) => {
            error!(target: "season_standings", "{}", error);
            return ExitCode::FAILURE;
        }
    };

    let season = match store.find_season(season_id) {
        Ok(Some(season)) => season,
        Ok(None) => {
            error!(target: "season_standings", "season {} does not exist", season_id);
            return ExitCode::FAILURE;
        }
        Err(error) => {
            error!(target: "season_standings", "{}", error);
            return ExitCode::FAILURE;
        }
    };

    match Standings::for_season(&mut store, season_id) {
        Ok(standings) => {
            println!("{}", season.name);
            if standings.is_empty() {
                println!("no results yet");
            }
            for entry in standings {
                println!("{}. {} — {} p, {} kg total", entry.rank, entry.display_name, entry.points, entry.handicap_kg);
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(target: "season_standings", "{}", error);
            ExitCode::FAILURE
        }
    }
}
