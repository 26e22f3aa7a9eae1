use std::env;
use std::process::ExitCode;

use getopts::Options;
use log::{error, info};

use grand_prix_times::modules::helpers::config::Config;
use grand_prix_times::modules::helpers::logging::setup_logging;
use grand_prix_times::modules::helpers::time_codec::TimeCodec;
use grand_prix_times::modules::scoring::ResultsEngine;
use grand_prix_times::modules::store::postgres::PgStore;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} -r RACE_ID", program);
    print!("{}", opts.usage(&brief));
}

/// re-run the scoring pass of a race, e.g. after a pass stopped halfway
fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("r", "race", "id of the race to recalculate", "RACE_ID");
    opts.optflag("h", "help", "print this help menu");
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, opts);
            return ExitCode::FAILURE;
        }
    };

    let race_id: i32 = match matches.opt_str("r").map(|race| race.parse()) {
        Some(Ok(race_id)) if !matches.opt_present("h") => race_id,
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
    config.log_summary();

    let mut store = match PgStore::connect(&config) {
        Ok(store) => store,
        Err(error) => {
            error!(target: "recalculate_race", "{}", error);
            return ExitCode::FAILURE;
        }
    };

    let engine = ResultsEngine::from_config(&config);
    match engine.recalculate_race(&mut store, race_id) {
        Ok(results) => {
            for result in results {
                info!(target: "recalculate_race", "P{} {} {} ({}p, {}kg{})",
                    result.derived.placement,
                    result.display_name,
                    TimeCodec::format(result.duration_seconds),
                    result.derived.points,
                    result.derived.handicap_kg,
                    if result.derived.is_fastest_lap { ", fastest lap" } else { "" });
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(target: "recalculate_race", "recalculating race {} failed, run again: {}", race_id, error);
            ExitCode::FAILURE
        }
    }
}
