//! # tileboard_cli
//!
//! Part of the tileboard_locator crate family.
//!
//! Command line access to the tileboard channel lookup. Every invocation takes the path
//! to a session configuration and one subcommand:
//!
//! ```bash
//! tileboard_cli -p session.yaml new
//! tileboard_cli -p session.yaml locate --x -361.4 --y -752.0
//! tileboard_cli -p session.yaml targets
//! tileboard_cli -p session.yaml classify --hits recorded_hits.csv
//! ```
//!
//! - `new` writes a template configuration to the given path
//! - `locate` prints the channel under one stage position
//! - `targets` writes one beam target per populated tile to the configured `target_path`
//! - `classify` reads a CSV of hit positions (label,x,y) and writes the channel of each
//!   hit to the configured `classified_path`
//!
//! Library messages are written to `tileboard.log` in the working directory.
use clap::{value_parser, Arg, ArgMatches, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libtileboard::config::Config;
use libtileboard::targets::{
    classify_hits, generate_targets, read_hits, write_classified, write_targets,
};

const CLASSIFY_CHUNK_SIZE: usize = 1000;

fn make_template_config(path: &Path) -> Result<(), Box<dyn Error>> {
    Config::default().write_config_file(path)?;
    Ok(())
}

fn locate_position(config: &Config, matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let x = *matches.get_one::<f64>("x").ok_or("Missing x position")?;
    let y = *matches.get_one::<f64>("y").ok_or("Missing y position")?;
    let locator = config.locator()?;

    // Stage coordinates are mirrored in x with respect to the board
    let board_x = if config.targets.mirror_x { -x } else { x };
    let (r, phi) = locator.frame().cartesian_to_polar(board_x, y);
    let result = locator.locate(board_x, y);
    log::info!("Position ({x:.2}, {y:.2}) -> r, phi = {r:.2}, {phi:.2} -> Channel {result}");
    Ok(())
}

fn write_target_list(config: &Config) -> Result<(), Box<dyn Error>> {
    let board = config.load_board()?;
    let targets = generate_targets(&board, &config.frame(), &config.targets);
    write_targets(&config.target_path, &targets)?;
    log::info!(
        "Wrote {} targets to {}",
        targets.len(),
        config.target_path.to_string_lossy()
    );
    Ok(())
}

fn classify_hit_list(
    config: &Config,
    matches: &ArgMatches,
    pb_manager: &MultiProgress,
) -> Result<(), Box<dyn Error>> {
    let hit_path = PathBuf::from(matches.get_one::<String>("hits").ok_or("Missing hit file")?);
    let locator = config.locator()?;
    let hits = read_hits(&hit_path)?;
    log::info!(
        "Classifying {} hits from {}...",
        hits.len(),
        hit_path.to_string_lossy()
    );

    let pb = pb_manager.add(ProgressBar::new(hits.len() as u64));
    let mut classified = Vec::with_capacity(hits.len());
    for chunk in hits.chunks(CLASSIFY_CHUNK_SIZE) {
        classified.extend(classify_hits(&locator, chunk, config.targets.mirror_x));
        pb.inc(chunk.len() as u64);
    }
    pb.finish();

    let on_tile = classified.iter().filter(|hit| hit.result.is_channel()).count();
    log::info!(
        "{} of {} hits landed on a tile",
        on_tile,
        classified.len()
    );
    write_classified(&config.classified_path, &classified)?;
    log::info!(
        "Wrote classified hits to {}",
        config.classified_path.to_string_lossy()
    );
    Ok(())
}

fn main() {
    // Create a cli
    let matches = Command::new("tileboard_cli")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(
            Command::new("locate")
                .about("Find the channel under a stage position")
                .arg(
                    Arg::new("x")
                        .long("x")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Stage x position in mm"),
                )
                .arg(
                    Arg::new("y")
                        .long("y")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Stage y position in mm"),
                ),
        )
        .subcommand(Command::new("targets").about("Write the beam target list for a tile scan"))
        .subcommand(
            Command::new("classify")
                .about("Find the channel of every hit in a CSV file")
                .arg(
                    Arg::new("hits")
                        .long("hits")
                        .required(true)
                        .help("Path to a CSV file with the columns label,x,y"),
                ),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Library messages go to a log file
    match spdlog::sink::FileSink::builder()
        .path(PathBuf::from("./tileboard.log"))
        .truncate(true)
        .build()
    {
        Ok(file_sink) => match spdlog::Logger::builder()
            .flush_level_filter(spdlog::LevelFilter::All)
            .sink(Arc::new(file_sink))
            .build()
        {
            Ok(file_logger) => spdlog::set_default_logger(Arc::new(file_logger)),
            Err(e) => log::warn!("Could not create the library logger: {e}"),
        },
        Err(e) => log::warn!("Could not create the log file: {e}"),
    }

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        match make_template_config(&config_path) {
            Ok(()) => log::info!("Done."),
            Err(e) => log::error!("Failed to write template config: {e}"),
        }
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    let frame = config.frame();
    log::info!(
        "Origin: ({}, {}) Base Rotation: {}",
        frame.origin()[0],
        frame.origin()[1],
        frame.base_rotation()
    );
    match &config.geometry_path {
        Some(p) => log::info!("Geometry Path: {}", p.to_string_lossy()),
        None => log::info!("Geometry Path: bundled D8"),
    }

    let result = match matches.subcommand() {
        Some(("locate", sub_matches)) => locate_position(&config, sub_matches),
        Some(("targets", _)) => write_target_list(&config),
        Some(("classify", sub_matches)) => classify_hit_list(&config, sub_matches, &pb_manager),
        _ => Ok(()),
    };

    match result {
        Ok(()) => log::info!("Done."),
        Err(e) => log::error!("Failed with error: {e}"),
    }
}
