/* 3rd party libraries */
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::thread::Builder;
use std::time::Instant;

/* Custom libraries */
use dispatcher::Dispatcher;
use event_log::{EventLog, EventWriter};
use input::InputReader;

/* Modules */
mod config;
mod dispatcher;
mod elevator;
mod event_log;
mod input;
mod shared;

/* Command line */
#[derive(Parser, Debug)]
#[clap(author, version, about = "Multi-elevator dispatch simulator")]
struct Args {
    /// Path to the configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Read requests from this file instead of stdin
    #[clap(short, long)]
    input: Option<String>,

    /// Hold each request back until its timestamp
    #[clap(long)]
    replay: bool,
}

/* Main */
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Load the configuration
    let mut config = unwrap_or_exit!(config::load_config(Path::new(&args.config)));
    if args.replay {
        config.input.replay_timestamps = true;
    }
    let start = Instant::now();

    // Start the event writer
    let (events, event_rx) = EventLog::new(start);
    let event_writer = EventWriter::new(event_rx, io::stdout());
    let event_writer_thread = Builder::new().name("event_writer".into());
    let event_writer_thread = unwrap_or_exit!(event_writer_thread.spawn(move || event_writer.run()));

    // Start the elevators
    let dispatcher = Arc::new(Dispatcher::new(config.dispatcher.n_elevators));
    let elevator_threads = unwrap_or_exit!(dispatcher.start_elevators(&config.elevator, &events));
    drop(events);
    info!("Started {} elevators", dispatcher.n_elevators());

    // Feed requests until end of input
    let replay = config.input.replay_timestamps;
    let fed = match args.input {
        Some(path) => {
            let file = unwrap_or_exit!(File::open(&path));
            InputReader::new(BufReader::new(file), Arc::clone(&dispatcher), replay, start).run()
        }
        None => InputReader::new(io::stdin().lock(), Arc::clone(&dispatcher), replay, start).run(),
    };
    let mut failed = false;
    if let Err(e) = fed {
        error!("Failed to read input: {}", e);
        failed = true;
    }

    // Wait for every elevator to finish its work
    for (i, elevator_thread) in elevator_threads.into_iter().enumerate() {
        match elevator_thread.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Elevator {} stopped: {}", i + 1, e);
                failed = true;
            }
            Err(_) => {
                error!("Elevator {} panicked", i + 1);
                failed = true;
            }
        }
    }

    match event_writer_thread.join() {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            error!("Failed to write events: {}", e);
            failed = true;
        }
        Err(_) => {
            error!("Event writer panicked");
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
