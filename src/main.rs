/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{debug, info};
use std::io::BufReader;
use std::thread::Builder;

/* Custom libraries */
use scan_elevator::clock::Clock;
use scan_elevator::config::{self, Config};
use scan_elevator::elevator::ElevatorFSM;
use scan_elevator::panel::{ConsolePanel, PanelEvent};
use scan_elevator::scenario;
use scan_elevator::shared::{Call, ElevatorState, Floor};
use scan_elevator::unwrap_or_exit;

/* Main */
fn main() -> std::io::Result<()> {
    let matches = Command::new("scan-elevator")
        .about("Single-cabin SCAN elevator controller")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("scenario")
                .long("scenario")
                .takes_value(true)
                .help("Run a scripted scenario instead of reading the console panel"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .requires("scenario")
                .help("Print the scenario trace as JSON lines"),
        )
        .get_matches();

    // Load the configuration, the log level comes from it
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let config = config::load_config(config_path);
    let level = match &config {
        Ok(config) => config.log.level.clone(),
        Err(_) => "info".to_string(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let config = unwrap_or_exit!(config);

    match matches.value_of("scenario") {
        Some(path) => run_scenario(&config, path, matches.is_present("json")),
        None => run_live(config),
    }
}

fn run_scenario(config: &Config, path: &str, json: bool) -> std::io::Result<()> {
    let script = unwrap_or_exit!(scenario::load_scenario(path));
    info!("Running scenario {} for {} ticks", path, script.ticks);
    let trace = unwrap_or_exit!(scenario::run_scenario(&script, &config.elevator));

    for record in trace.iter() {
        if json {
            let line = serde_json::to_string(record)?;
            println!("{}", line);
        } else {
            println!("{}", scenario::format_record(record));
        }
    }
    Ok(())
}

fn run_live(config: Config) -> std::io::Result<()> {
    // Initialize channels
    let (tick_tx, tick_rx) = cbc::unbounded::<()>();
    let (panel_tx, panel_rx) = cbc::unbounded::<PanelEvent>();
    let (complete_order_tx, complete_order_rx) = cbc::unbounded::<(Floor, Call)>();
    let (state_tx, state_rx) = cbc::unbounded::<ElevatorState>();
    let (clock_terminate_tx, clock_terminate_rx) = cbc::unbounded::<()>();
    let (_fsm_terminate_tx, fsm_terminate_rx) = cbc::unbounded::<()>();

    // Start the clock
    let clock = Clock::new(&config.clock, tick_tx, clock_terminate_rx);
    let clock_thread = Builder::new().name("clock".into()).spawn(move || clock.run())?;

    // Start the console panel
    let panel = ConsolePanel::new(
        BufReader::new(std::io::stdin()),
        config.elevator.n_floors,
        panel_tx,
    );
    Builder::new().name("console_panel".into()).spawn(move || panel.run())?;

    // Start the elevator module
    let elevator_fsm = ElevatorFSM::new(
        &config.elevator,
        tick_rx,
        panel_rx,
        complete_order_tx,
        state_tx,
        fsm_terminate_rx,
    );
    let elevator_fsm_thread = Builder::new()
        .name("elevator_fsm".into())
        .spawn(move || elevator_fsm.run())?;

    let mut complete_order_rx = complete_order_rx;
    let mut last_state: Option<ElevatorState> = None;
    loop {
        cbc::select! {
            recv(state_rx) -> state => {
                let state = match state {
                    Ok(state) => state,
                    Err(_) => {
                        for (floor, call) in complete_order_rx.try_iter() {
                            info!("Completed {} call at floor {}", call, floor);
                        }
                        break;
                    }
                };
                if last_state.as_ref() != Some(&state) {
                    debug!(
                        "floor {} next {} dir {} ({:02b}) dest {}/{} fsm {}",
                        state.floor,
                        state.next_floor,
                        state.direction,
                        state.direction.to_bits(),
                        state.destination,
                        state.destination_type,
                        state.fsm_state,
                    );
                    last_state = Some(state);
                }
            }
            recv(complete_order_rx) -> completed => {
                match completed {
                    Ok((floor, call)) => info!("Completed {} call at floor {}", call, floor),
                    Err(_) => complete_order_rx = cbc::never(),
                }
            }
        }
    }

    // The controller has stopped, take the clock down with it
    let _ = clock_terminate_tx.send(());
    let _ = elevator_fsm_thread.join();
    let _ = clock_thread.join();
    info!("Elevator stopped");
    Ok(())
}
