pub mod backlog;
pub mod beverage;
pub mod coffee_machine;
pub mod constants;
pub mod container;
pub mod dispatcher;
pub mod dispenser;
pub mod errors;
pub mod inventory;
pub mod machine_reader;
pub mod outcome;
pub mod preparation;
pub mod statistics;

use std::{env, process};

use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use coffee_machine::CoffeeMachine;
use constants::DEFAULT_INPUT_PATH;
use errors::CoffeeMachineError;
use machine_reader::read_machine;

fn main() {
    if let Err(err) = SimpleLogger::new().with_level(LevelFilter::Info).env().init() {
        eprintln!("Could not initialize the logger: {}", err);
    }

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_INPUT_PATH.to_string());
    if let Err(err) = run(&path) {
        error!("[MACHINE] {}", err);
        process::exit(1);
    }
}

fn run(path: &str) -> Result<(), CoffeeMachineError> {
    let (config, batch) = read_machine(path)?;
    let summary = CoffeeMachine::run(&config, batch)?;
    for report in &summary.reports {
        println!("{}", report);
    }
    Ok(())
}
