use std::process::ExitCode;
use clap::Parser;
use log::error;
use acquire::args::*;
use acquire::run::{check, list_params, new_console, new_params, phase_cycle, simulate, timeline};

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = AcquireArgs::parse();
    use Action::*;
    let result = match &args.action {
        NewParams(args) => new_params(args),
        NewConsole(args) => new_console(args),
        Timeline(args) => timeline(args),
        Simulate(args) => simulate(args),
        PhaseCycle(args) => phase_cycle(args),
        Check(args) => check(args),
        ListParams(args) => list_params(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}",e);
            ExitCode::FAILURE
        }
    }
}
