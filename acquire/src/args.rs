use clap;
use std::path::PathBuf;

#[derive(clap::Parser,Debug)]
#[command(author, version, about = "inspect and simulate the MQF pulse sequence", long_about = None)]
pub struct AcquireArgs {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand,Debug)]
pub enum Action {
    /// write default sequence parameters (json)
    NewParams(NewArgs),
    /// write default console calibration (toml)
    NewConsole(NewArgs),
    /// print the directives of one transient
    Timeline(TimelineArgs),
    /// run a whole experiment on a recording console
    Simulate(SimulateArgs),
    /// print the phase tables and coherence pathway weights
    PhaseCycle(PhaseCycleArgs),
    /// validate parameters and the number of transients
    Check(CheckArgs),
    /// list parameter files in a directory
    ListParams(ListParamsArgs),
}

#[derive(clap::Args,Debug)]
pub struct NewArgs {
    pub destination:PathBuf
}

#[derive(clap::Args,Debug)]
pub struct TimelineArgs {
    pub params:PathBuf,
    #[arg(short, long)]
    pub console:Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    pub ct:u32,
    #[arg(short, long)]
    pub script:bool,
}

#[derive(clap::Args,Debug)]
pub struct SimulateArgs {
    pub params:PathBuf,
    #[arg(short, long)]
    pub console:Option<PathBuf>,
    #[arg(short, long)]
    pub nt:Option<u32>,
    #[arg(short, long)]
    pub out:Option<PathBuf>,
}

#[derive(clap::Args,Debug)]
pub struct PhaseCycleArgs {
    #[arg(short, long)]
    pub nt:Option<u32>,
}

#[derive(clap::Args,Debug)]
pub struct CheckArgs {
    pub params:PathBuf,
    #[arg(short, long)]
    pub console:Option<PathBuf>,
    #[arg(short, long)]
    pub nt:Option<u32>,
}

#[derive(clap::Args,Debug)]
pub struct ListParamsArgs {
    pub dir:PathBuf,
}
