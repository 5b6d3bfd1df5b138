use std::path::Path;
use anyhow::{bail, Context, Result};
use log::{info, warn};
use seq_lib::console_params::ConsoleParams;
use seq_lib::mqf::{Mqf, MqfParams, CYCLE_LENGTH};
use seq_lib::phase_cycle::CycleCompletion;
use seq_lib::pulse_sequence::{Initialize, PulseSequence};
use seq_tools::_utils::format_duration;
use seq_tools::console::{RecordingConsole, ScriptConsole, TimedDirective};
use seq_tools::parameters::{ParameterSet, ParameterStore};
use seq_tools::phase_table::TableStore;
use crate::args::*;

pub fn new_params(args:&NewArgs) -> Result<()> {
    let path = args.destination.with_extension("json");
    MqfParams::write_default(&path)?;
    info!("wrote default parameters to {:?}",path);
    Ok(())
}

pub fn new_console(args:&NewArgs) -> Result<()> {
    let path = args.destination.with_extension("toml");
    ConsoleParams::write_default(&path)?;
    info!("wrote default console calibration to {:?}",path);
    Ok(())
}

// console calibration first, then the experiment parameters on top
pub fn load_parameters(params:&Path,console:Option<&Path>) -> Result<ParameterSet> {
    let mut p = match console {
        Some(path) => ConsoleParams::load(path)?.parameter_set(),
        None => <ConsoleParams as Initialize>::default().parameter_set()
    };
    p.merge(&ParameterSet::load(params)?);
    Ok(p)
}

pub fn transient_count(params:&ParameterSet,nt:Option<u32>) -> Result<u32> {
    let nt = match nt {
        Some(nt) => nt as f64,
        None => params.get_val("nt").context("no transient count given and nt is not set")?
    };
    if nt < 1.0 || nt.fract() != 0.0 || nt > u32::MAX as f64 {
        bail!("nt must be a positive whole number. Received {}",nt);
    }
    Ok(nt as u32)
}

pub fn timeline_row(entry:&TimedDirective) -> String {
    format!("{:>12}  {:>10}  {}",format_duration(entry.start),format_duration(entry.directive.duration()),entry.directive)
}

pub fn timeline(args:&TimelineArgs) -> Result<()> {
    let params = load_parameters(&args.params,args.console.as_deref())?;
    let mqf = Mqf::new();
    if args.script {
        let mut tables = TableStore::new();
        for (id,table) in mqf.phase_tables()? {
            tables.set_table(id,table);
        }
        let mut console = ScriptConsole::new(std::io::stdout().lock());
        console.write_tables(&tables)?;
        mqf.run_transient(&params,&mut console,args.ct)?;
        return Ok(());
    }
    let mut console = RecordingConsole::new();
    mqf.run_transient(&params,&mut console,args.ct)?;
    println!("{:>12}  {:>10}  {}","start","duration","directive");
    console.timeline().iter().for_each(|entry| println!("{}",timeline_row(entry)));
    println!("transient length: {}",format_duration(console.elapsed()));
    Ok(())
}

pub fn simulate(args:&SimulateArgs) -> Result<()> {
    let params = load_parameters(&args.params,args.console.as_deref())?;
    let nt = transient_count(&params,args.nt)?;
    let mut console = RecordingConsole::new();
    Mqf::new().run_experiment(&params,&mut console,nt)?;
    println!("transients: {}",console.n_transients());
    println!("directives: {}",console.timeline().len());
    println!("experiment time: {}",format_duration(console.elapsed()));
    if let Some(out) = &args.out {
        let s = serde_json::to_string_pretty(console.timeline()).context("cannot serialize timeline")?;
        utils::write_to_file(out,&s)?;
        info!("wrote directive log to {:?}",out);
    }
    Ok(())
}

pub fn phase_cycle(args:&PhaseCycleArgs) -> Result<()> {
    let mqf = Mqf::new();
    let cycle = mqf.phase_cycle()?;
    let nt = args.nt.unwrap_or(CYCLE_LENGTH as u32);
    println!("{:>4}  {:>4}  {:>4}  {:>4}  {:>4}","ct","v1","v2","v3","oph");
    for ct in 0..cycle.len() as u32 {
        let steps:Vec<u8> = cycle.pulses().iter().map(|table| table.element(ct).step()).collect();
        println!("{:>4}  {:>4}  {:>4}  {:>4}  {:>4}",ct,steps[0],steps[1],steps[2],cycle.receiver().element(ct).step());
    }
    println!();
    println!("pathway weights after {} transients",nt);
    for pathway in Mqf::pathways() {
        println!("{:>24}  {:?}  {:.3}",pathway.label(),pathway.jumps(),cycle.pathway_weight(&pathway,nt)?);
    }
    Ok(())
}

pub fn check(args:&CheckArgs) -> Result<()> {
    let params = load_parameters(&args.params,args.console.as_deref())?;
    let mqf = Mqf::new();
    // a dry run on the recording console validates every parameter and directive
    let mut console = RecordingConsole::new();
    mqf.run_transient(&params,&mut console,0)?;
    let nt = transient_count(&params,args.nt)?;
    match mqf.check_transients(nt)? {
        CycleCompletion::Complete => {
            println!("parameters ok. {} transients complete the phase cycle",nt);
        }
        CycleCompletion::Partial => {
            warn!("{} transients cancel the 12C peak but do not complete the {} step cycle",nt,CYCLE_LENGTH);
            println!("parameters ok. use a multiple of {} transients for a complete cycle",CYCLE_LENGTH);
        }
        CycleCompletion::Incomplete => {
            bail!("{} transients leave the natural 12C peak uncancelled. nt must be a multiple of 2",nt);
        }
    }
    Ok(())
}

pub fn list_params(args:&ListParamsArgs) -> Result<()> {
    let entries = utils::get_all_matches(&args.dir,"*.json")?;
    if entries.is_empty() {
        println!("no parameter files found in {:?}",args.dir);
    }
    entries.iter().for_each(|entry| println!("{}",entry.display()));
    Ok(())
}

#[cfg(test)]
fn write_test_params(name:&str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name).with_extension("json");
    MqfParams::write_default(&path).unwrap();
    path
}

#[test]
fn test_load_parameters() {
    let params_path = write_test_params("acquire_load_parameters_test");
    let console_path = std::env::temp_dir().join("acquire_load_parameters_test.toml");
    let mut console = <ConsoleParams as Initialize>::default();
    console.d1 = 4.0;
    console.write(&console_path).unwrap();
    let p = load_parameters(&params_path,Some(&console_path)).unwrap();
    assert_eq!(p.get_val("d1").unwrap(),4.0);
    assert_eq!(p.get_val("j1cf").unwrap(),250.0);
    let p = load_parameters(&params_path,None).unwrap();
    assert_eq!(p.get_val("d1").unwrap(),1.0);
    std::fs::remove_file(&params_path).unwrap();
    std::fs::remove_file(&console_path).unwrap();
}

#[test]
fn test_transient_count() {
    let mut p = ParameterSet::new();
    assert!(transient_count(&p,None).is_err());
    assert_eq!(transient_count(&p,Some(64)).unwrap(),64);
    assert!(transient_count(&p,Some(0)).is_err());
    p.set_val("nt",32.0);
    assert_eq!(transient_count(&p,None).unwrap(),32);
    p.set_val("nt",2.5);
    assert!(transient_count(&p,None).is_err());
}

#[test]
fn test_timeline_row() {
    let entry = TimedDirective{
        transient:0,
        start:1.0,
        directive:seq_tools::directive::Directive::Delay{seconds:0.002}
    };
    assert_eq!(timeline_row(&entry),"     1.000 s    2.000 ms  delay(0.002);");
}

#[test]
fn test_check() {
    let params_path = write_test_params("acquire_check_test");
    let args = |nt| CheckArgs{params:params_path.clone(),console:None,nt};
    assert!(check(&args(None)).is_ok());
    assert!(check(&args(Some(16))).is_ok());
    assert!(check(&args(Some(15))).is_err());
    std::fs::remove_file(&params_path).unwrap();
}

#[test]
fn test_simulate_writes_log() {
    let params_path = write_test_params("acquire_simulate_test");
    let out = std::env::temp_dir().join("acquire_simulate_test_log.json");
    simulate(&SimulateArgs{params:params_path.clone(),console:None,nt:Some(2),out:Some(out.clone())}).unwrap();
    let log:Vec<TimedDirective> = serde_json::from_str(&utils::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(log.len(),32);
    assert_eq!(log[16].transient,1);
    std::fs::remove_file(&params_path).unwrap();
    std::fs::remove_file(&out).unwrap();
}
