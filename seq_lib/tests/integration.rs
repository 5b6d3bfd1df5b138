use seq_lib::console_params::ConsoleParams;
use seq_lib::mqf::{Mqf, MqfParams, CYCLE_LENGTH, PH1, PH2, PH3, PH4};
use seq_lib::phase_cycle::CycleCompletion;
use seq_lib::pulse_sequence::{Initialize, PulseSequence};
use seq_tools::console::{Console, RecordingConsole, ScriptConsole};
use seq_tools::directive::{Channel, Directive, Gating, StatusPhase};
use seq_tools::parameters::{ParameterSet, ParameterStore};
use seq_tools::rf_phase::RfPhase;

fn default_params() -> ParameterSet {
    let mut p = <ConsoleParams as Initialize>::default().parameter_set();
    p.merge(&<MqfParams as Initialize>::default().parameter_set());
    p
}

fn phase(step:u8) -> RfPhase {
    RfPhase::from_step(step).unwrap()
}

fn expected_transient(ct:usize) -> Vec<Directive> {
    let gating = Gating::new(10.0,10.0);
    vec![
        Directive::Status(StatusPhase::A),
        Directive::Power{channel:Channel::Decouple,level_db:30.0},
        Directive::Delay{seconds:1.0},
        Directive::Status(StatusPhase::B),
        Directive::Power{channel:Channel::Observe,level_db:56.0},
        Directive::RectPulse{channel:Channel::Observe,width_us:10.0,phase:RfPhase::Zero,gating},
        Directive::Delay{seconds:0.002},
        Directive::Power{channel:Channel::Decouple,level_db:58.0},
        Directive::RectPulse{channel:Channel::Decouple,width_us:12.0,phase:phase(PH1[ct]),gating},
        Directive::Power{channel:Channel::Decouple,level_db:45.0},
        Directive::ShapedPulse{channel:Channel::Decouple,shape:"wurst".to_string(),width_us:500.0,phase:phase(PH2[ct]),gating},
        Directive::Power{channel:Channel::Decouple,level_db:58.0},
        Directive::RectPulse{channel:Channel::Decouple,width_us:12.0,phase:phase(PH3[ct]),gating},
        Directive::Power{channel:Channel::Decouple,level_db:30.0},
        Directive::Status(StatusPhase::C),
        Directive::Acquire{receiver_phase:phase(PH4[ct])},
    ]
}

#[test]
fn directive_order_single_transient(){
    let params = default_params();
    for ct in [0u32,4,17,31] {
        let mut console = RecordingConsole::new();
        Mqf::new().run_transient(&params,&mut console,ct).unwrap();
        let directives:Vec<Directive> = console.directives().into_iter().cloned().collect();
        assert_eq!(directives,expected_transient(ct as usize));
    }
}

#[test]
fn status_phases_in_order(){
    let params = default_params();
    let mut console = RecordingConsole::new();
    Mqf::new().run_transient(&params,&mut console,0).unwrap();
    let status:Vec<StatusPhase> = console.directives().iter().filter_map(|d| match d {
        Directive::Status(s) => Some(*s),
        _=> None
    }).collect();
    assert_eq!(status,vec![StatusPhase::A,StatusPhase::B,StatusPhase::C]);
}

#[test]
fn step_four_phases(){
    let params = default_params();
    let mut console = RecordingConsole::new();
    Mqf::new().run_transient(&params,&mut console,4).unwrap();
    let phases:Vec<RfPhase> = console.directives().iter()
        .filter(|d| d.channel() == Some(Channel::Decouple) || matches!(d,Directive::Acquire{..}))
        .filter_map(|d| d.phase())
        .collect();
    assert_eq!(phases,vec![RfPhase::Ninety,RfPhase::Zero,RfPhase::Ninety,RfPhase::OneEighty]);
}

#[test]
fn counter_wraps_on_cycle_length(){
    let params = default_params();
    let mut a = RecordingConsole::new();
    let mut b = RecordingConsole::new();
    Mqf::new().run_transient(&params,&mut a,5).unwrap();
    Mqf::new().run_transient(&params,&mut b,5 + CYCLE_LENGTH as u32).unwrap();
    assert_eq!(a.directives(),b.directives());
}

#[test]
fn missing_parameter_emits_nothing(){
    let mut params = default_params();
    params.remove("invshape");
    let mut console = RecordingConsole::new();
    let result = Mqf::new().run_transient(&params,&mut console,0);
    assert!(result.is_err());
    assert!(console.timeline().is_empty());
}

#[test]
fn zero_coupling_emits_nothing(){
    let mut params = default_params();
    params.set_val("j1cf",0.0);
    let mut console = RecordingConsole::new();
    assert!(Mqf::new().run_transient(&params,&mut console,0).is_err());
    assert!(console.timeline().is_empty());
}

#[test]
fn negative_width_emits_nothing(){
    let mut params = default_params();
    params.set_val("pwx",-1.0);
    let mut console = RecordingConsole::new();
    assert!(Mqf::new().run_transient(&params,&mut console,0).is_err());
    assert!(console.timeline().is_empty());
}

#[test]
fn tiny_coupling_emits_nothing(){
    let mut params = default_params();
    params.set_val("j1cf",1.0E-310);
    let mut console = RecordingConsole::new();
    assert!(Mqf::new().run_transient(&params,&mut console,0).is_err());
    assert!(console.timeline().is_empty());
}

#[test]
fn nan_gating_emits_nothing(){
    let mut params = default_params();
    params.set_val("rof1",f64::NAN);
    let mut console = RecordingConsole::new();
    assert!(Mqf::new().run_transient(&params,&mut console,0).is_err());
    assert!(console.timeline().is_empty());
    assert_eq!(console.elapsed(),0.0);
}

#[test]
fn full_experiment_timing(){
    let params = default_params();
    let mut console = RecordingConsole::new();
    Mqf::new().run_experiment(&params,&mut console,32).unwrap();
    assert_eq!(console.n_transients(),32);
    assert_eq!(console.timeline().len(),32*16);
    // d1 + tau + one 10 us and three gated carbon pulses, each with 20 us of gating
    let per_transient = 1.0 + 0.002 + 30.0E-6 + 2.0*32.0E-6 + 520.0E-6;
    assert!((console.elapsed() - 32.0*per_transient).abs() < 1.0E-9);
    let second = console.transient(1);
    assert!((second[0].start - per_transient).abs() < 1.0E-12);
    // receiver phase follows ph4 across the experiment
    let receiver:Vec<u8> = console.directives().iter().filter_map(|d| match d {
        Directive::Acquire{receiver_phase} => Some(receiver_phase.step()),
        _=> None
    }).collect();
    assert_eq!(receiver,PH4.to_vec());
}

#[test]
fn experiment_needs_transients(){
    let params = default_params();
    let mut console = RecordingConsole::new();
    assert!(Mqf::new().run_experiment(&params,&mut console,0).is_err());
}

#[test]
fn receiver_follows_multiple_quantum_pathway(){
    let cycle = Mqf::new().phase_cycle().unwrap();
    assert_eq!(cycle.len(),32);
    for ct in 0..32u32 {
        let i = ct as usize;
        let expected = (PH1[i] as i32 - 2*PH2[i] as i32 + PH3[i] as i32).rem_euclid(4) as u8;
        assert_eq!(PH4[i],expected);
        assert!(cycle.receiver_follows(&Mqf::heteronuclear_mq(),ct).unwrap());
        assert!(cycle.receiver_follows(&Mqf::heteronuclear_mq_mirror(),ct).unwrap());
    }
}

#[test]
fn natural_12c_cancels(){
    let cycle = Mqf::new().phase_cycle().unwrap();
    for nt in (2..=64u32).step_by(2) {
        assert!(cycle.pathway_weight(&Mqf::natural_12c(),nt).unwrap() < 1.0E-9);
        assert!((cycle.pathway_weight(&Mqf::heteronuclear_mq(),nt).unwrap() - 1.0).abs() < 1.0E-9);
    }
    assert!(cycle.pathway_weight(&Mqf::natural_12c(),1).unwrap() > 0.99);
    assert!(cycle.pathway_weight(&Mqf::unrefocused_leak(),32).unwrap() < 1.0E-9);
}

#[test]
fn transient_count_check(){
    let mqf = Mqf::new();
    assert_eq!(mqf.check_transients(32).unwrap(),CycleCompletion::Complete);
    assert_eq!(mqf.check_transients(128).unwrap(),CycleCompletion::Complete);
    assert_eq!(mqf.check_transients(16).unwrap(),CycleCompletion::Partial);
    assert_eq!(mqf.check_transients(7).unwrap(),CycleCompletion::Incomplete);
}

#[test]
fn script_for_one_transient(){
    let params = default_params();
    let mut console = ScriptConsole::new(Vec::<u8>::new());
    Mqf::new().run_transient(&params,&mut console,1).unwrap();
    let text = String::from_utf8(console.into_inner()).unwrap();
    let lines:Vec<&str> = text.lines().collect();
    assert_eq!(lines[0],"// transient 1");
    assert_eq!(lines[6],"rgpulse(10, zero, 10, 10);");
    assert_eq!(lines[9],"decrgpulse(12, two, 10, 10);");
    assert_eq!(lines[11],"decshaped_pulse(\"wurst\", 500, zero, 10, 10);");
    assert_eq!(lines[16],"oph = two;");
}

#[test]
fn experiment_overrides_console(){
    let mut params = default_params();
    let mut experiment = ParameterSet::new();
    experiment.set_val("d1",3.0);
    params.merge(&experiment);
    assert_eq!(params.get_val("d1").unwrap(),3.0);
    let mut console = RecordingConsole::new();
    console.begin_transient(0).unwrap();
    Mqf::new().run_transient(&params,&mut console,0).unwrap();
    assert_eq!(console.directives()[2],&Directive::Delay{seconds:3.0});
}

#[test]
fn parameter_file_loads_as_store(){
    let path = std::env::temp_dir().join("seq_lib_mqf_params_test.json");
    let mut params = <MqfParams as Initialize>::default();
    params.j1cf = 150.0;
    params.write(&path).unwrap();
    assert_eq!(MqfParams::load(&path).unwrap(),params);
    let store = ParameterSet::load(&path).unwrap();
    assert_eq!(store.get_val("j1cf").unwrap(),150.0);
    assert_eq!(store.get_str("invshape").unwrap(),"wurst");
    std::fs::remove_file(&path).unwrap();
}
