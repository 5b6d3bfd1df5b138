use seq_tools::console::{Console, RecordingConsole, ScriptConsole};
use seq_tools::directive::{Channel, Directive, Gating, StatusPhase};
use seq_tools::parameters::{ParameterSet, ParameterStore};
use seq_tools::phase_table::{PhaseTable, TableId, TableStore};
use seq_tools::pulse::{Hardpulse, ShapedPulse};
use seq_tools::rf_phase::RfPhase;

// a two step spin echo driven straight from table storage
fn spin_echo(params:&dyn ParameterStore,tables:&TableStore,ct:u32,console:&mut dyn Console){
    let gating = Gating::new(params.get_val("rof1").unwrap(),params.get_val("rof2").unwrap());
    let t1 = TableId::new(1).unwrap();
    let t2 = TableId::new(2).unwrap();
    let refocus = ShapedPulse::new(&params.get_str("shape").unwrap(),params.get_val("width").unwrap());
    console.begin_transient(ct).unwrap();
    console.status(StatusPhase::A).unwrap();
    console.delay(params.get_val("d1").unwrap()).unwrap();
    console.status(StatusPhase::B).unwrap();
    console.rgpulse(&Hardpulse::new(params.get_val("pw").unwrap()),RfPhase::Zero,gating).unwrap();
    console.dec_shaped_pulse(&refocus,tables.get_elem(t1,ct).unwrap(),gating).unwrap();
    console.status(StatusPhase::C).unwrap();
    console.acquire(tables.get_elem(t2,ct).unwrap()).unwrap();
}

fn setup() -> (ParameterSet,TableStore) {
    let params = ParameterSet::from_toml_str(
        "rof1 = 5\nrof2 = 5\nd1 = 0.5\npw = 8\nwidth = 200\nshape = \"sech\"\n"
    ).unwrap();
    let mut tables = TableStore::new();
    tables.set_table(TableId::new(1).unwrap(),PhaseTable::new("ph1",&[0,1]).unwrap());
    tables.set_table(TableId::new(2).unwrap(),PhaseTable::new("ph2",&[0,2]).unwrap());
    (params,tables)
}

#[test]
fn recorded_timeline(){
    let (params,tables) = setup();
    let mut console = RecordingConsole::new();
    for ct in 0..2 {
        spin_echo(&params,&tables,ct,&mut console);
    }
    let per_transient = 0.5 + 18.0E-6 + 210.0E-6;
    assert!((console.elapsed() - 2.0*per_transient).abs() < 1.0E-12);
    let second = console.transient(1);
    assert_eq!(second.len(),7);
    assert!((second[0].start - per_transient).abs() < 1.0E-12);
    assert_eq!(second[4].directive.phase(),Some(RfPhase::Ninety));
    assert_eq!(second[4].directive.channel(),Some(Channel::Decouple));
    assert_eq!(second[6].directive,Directive::Acquire{receiver_phase:RfPhase::OneEighty});
}

#[test]
fn rendered_script(){
    let (params,tables) = setup();
    let mut console = ScriptConsole::new(Vec::<u8>::new());
    console.write_tables(&tables).unwrap();
    spin_echo(&params,&tables,1,&mut console);
    let text = String::from_utf8(console.into_inner()).unwrap();
    let expected = vec![
        "static int ph1[2] = {0,1};",
        "static int ph2[2] = {0,2};",
        "settable(t1, 2, ph1);",
        "settable(t2, 2, ph2);",
        "// transient 1",
        "status(A);",
        "delay(0.5);",
        "status(B);",
        "rgpulse(8, zero, 5, 5);",
        "decshaped_pulse(\"sech\", 200, one, 5, 5);",
        "status(C);",
        "oph = two;",
    ];
    assert_eq!(text.lines().collect::<Vec<&str>>(),expected);
}
