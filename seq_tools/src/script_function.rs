use crate::directive::{Gating, StatusPhase};
use crate::phase_table::{PhaseTable, TableId};
use crate::rf_phase::RfPhase;

pub fn status(phase:StatusPhase) -> String {
    format!("status({});",phase)
}

pub fn dec_power(level_db:f64) -> String {
    format!("decpower({});",level_db)
}

pub fn obs_power(level_db:f64) -> String {
    format!("obspower({});",level_db)
}

pub fn delay(seconds:f64) -> String {
    format!("delay({});",seconds)
}

pub fn rgpulse(width_us:f64,phase:RfPhase,gating:&Gating) -> String {
    format!("rgpulse({}, {}, {}, {});",width_us,phase.script_name(),gating.rof1_us,gating.rof2_us)
}

pub fn dec_rgpulse(width_us:f64,phase:RfPhase,gating:&Gating) -> String {
    format!("decrgpulse({}, {}, {}, {});",width_us,phase.script_name(),gating.rof1_us,gating.rof2_us)
}

pub fn shaped_pulse(shape:&str,width_us:f64,phase:RfPhase,gating:&Gating) -> String {
    format!("shaped_pulse(\"{}\", {}, {}, {}, {});",shape,width_us,phase.script_name(),gating.rof1_us,gating.rof2_us)
}

pub fn dec_shaped_pulse(shape:&str,width_us:f64,phase:RfPhase,gating:&Gating) -> String {
    format!("decshaped_pulse(\"{}\", {}, {}, {}, {});",shape,width_us,phase.script_name(),gating.rof1_us,gating.rof2_us)
}

// digitization follows status(C) on its own, the script only sets the receiver phase
pub fn acquire(receiver_phase:RfPhase) -> String {
    format!("oph = {};",receiver_phase.script_name())
}

pub fn declare_table(table:&PhaseTable) -> String {
    let steps = utils::vec_to_string(&table.raw_steps(),",");
    format!("static int {}[{}] = {{{}}};",table.label(),table.len(),steps)
}

pub fn set_table(id:TableId,table:&PhaseTable) -> String {
    format!("settable({}, {}, {});",id,table.len(),table.label())
}

pub fn comment(text:&str) -> String {
    format!("// {}",text)
}

#[test]
fn test_script_text() {
    let gating = Gating::new(10.0,10.0);
    assert_eq!(dec_power(30.0),"decpower(30);");
    assert_eq!(delay(0.002),"delay(0.002);");
    assert_eq!(rgpulse(12.5,RfPhase::Zero,&gating),"rgpulse(12.5, zero, 10, 10);");
    assert_eq!(dec_shaped_pulse("wurst",500.0,RfPhase::Ninety,&gating),"decshaped_pulse(\"wurst\", 500, one, 10, 10);");
    let table = PhaseTable::new("ph1",&[0,2,0,2]).unwrap();
    assert_eq!(declare_table(&table),"static int ph1[4] = {0,2,0,2};");
    assert_eq!(set_table(TableId::new(1).unwrap(),&table),"settable(t1, 4, ph1);");
    assert_eq!(acquire(RfPhase::TwoSeventy),"oph = three;");
}
