use std::io::Write;
use anyhow::{Context, Result};
use log::debug;
use serde::{Serialize,Deserialize};
use crate::directive::{Channel, Directive, Gating, StatusPhase};
use crate::phase_table::TableStore;
use crate::pulse::{Hardpulse, Pulse, ShapedPulse};
use crate::rf_phase::RfPhase;
use crate::script_function;

/// Hardware directives a sequence can issue. Every primitive funnels through
/// `execute`, which sees directives strictly in call order.
pub trait Console {
    fn execute(&mut self,directive:Directive) -> Result<()>;
    // called by the runner before each transient
    fn begin_transient(&mut self,_ct:u32) -> Result<()> {
        Ok(())
    }
    fn status(&mut self,phase:StatusPhase) -> Result<()> {
        self.execute(Directive::Status(phase))
    }
    fn dec_power(&mut self,level_db:f64) -> Result<()> {
        self.execute(Directive::Power{channel:Channel::Decouple,level_db})
    }
    fn obs_power(&mut self,level_db:f64) -> Result<()> {
        self.execute(Directive::Power{channel:Channel::Observe,level_db})
    }
    fn delay(&mut self,seconds:f64) -> Result<()> {
        self.execute(Directive::Delay{seconds})
    }
    fn rgpulse(&mut self,pulse:&Hardpulse,phase:RfPhase,gating:Gating) -> Result<()> {
        self.execute(pulse.directive(Channel::Observe,phase,gating))
    }
    fn dec_rgpulse(&mut self,pulse:&Hardpulse,phase:RfPhase,gating:Gating) -> Result<()> {
        self.execute(pulse.directive(Channel::Decouple,phase,gating))
    }
    fn dec_shaped_pulse(&mut self,pulse:&ShapedPulse,phase:RfPhase,gating:Gating) -> Result<()> {
        self.execute(pulse.directive(Channel::Decouple,phase,gating))
    }
    fn acquire(&mut self,receiver_phase:RfPhase) -> Result<()> {
        self.execute(Directive::Acquire{receiver_phase})
    }
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct TimedDirective {
    pub transient:u32,
    // seconds from the start of the experiment
    pub start:f64,
    pub directive:Directive,
}

impl TimedDirective {
    pub fn end(&self) -> f64 {
        self.start + self.directive.duration()
    }
}

/// Console that keeps every directive with its start time on a virtual clock.
#[derive(Clone,Debug,Default)]
pub struct RecordingConsole {
    clock:f64,
    transient:u32,
    timeline:Vec<TimedDirective>
}

impl RecordingConsole {
    pub fn new() -> RecordingConsole {
        Self::default()
    }
    pub fn timeline(&self) -> &[TimedDirective] {
        &self.timeline
    }
    pub fn directives(&self) -> Vec<&Directive> {
        self.timeline.iter().map(|entry| &entry.directive).collect()
    }
    pub fn transient(&self,ct:u32) -> Vec<&TimedDirective> {
        self.timeline.iter().filter(|entry| entry.transient == ct).collect()
    }
    pub fn n_transients(&self) -> usize {
        let mut transients:Vec<u32> = self.timeline.iter().map(|entry| entry.transient).collect();
        transients.dedup();
        transients.len()
    }
    pub fn elapsed(&self) -> f64 {
        self.clock
    }
}

impl Console for RecordingConsole {
    fn execute(&mut self,directive:Directive) -> Result<()> {
        directive.validate().with_context(|| format!("console rejected {}",directive))?;
        debug!("ct {} t = {:.6} s: {}",self.transient,self.clock,directive);
        let duration = directive.duration();
        self.timeline.push(TimedDirective{
            transient:self.transient,
            start:self.clock,
            directive
        });
        self.clock += duration;
        Ok(())
    }
    fn begin_transient(&mut self,ct:u32) -> Result<()> {
        self.transient = ct;
        Ok(())
    }
}

/// Console that renders each directive as a line of console script.
pub struct ScriptConsole<W:Write> {
    out:W
}

impl<W:Write> ScriptConsole<W> {
    pub fn new(out:W) -> ScriptConsole<W> {
        ScriptConsole{out}
    }
    pub fn write_tables(&mut self,tables:&TableStore) -> Result<()> {
        for (_,table) in tables.iter() {
            writeln!(self.out,"{}",script_function::declare_table(table)).context("cannot write script")?;
        }
        for (id,table) in tables.iter() {
            writeln!(self.out,"{}",script_function::set_table(*id,table)).context("cannot write script")?;
        }
        Ok(())
    }
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W:Write> Console for ScriptConsole<W> {
    fn execute(&mut self,directive:Directive) -> Result<()> {
        directive.validate().with_context(|| format!("console rejected {}",directive))?;
        writeln!(self.out,"{}",directive.script()).context("cannot write script")?;
        Ok(())
    }
    fn begin_transient(&mut self,ct:u32) -> Result<()> {
        writeln!(self.out,"{}",script_function::comment(&format!("transient {}",ct))).context("cannot write script")?;
        Ok(())
    }
}

#[test]
fn test_recording_console() {
    let gating = Gating::new(10.0,10.0);
    let mut console = RecordingConsole::new();
    console.begin_transient(0).unwrap();
    console.status(StatusPhase::A).unwrap();
    console.delay(1.0).unwrap();
    console.rgpulse(&Hardpulse::new(10.0),RfPhase::Zero,gating).unwrap();
    console.begin_transient(1).unwrap();
    console.acquire(RfPhase::OneEighty).unwrap();
    let t = console.timeline();
    assert_eq!(t.len(),4);
    assert_eq!(t[2].start,1.0);
    assert!((t[3].start - 1.00003).abs() < 1.0E-12);
    assert_eq!(t[2].end(),t[3].start);
    assert_eq!(t[3].transient,1);
    assert_eq!(console.transient(0).len(),3);
    assert_eq!(console.n_transients(),2);
}

#[test]
fn test_recording_console_rejects() {
    let mut console = RecordingConsole::new();
    assert!(console.delay(f64::INFINITY).is_err());
    assert!(console.timeline().is_empty());
    assert_eq!(console.elapsed(),0.0);
}

#[test]
fn test_script_console() {
    let gating = Gating::new(10.0,10.0);
    let mut console = ScriptConsole::new(Vec::<u8>::new());
    console.begin_transient(3).unwrap();
    console.dec_power(30.0).unwrap();
    console.dec_rgpulse(&Hardpulse::new(12.0),RfPhase::Ninety,gating).unwrap();
    let text = String::from_utf8(console.into_inner()).unwrap();
    assert_eq!(text,"// transient 3\ndecpower(30);\ndecrgpulse(12, one, 10, 10);\n");
}
