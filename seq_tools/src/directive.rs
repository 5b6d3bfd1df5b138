use std::fmt;
use anyhow::{bail, Result};
use serde::{Serialize,Deserialize};
use crate::rf_phase::RfPhase;
use crate::script_function;
use crate::_utils::us_to_sec;

#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum Channel {
    Observe,
    Decouple,
}

// status phases mark recovery (A), the pulse sequence body (B) and acquisition (C)
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Serialize,Deserialize)]
pub enum StatusPhase {
    A,
    B,
    C,
}

impl fmt::Display for StatusPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusPhase::A => "A",
            StatusPhase::B => "B",
            StatusPhase::C => "C",
        };
        write!(f,"{}",s)
    }
}

/// Receiver gating around a pulse. rof1 is the time the receiver is gated off
/// before the pulse and rof2 the time after.
#[derive(Clone,Copy,Debug,PartialEq,Serialize,Deserialize)]
pub struct Gating {
    pub rof1_us:f64,
    pub rof2_us:f64,
}

impl Gating {
    pub fn new(rof1_us:f64,rof2_us:f64) -> Gating {
        Gating{rof1_us,rof2_us}
    }
    pub fn duration(&self) -> f64 {
        us_to_sec(self.rof1_us + self.rof2_us)
    }
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub enum Directive {
    Status(StatusPhase),
    Power{channel:Channel,level_db:f64},
    Delay{seconds:f64},
    RectPulse{channel:Channel,width_us:f64,phase:RfPhase,gating:Gating},
    ShapedPulse{channel:Channel,shape:String,width_us:f64,phase:RfPhase,gating:Gating},
    Acquire{receiver_phase:RfPhase},
}

impl Directive {
    // time the console spends on the directive. power switches and markers are free
    pub fn duration(&self) -> f64 {
        match self {
            Directive::Delay{seconds} => *seconds,
            Directive::RectPulse{width_us,gating,..} |
            Directive::ShapedPulse{width_us,gating,..} => us_to_sec(*width_us) + gating.duration(),
            _=> 0.0
        }
    }
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Directive::Power{channel,..} |
            Directive::RectPulse{channel,..} |
            Directive::ShapedPulse{channel,..} => Some(*channel),
            _=> None
        }
    }
    pub fn phase(&self) -> Option<RfPhase> {
        match self {
            Directive::RectPulse{phase,..} |
            Directive::ShapedPulse{phase,..} => Some(*phase),
            Directive::Acquire{receiver_phase} => Some(*receiver_phase),
            _=> None
        }
    }
    // a directive the console can not time is rejected before it is executed
    pub fn validate(&self) -> Result<()> {
        match self {
            Directive::Delay{seconds} => {
                if !seconds.is_finite() || *seconds < 0.0 {
                    bail!("delay must be finite and non-negative. Received {} s",seconds);
                }
            }
            Directive::RectPulse{width_us,gating,..} |
            Directive::ShapedPulse{width_us,gating,..} => {
                if !width_us.is_finite() || *width_us < 0.0 {
                    bail!("pulse width must be finite and non-negative. Received {} us",width_us);
                }
                if [gating.rof1_us,gating.rof2_us].iter().any(|rof| !rof.is_finite() || *rof < 0.0) {
                    bail!("receiver gating times must be finite and non-negative. Received rof1 = {} us, rof2 = {} us",gating.rof1_us,gating.rof2_us);
                }
            }
            Directive::Power{level_db,..} => {
                if !level_db.is_finite() {
                    bail!("power level must be finite. Received {} dB",level_db);
                }
            }
            _=> {}
        }
        if let Directive::ShapedPulse{shape,..} = self {
            if shape.trim().is_empty() {
                bail!("shaped pulse needs a shape name");
            }
        }
        Ok(())
    }
    pub fn script(&self) -> String {
        match self {
            Directive::Status(phase) => script_function::status(*phase),
            Directive::Power{channel:Channel::Observe,level_db} => script_function::obs_power(*level_db),
            Directive::Power{channel:Channel::Decouple,level_db} => script_function::dec_power(*level_db),
            Directive::Delay{seconds} => script_function::delay(*seconds),
            Directive::RectPulse{channel:Channel::Observe,width_us,phase,gating} => script_function::rgpulse(*width_us,*phase,gating),
            Directive::RectPulse{channel:Channel::Decouple,width_us,phase,gating} => script_function::dec_rgpulse(*width_us,*phase,gating),
            Directive::ShapedPulse{channel:Channel::Observe,shape,width_us,phase,gating} => script_function::shaped_pulse(shape,*width_us,*phase,gating),
            Directive::ShapedPulse{channel:Channel::Decouple,shape,width_us,phase,gating} => script_function::dec_shaped_pulse(shape,*width_us,*phase,gating),
            Directive::Acquire{receiver_phase} => script_function::acquire(*receiver_phase),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",self.script())
    }
}

#[test]
fn test_duration() {
    let gating = Gating::new(10.0,10.0);
    let p = Directive::RectPulse{channel:Channel::Observe,width_us:12.0,phase:RfPhase::Zero,gating};
    assert!((p.duration() - 32.0E-6).abs() < 1.0E-15);
    assert_eq!(Directive::Delay{seconds:1.5}.duration(),1.5);
    assert_eq!(Directive::Power{channel:Channel::Decouple,level_db:30.0}.duration(),0.0);
    assert_eq!(Directive::Status(StatusPhase::A).duration(),0.0);
}

#[test]
fn test_validate() {
    assert!(Directive::Delay{seconds:f64::INFINITY}.validate().is_err());
    assert!(Directive::Delay{seconds:-1.0}.validate().is_err());
    assert!(Directive::Delay{seconds:0.0}.validate().is_ok());
    let gating = Gating::new(10.0,10.0);
    let shaped = Directive::ShapedPulse{channel:Channel::Decouple,shape:" ".to_string(),width_us:500.0,phase:RfPhase::Zero,gating};
    assert!(shaped.validate().is_err());
    let pulse = |rof1_us| Directive::RectPulse{channel:Channel::Observe,width_us:10.0,phase:RfPhase::Zero,gating:Gating::new(rof1_us,10.0)};
    assert!(pulse(10.0).validate().is_ok());
    assert!(pulse(-1.0).validate().is_err());
    assert!(pulse(f64::NAN).validate().is_err());
    assert!(pulse(f64::INFINITY).validate().is_err());
}

#[test]
fn test_script() {
    let gating = Gating::new(10.0,10.0);
    let p = Directive::RectPulse{channel:Channel::Decouple,width_us:12.0,phase:RfPhase::OneEighty,gating};
    assert_eq!(p.script(),"decrgpulse(12, two, 10, 10);");
    assert_eq!(Directive::Status(StatusPhase::B).script(),"status(B);");
    assert_eq!(Directive::Power{channel:Channel::Observe,level_db:56.0}.to_string(),"obspower(56);");
    assert_eq!(Directive::Acquire{receiver_phase:RfPhase::OneEighty}.script(),"oph = two;");
}
