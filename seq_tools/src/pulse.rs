/*
 A pulse (in this module) is a single RF event on one channel. Widths are kept in
 microseconds, the unit the console takes them in. The envelope of a shaped pulse
 lives in a shape file on the console and is only referenced by name here.
 */

use crate::directive::{Channel, Directive, Gating};
use crate::rf_phase::RfPhase;
use crate::_utils;

pub trait Pulse {
    fn width_us(&self) -> f64;
    fn duration(&self) -> f64 {
        _utils::us_to_sec(self.width_us())
    }
    fn directive(&self,channel:Channel,phase:RfPhase,gating:Gating) -> Directive;
}

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Hardpulse {
    width_us:f64
}

impl Hardpulse {
    pub fn new(width_us:f64) -> Hardpulse {
        Hardpulse{width_us}
    }
    // excitation bandwidth to the first null of the sinc profile
    pub fn bandwidth_hz(&self) -> f64 {
        1.0/self.duration()
    }
}

impl Pulse for Hardpulse {
    fn width_us(&self) -> f64 {
        self.width_us
    }
    fn directive(&self,channel:Channel,phase:RfPhase,gating:Gating) -> Directive {
        Directive::RectPulse{
            channel,
            width_us:self.width_us,
            phase,
            gating
        }
    }
}

#[derive(Clone,Debug,PartialEq)]
pub struct ShapedPulse {
    shape:String,
    width_us:f64
}

impl ShapedPulse {
    pub fn new(shape:&str,width_us:f64) -> ShapedPulse {
        ShapedPulse{
            shape:shape.to_owned(),
            width_us
        }
    }
    pub fn shape(&self) -> &str {
        &self.shape
    }
}

impl Pulse for ShapedPulse {
    fn width_us(&self) -> f64 {
        self.width_us
    }
    fn directive(&self,channel:Channel,phase:RfPhase,gating:Gating) -> Directive {
        Directive::ShapedPulse{
            channel,
            shape:self.shape.clone(),
            width_us:self.width_us,
            phase,
            gating
        }
    }
}

#[test]
fn test_pulses() {
    let gating = Gating::new(10.0,10.0);
    let hp = Hardpulse::new(250.0);
    assert_eq!(hp.duration(),250.0E-6);
    assert!((hp.bandwidth_hz() - 4000.0).abs() < 1.0E-9);
    assert_eq!(
        hp.directive(Channel::Decouple,RfPhase::Ninety,gating),
        Directive::RectPulse{channel:Channel::Decouple,width_us:250.0,phase:RfPhase::Ninety,gating}
    );
    let sp = ShapedPulse::new("wurst",500.0);
    match sp.directive(Channel::Decouple,RfPhase::Zero,gating) {
        Directive::ShapedPulse{shape,width_us,..} => {
            assert_eq!(shape,"wurst");
            assert_eq!(width_us,500.0);
        }
        _=> panic!("expected a shaped pulse")
    }
}
