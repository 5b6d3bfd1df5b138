/*
    RF phases on the console are set in quadrature steps. A step of 0,1,2,3 selects
    0, 90, 180 or 270 degrees on the transmitter or receiver.
 */

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use anyhow::{bail, Result};
use num_complex::Complex64;
use serde::{Serialize,Deserialize};

#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum RfPhase {
    Zero,
    Ninety,
    OneEighty,
    TwoSeventy,
}

impl RfPhase {
    pub fn from_step(step:u8) -> Result<RfPhase> {
        Ok(match step {
            0 => RfPhase::Zero,
            1 => RfPhase::Ninety,
            2 => RfPhase::OneEighty,
            3 => RfPhase::TwoSeventy,
            _=> bail!("phase step {} is out of range. Steps must be 0, 1, 2 or 3",step)
        })
    }
    // any integer number of quarter turns, wrapped onto a single cycle
    pub fn wrapping(quarter_turns:i32) -> RfPhase {
        match quarter_turns.rem_euclid(4) {
            0 => RfPhase::Zero,
            1 => RfPhase::Ninety,
            2 => RfPhase::OneEighty,
            _=> RfPhase::TwoSeventy,
        }
    }
    pub fn step(&self) -> u8 {
        match self {
            RfPhase::Zero => 0,
            RfPhase::Ninety => 1,
            RfPhase::OneEighty => 2,
            RfPhase::TwoSeventy => 3,
        }
    }
    pub fn degrees(&self) -> f64 {
        90.0*self.step() as f64
    }
    pub fn radians(&self) -> f64 {
        FRAC_PI_2*self.step() as f64
    }
    // exact unit phasor e^(i*phase)
    pub fn phasor(&self) -> Complex64 {
        match self {
            RfPhase::Zero => Complex64::new(1.0,0.0),
            RfPhase::Ninety => Complex64::new(0.0,1.0),
            RfPhase::OneEighty => Complex64::new(-1.0,0.0),
            RfPhase::TwoSeventy => Complex64::new(0.0,-1.0),
        }
    }
    pub fn shift(&self,quarter_turns:i32) -> RfPhase {
        RfPhase::wrapping(self.step() as i32 + quarter_turns)
    }
    // name of the fixed phase constant in console scripts
    pub fn script_name(&self) -> &'static str {
        match self {
            RfPhase::Zero => "zero",
            RfPhase::Ninety => "one",
            RfPhase::OneEighty => "two",
            RfPhase::TwoSeventy => "three",
        }
    }
}

impl fmt::Display for RfPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",self.degrees())
    }
}

#[test]
fn test_from_step() {
    for step in 0..4u8 {
        assert_eq!(RfPhase::from_step(step).unwrap().step(),step);
    }
    assert!(RfPhase::from_step(4).is_err());
}

#[test]
fn test_wrapping() {
    assert_eq!(RfPhase::wrapping(-2),RfPhase::OneEighty);
    assert_eq!(RfPhase::wrapping(5),RfPhase::Ninety);
    assert_eq!(RfPhase::TwoSeventy.shift(1),RfPhase::Zero);
    assert_eq!(RfPhase::Ninety.degrees(),90.0);
}

#[test]
fn test_phasor() {
    for step in 0..4u8 {
        let phase = RfPhase::from_step(step).unwrap();
        let expected = Complex64::from_polar(1.0,phase.radians());
        assert!((phase.phasor() - expected).norm() < 1.0E-12);
    }
}
