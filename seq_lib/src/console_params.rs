use anyhow::{bail, Result};
use serde::{Serialize,Deserialize};
use seq_tools::directive::Gating;
use seq_tools::parameters::{ParameterSet, ParameterStore};
use crate::pulse_sequence::Initialize;

/// Console calibration shared by every sequence run on the probe. These are
/// the global parameters a sequence reads without declaring them.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct ConsoleParams {
    // observe 90 degree pulse width (us)
    pub pw:f64,
    // observe power (dB)
    pub tpwr:f64,
    // decoupler standby power (dB)
    pub dpwr:f64,
    // receiver gating before and after pulses (us)
    pub rof1:f64,
    pub rof2:f64,
    // relaxation delay (s)
    pub d1:f64,
}

impl Initialize for ConsoleParams {
    fn default() -> Self {
        ConsoleParams {
            pw: 10.0,
            tpwr: 56.0,
            dpwr: 30.0,
            rof1: 10.0,
            rof2: 10.0,
            d1: 1.0,
        }
    }
}

impl ConsoleParams {
    pub fn fetch(store:&dyn ParameterStore) -> Result<ConsoleParams> {
        Ok(ConsoleParams{
            pw:store.get_val("pw")?,
            tpwr:store.get_val("tpwr")?,
            dpwr:store.get_val("dpwr")?,
            rof1:store.get_val("rof1")?,
            rof2:store.get_val("rof2")?,
            d1:store.get_val("d1")?,
        })
    }
    // widths and delays must be finite and non-negative, power levels finite
    pub fn validate(&self) -> Result<()> {
        for (name,value) in [("pw",self.pw),("rof1",self.rof1),("rof2",self.rof2),("d1",self.d1)] {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be finite and non-negative. Received {}",name,value);
            }
        }
        for (name,value) in [("tpwr",self.tpwr),("dpwr",self.dpwr)] {
            if !value.is_finite() {
                bail!("{} must be finite. Received {}",name,value);
            }
        }
        Ok(())
    }
    pub fn gating(&self) -> Gating {
        Gating::new(self.rof1,self.rof2)
    }
    pub fn parameter_set(&self) -> ParameterSet {
        let mut p = ParameterSet::new();
        p.set_val("pw",self.pw);
        p.set_val("tpwr",self.tpwr);
        p.set_val("dpwr",self.dpwr);
        p.set_val("rof1",self.rof1);
        p.set_val("rof2",self.rof2);
        p.set_val("d1",self.d1);
        p
    }
}

#[test]
fn test_fetch() {
    let console = <ConsoleParams as Initialize>::default();
    let fetched = ConsoleParams::fetch(&console.parameter_set()).unwrap();
    assert_eq!(fetched,console);
    let mut missing = console.parameter_set();
    missing.remove("rof2");
    assert!(ConsoleParams::fetch(&missing).is_err());
}

#[test]
fn test_validate() {
    let mut console = <ConsoleParams as Initialize>::default();
    assert!(console.validate().is_ok());
    console.rof1 = f64::NAN;
    assert!(console.validate().is_err());
    console.rof1 = 10.0;
    console.d1 = -1.0;
    assert!(console.validate().is_err());
    console.d1 = 1.0;
    console.tpwr = f64::INFINITY;
    assert!(console.validate().is_err());
}

#[test]
fn test_toml_file() {
    let path = std::env::temp_dir().join("seq_lib_console_params_test.toml");
    let mut console = <ConsoleParams as Initialize>::default();
    console.d1 = 2.0;
    console.write(&path).unwrap();
    let s = utils::read_to_string(&path).unwrap();
    assert!(s.contains("d1 = 2.0"));
    assert_eq!(ConsoleParams::load(&path).unwrap(),console);
    std::fs::remove_file(&path).unwrap();
}
