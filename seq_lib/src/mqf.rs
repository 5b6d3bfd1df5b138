/*
    MQF - multiple quantum filtered 1D fluorine spectra

    Gives antiphase peaks for the one-bond 13C satellites in 19F spectra. The phase
    cycle removes the natural 12C peak.

    Setup notes:
    - transmitter and decoupler offsets on resonance
    - 1H decoupling (WALTZ-16) should be used, 13C decoupling should not
    - nt must be a multiple of 2 and ideally a multiple of 32
 */

use anyhow::{bail, Result};
use log::debug;
use serde::{Serialize,Deserialize};
use seq_tools::directive::{Gating, StatusPhase};
use seq_tools::parameters::{ParameterSet, ParameterStore};
use seq_tools::phase_table::{PhaseTable, TableId};
use seq_tools::pulse::{Hardpulse, ShapedPulse};
use seq_tools::rf_phase::RfPhase;
use seq_tools::console::Console;
use crate::console_params::ConsoleParams;
use crate::phase_cycle::{CoherencePathway, PhaseCycle};
use crate::pulse_sequence::{Initialize, PulseSequence, SequenceContext};

pub const CYCLE_LENGTH:usize = 32;

// ph1 and ph3 drive decoupler pulses. Older listings label them 19F 90s, which is wrong.
// phase of the first 13C 90
pub const PH1:[u8;CYCLE_LENGTH] = [0,2,0,2, 1,3,1,3,  0,2,0,2, 1,3,1,3,  0,2,0,2, 1,3,1,3,  0,2,0,2, 1,3,1,3];
// phase of the 13C 180
pub const PH2:[u8;CYCLE_LENGTH] = [0,0,0,0, 0,0,0,0,  1,1,1,1, 1,1,1,1,  2,2,2,2, 2,2,2,2,  3,3,3,3, 3,3,3,3];
// phase of the second 13C 90
pub const PH3:[u8;CYCLE_LENGTH] = [0,0,2,2, 1,1,3,3,  0,0,2,2, 1,1,3,3,  0,0,2,2, 1,1,3,3,  0,0,2,2, 1,1,3,3];
// receiver phase
pub const PH4:[u8;CYCLE_LENGTH] = [0,2,2,0, 2,0,0,2,  2,0,0,2, 0,2,2,0,  0,2,2,0, 2,0,0,2,  2,0,0,2, 0,2,2,0];

/// Duration of the magnetization transfer delay in seconds for a one-bond
/// C-F coupling in Hz.
pub fn tau(j1cf:f64) -> Result<f64> {
    if !j1cf.is_finite() || j1cf <= 0.0 {
        bail!("j1cf must be a positive coupling constant in Hz. Received {}",j1cf);
    }
    let tau = 1.0/(2.0*j1cf);
    if !tau.is_finite() {
        bail!("j1cf of {} Hz gives an unusable transfer delay of {} s",j1cf,tau);
    }
    Ok(tau)
}

// pulse widths and delays
fn non_negative(name:&str,value:f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        bail!("{} must be finite and non-negative. Received {}",name,value);
    }
    Ok(value)
}

// power levels
fn finite(name:&str,value:f64) -> Result<f64> {
    if !value.is_finite() {
        bail!("{} must be finite. Received {}",name,value);
    }
    Ok(value)
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct MqfParams {
    // one-bond carbon-fluorine coupling (Hz)
    pub j1cf:f64,
    // 13C 90 degree pulse width (us) and power (dB)
    pub pwx:f64,
    pub pwxlvl:f64,
    // 13C inversion pulse power (dB), width (us) and shape name
    pub invlvl:f64,
    pub invwidth:f64,
    pub invshape:String,
    pub nt:u32,
}

impl Initialize for MqfParams {
    fn default() -> Self {
        MqfParams {
            j1cf: 250.0,
            pwx: 12.0,
            pwxlvl: 58.0,
            invlvl: 45.0,
            invwidth: 500.0,
            invshape: String::from("wurst"),
            nt: CYCLE_LENGTH as u32,
        }
    }
}

impl MqfParams {
    pub fn tau(&self) -> Result<f64> {
        tau(self.j1cf)
    }
    pub fn parameter_set(&self) -> ParameterSet {
        let mut p = ParameterSet::new();
        p.set_val("j1cf",self.j1cf);
        p.set_val("pwx",self.pwx);
        p.set_val("pwxlvl",self.pwxlvl);
        p.set_val("invlvl",self.invlvl);
        p.set_val("invwidth",self.invwidth);
        p.set_str("invshape",&self.invshape);
        p.set_val("nt",self.nt as f64);
        p
    }
}

// everything one transient needs, read from the store before any directive goes out
struct MqfValues {
    tau:f64,
    pwxlvl:f64,
    invlvl:f64,
    excitation:Hardpulse,
    transfer:Hardpulse,
    inversion:ShapedPulse,
    console:ConsoleParams,
}

impl MqfValues {
    fn fetch(store:&dyn ParameterStore) -> Result<MqfValues> {
        let j1cf = store.get_val("j1cf")?;
        let pwx = non_negative("pwx",store.get_val("pwx")?)?;
        let pwxlvl = finite("pwxlvl",store.get_val("pwxlvl")?)?;
        let invlvl = finite("invlvl",store.get_val("invlvl")?)?;
        let invwidth = non_negative("invwidth",store.get_val("invwidth")?)?;
        let invshape = store.get_str("invshape")?;
        if invshape.trim().is_empty() {
            bail!("invshape must name a pulse shape");
        }
        let console = ConsoleParams::fetch(store)?;
        console.validate()?;
        Ok(MqfValues{
            tau:tau(j1cf)?,
            pwxlvl,
            invlvl,
            excitation:Hardpulse::new(console.pw),
            transfer:Hardpulse::new(pwx),
            inversion:ShapedPulse::new(&invshape,invwidth),
            console,
        })
    }
    fn gating(&self) -> Gating {
        self.console.gating()
    }
}

#[derive(Clone,Copy,Debug,Default)]
pub struct Mqf;

impl Mqf {
    pub fn new() -> Mqf {
        Mqf
    }
    pub fn table_ids() -> Result<[TableId;4]> {
        Ok([TableId::new(1)?,TableId::new(2)?,TableId::new(3)?,TableId::new(4)?])
    }
    pub fn natural_12c() -> CoherencePathway {
        CoherencePathway::new("natural 12C",&[0,0,0])
    }
    // 0 -> +1 -> -1 -> 0 on carbon, double and zero quantum during the inversion
    pub fn heteronuclear_mq() -> CoherencePathway {
        CoherencePathway::new("heteronuclear MQ",&[1,-2,1])
    }
    pub fn heteronuclear_mq_mirror() -> CoherencePathway {
        CoherencePathway::new("heteronuclear MQ mirror",&[-1,2,-1])
    }
    // carbon coherence that skips the inversion
    pub fn unrefocused_leak() -> CoherencePathway {
        CoherencePathway::new("unrefocused leak",&[1,0,-1])
    }
    pub fn pathways() -> Vec<CoherencePathway> {
        vec![
            Self::natural_12c(),
            Self::heteronuclear_mq(),
            Self::heteronuclear_mq_mirror(),
            Self::unrefocused_leak(),
        ]
    }
}

impl PulseSequence for Mqf {
    fn name(&self) -> String {
        String::from("mqf")
    }

    fn phase_tables(&self) -> Result<Vec<(TableId,PhaseTable)>> {
        let [t1,t2,t3,t4] = Self::table_ids()?;
        Ok(vec![
            (t1,PhaseTable::new("ph1",&PH1)?),
            (t2,PhaseTable::new("ph2",&PH2)?),
            (t3,PhaseTable::new("ph3",&PH3)?),
            (t4,PhaseTable::new("ph4",&PH4)?),
        ])
    }

    fn phase_cycle(&self) -> Result<PhaseCycle> {
        PhaseCycle::new(
            vec![
                PhaseTable::new("ph1",&PH1)?,
                PhaseTable::new("ph2",&PH2)?,
                PhaseTable::new("ph3",&PH3)?,
            ],
            PhaseTable::new("ph4",&PH4)?
        )
    }

    fn suppressed_pathways(&self) -> Vec<CoherencePathway> {
        vec![Self::natural_12c()]
    }

    fn pulse_sequence(&self,ctx:&mut SequenceContext,console:&mut dyn Console) -> Result<()> {
        let v = MqfValues::fetch(ctx.params())?;
        let gating = v.gating();

        self.install_tables(ctx)?;
        let [t1,t2,t3,t4] = Self::table_ids()?;
        let v1 = ctx.get_elem(t1)?;
        let v2 = ctx.get_elem(t2)?;
        let v3 = ctx.get_elem(t3)?;
        let oph = ctx.get_elem(t4)?;
        debug!("ct {}: v1 = {}, v2 = {}, v3 = {}, oph = {}",ctx.ct(),v1,v2,v3,oph);

        // relaxation delay
        console.status(StatusPhase::A)?;
        console.dec_power(v.console.dpwr)?;
        console.delay(v.console.d1)?;

        // excite 19F and let the antiphase term build under the C-F coupling
        console.status(StatusPhase::B)?;
        console.obs_power(v.console.tpwr)?;
        console.rgpulse(&v.excitation,RfPhase::Zero,gating)?;
        console.delay(v.tau)?;

        // transfer to heteronuclear multiple quantum coherence
        console.dec_power(v.pwxlvl)?;
        console.dec_rgpulse(&v.transfer,v1,gating)?;

        // refocus
        console.dec_power(v.invlvl)?;
        console.dec_shaped_pulse(&v.inversion,v2,gating)?;

        // back to antiphase 19F magnetization
        console.dec_power(v.pwxlvl)?;
        console.dec_rgpulse(&v.transfer,v3,gating)?;
        console.dec_power(v.console.dpwr)?;

        console.status(StatusPhase::C)?;
        console.acquire(oph)
    }
}

#[test]
fn test_tables() {
    for table in [PH1,PH2,PH3,PH4] {
        assert_eq!(table.len(),32);
        assert!(table.iter().all(|step| *step < 4));
    }
    assert_eq!((PH1[0],PH2[0],PH3[0],PH4[0]),(0,0,0,0));
    assert_eq!((PH1[4],PH2[4],PH3[4],PH4[4]),(1,0,1,2));
    assert_eq!((PH1[31],PH2[31],PH3[31],PH4[31]),(3,3,3,0));
}

#[test]
fn test_tau() {
    assert!((tau(150.0).unwrap() - 3.333333333333333E-3).abs() < 1.0E-15);
    assert_eq!(tau(250.0).unwrap(),0.002);
    assert!(tau(0.0).is_err());
    assert!(tau(-10.0).is_err());
    assert!(tau(f64::NAN).is_err());
    assert!(tau(1.0E-310).is_err());
}

#[test]
fn test_value_checks() {
    assert_eq!(non_negative("pwx",12.0).unwrap(),12.0);
    assert!(non_negative("pwx",-1.0).is_err());
    assert!(non_negative("d1",f64::INFINITY).is_err());
    assert_eq!(finite("invlvl",-6.0).unwrap(),-6.0);
    assert!(finite("invlvl",f64::NAN).is_err());
}

#[test]
fn test_params() {
    let params = <MqfParams as Initialize>::default();
    let set = params.parameter_set();
    assert_eq!(set.get_str("invshape").unwrap(),"wurst");
    assert_eq!(set.get_val("nt").unwrap(),32.0);
    assert_eq!(params.tau().unwrap(),0.002);
}
