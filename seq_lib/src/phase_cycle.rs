/*
    Coherence pathway bookkeeping for a phase cycle.

    A pulse with phase phi that changes the coherence order by dp shifts the signal
    of that pathway by -dp*phi. The receiver keeps a pathway when it follows that
    shift on every transient, and cancels it when the shifts average out over the
    transients acquired.
 */

use anyhow::{bail, Result};
use num_complex::Complex64;
use seq_tools::phase_table::PhaseTable;
use seq_tools::rf_phase::RfPhase;

// weights below this are treated as fully cancelled
pub const CANCELLATION_TOLERANCE:f64 = 1.0E-9;

#[derive(Clone,Debug,PartialEq)]
pub struct CoherencePathway {
    label:String,
    // coherence order change caused by each phase cycled pulse
    jumps:Vec<i32>
}

impl CoherencePathway {
    pub fn new(label:&str,jumps:&[i32]) -> CoherencePathway {
        CoherencePathway{
            label:label.to_owned(),
            jumps:jumps.to_vec()
        }
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn jumps(&self) -> &[i32] {
        &self.jumps
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum CycleCompletion {
    // transient count is a multiple of the cycle length
    Complete,
    // cycle is cut short but the suppressed pathways still cancel
    Partial,
    // at least one suppressed pathway survives
    Incomplete,
}

#[derive(Clone,Debug)]
pub struct PhaseCycle {
    pulses:Vec<PhaseTable>,
    receiver:PhaseTable
}

impl PhaseCycle {
    pub fn new(pulses:Vec<PhaseTable>,receiver:PhaseTable) -> Result<PhaseCycle> {
        if pulses.is_empty() {
            bail!("a phase cycle needs at least one pulse table");
        }
        if let Some(table) = pulses.iter().find(|table| table.len() != receiver.len()) {
            bail!("phase table {} has {} steps but receiver table {} has {}. Tables in a cycle must be the same length",
                table.label(),table.len(),receiver.label(),receiver.len());
        }
        Ok(PhaseCycle{pulses,receiver})
    }
    pub fn len(&self) -> usize {
        self.receiver.len()
    }
    pub fn pulses(&self) -> &[PhaseTable] {
        &self.pulses
    }
    pub fn receiver(&self) -> &PhaseTable {
        &self.receiver
    }
    pub fn signal_phase(&self,pathway:&CoherencePathway,ct:u32) -> Result<RfPhase> {
        if pathway.jumps().len() != self.pulses.len() {
            bail!("pathway {} has {} coherence jumps but the cycle has {} phase cycled pulses",
                pathway.label(),pathway.jumps().len(),self.pulses.len());
        }
        let shift:i32 = pathway.jumps().iter().zip(self.pulses.iter())
            .map(|(jump,table)| jump*table.element(ct).step() as i32)
            .sum();
        Ok(RfPhase::wrapping(-shift))
    }
    pub fn receiver_follows(&self,pathway:&CoherencePathway,ct:u32) -> Result<bool> {
        Ok(self.signal_phase(pathway,ct)? == self.receiver.element(ct))
    }
    /// Fraction of a pathway's signal left after acquiring nt transients.
    /// 1 means the pathway is fully kept and 0 that it is cancelled.
    pub fn pathway_weight(&self,pathway:&CoherencePathway,nt:u32) -> Result<f64> {
        if nt == 0 {
            bail!("pathway weight needs at least one transient");
        }
        let mut sum = Complex64::new(0.0,0.0);
        for ct in 0..nt {
            let signal = self.signal_phase(pathway,ct)?.phasor();
            sum += signal*self.receiver.element(ct).phasor().conj();
        }
        Ok(sum.norm()/nt as f64)
    }
    pub fn completion(&self,nt:u32,suppressed:&[CoherencePathway]) -> Result<CycleCompletion> {
        if nt == 0 {
            bail!("transient count must be at least 1");
        }
        if nt as usize % self.len() == 0 {
            return Ok(CycleCompletion::Complete);
        }
        for pathway in suppressed {
            if self.pathway_weight(pathway,nt)? > CANCELLATION_TOLERANCE {
                return Ok(CycleCompletion::Incomplete);
            }
        }
        Ok(CycleCompletion::Partial)
    }
}

#[cfg(test)]
fn two_step() -> PhaseCycle {
    PhaseCycle::new(
        vec![PhaseTable::new("ph1",&[0,1]).unwrap()],
        PhaseTable::new("rec",&[0,3]).unwrap()
    ).unwrap()
}

#[test]
fn test_new() {
    let mismatch = PhaseCycle::new(
        vec![PhaseTable::new("ph1",&[0,1,2]).unwrap()],
        PhaseTable::new("rec",&[0,2]).unwrap()
    );
    assert!(mismatch.is_err());
    assert!(PhaseCycle::new(vec![],PhaseTable::new("rec",&[0]).unwrap()).is_err());
    assert_eq!(two_step().len(),2);
}

#[test]
fn test_signal_phase() {
    let cycle = two_step();
    let p = CoherencePathway::new("p+1",&[1]);
    assert_eq!(cycle.signal_phase(&p,0).unwrap(),RfPhase::Zero);
    assert_eq!(cycle.signal_phase(&p,1).unwrap(),RfPhase::TwoSeventy);
    assert!(cycle.receiver_follows(&p,1).unwrap());
    assert!(cycle.signal_phase(&CoherencePathway::new("bad",&[1,1]),0).is_err());
}

#[test]
fn test_pathway_weight() {
    let cycle = two_step();
    let kept = CoherencePathway::new("p+1",&[1]);
    let mirror = CoherencePathway::new("p-1",&[-1]);
    assert!((cycle.pathway_weight(&kept,2).unwrap() - 1.0).abs() < 1.0E-12);
    // the mirror pathway alternates against the receiver and cancels
    assert!((cycle.pathway_weight(&mirror,2).unwrap() - 0.0).abs() < 1.0E-12);
    assert!(cycle.pathway_weight(&kept,0).is_err());
}

#[test]
fn test_completion() {
    let cycle = two_step();
    let unwanted = CoherencePathway::new("p-1",&[-1]);
    assert_eq!(cycle.completion(4,&[unwanted.clone()]).unwrap(),CycleCompletion::Complete);
    assert_eq!(cycle.completion(3,&[unwanted.clone()]).unwrap(),CycleCompletion::Incomplete);
    assert_eq!(cycle.completion(3,&[]).unwrap(),CycleCompletion::Partial);
    assert!(cycle.completion(0,&[]).is_err());
}
