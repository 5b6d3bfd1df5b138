use std::path::Path;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use seq_tools::console::Console;
use seq_tools::parameters::ParameterStore;
use seq_tools::phase_table::{PhaseTable, TableId, TableStore};
use seq_tools::rf_phase::RfPhase;
use crate::phase_cycle::{CoherencePathway, CycleCompletion, PhaseCycle};

/// Everything the console hands a sequence for one transient: the parameter
/// store, table storage and the transient counter.
pub struct SequenceContext<'a> {
    params:&'a dyn ParameterStore,
    tables:TableStore,
    ct:u32,
}

impl<'a> SequenceContext<'a> {
    pub fn new(params:&'a dyn ParameterStore) -> SequenceContext<'a> {
        SequenceContext{
            params,
            tables:TableStore::new(),
            ct:0
        }
    }
    pub fn params(&self) -> &dyn ParameterStore {
        self.params
    }
    pub fn ct(&self) -> u32 {
        self.ct
    }
    pub fn set_ct(&mut self,ct:u32) {
        self.ct = ct;
    }
    pub fn tables(&self) -> &TableStore {
        &self.tables
    }
    pub fn set_table(&mut self,id:TableId,table:PhaseTable) {
        self.tables.set_table(id,table);
    }
    // element of a table at the current transient
    pub fn get_elem(&self,id:TableId) -> Result<RfPhase> {
        self.tables.get_elem(id,self.ct)
    }
}

pub trait PulseSequence {
    fn name(&self) -> String;
    fn phase_tables(&self) -> Result<Vec<(TableId,PhaseTable)>>;
    // emits the directives of a single transient
    fn pulse_sequence(&self,ctx:&mut SequenceContext,console:&mut dyn Console) -> Result<()>;
    fn phase_cycle(&self) -> Result<PhaseCycle>;
    // pathways the phase cycle exists to remove
    fn suppressed_pathways(&self) -> Vec<CoherencePathway> {
        vec![]
    }
    fn check_transients(&self,nt:u32) -> Result<CycleCompletion> {
        self.phase_cycle()?.completion(nt,&self.suppressed_pathways())
    }
    fn install_tables(&self,ctx:&mut SequenceContext) -> Result<()> {
        for (id,table) in self.phase_tables()? {
            ctx.set_table(id,table);
        }
        Ok(())
    }
    fn run_transient(&self,params:&dyn ParameterStore,console:&mut dyn Console,ct:u32) -> Result<()> {
        let mut ctx = SequenceContext::new(params);
        ctx.set_ct(ct);
        console.begin_transient(ct)?;
        self.pulse_sequence(&mut ctx,console).with_context(|| format!("{} failed on transient {}",self.name(),ct))
    }
    fn run_experiment(&self,params:&dyn ParameterStore,console:&mut dyn Console,nt:u32) -> Result<()> {
        if nt == 0 {
            bail!("number of transients must be at least 1");
        }
        match self.check_transients(nt)? {
            CycleCompletion::Complete => {}
            CycleCompletion::Partial => {
                warn!("{} transients do not complete the {} step phase cycle",nt,self.phase_cycle()?.len());
            }
            CycleCompletion::Incomplete => {
                warn!("{} transients leave suppressed coherence pathways uncancelled",nt);
            }
        }
        info!("running {} for {} transients",self.name(),nt);
        let mut ctx = SequenceContext::new(params);
        for ct in 0..nt {
            debug!("transient {} of {}",ct + 1,nt);
            ctx.set_ct(ct);
            console.begin_transient(ct)?;
            self.pulse_sequence(&mut ctx,console).with_context(|| format!("{} failed on transient {}",self.name(),ct))?;
        }
        info!("{} finished {} transients",self.name(),nt);
        Ok(())
    }
}

/// Parameter files for a sequence. Files ending in .toml are written as toml,
/// anything else as json.
pub trait Initialize: Sized + Serialize + DeserializeOwned {
    fn default() -> Self;
    fn load(params_file:&Path) -> Result<Self> {
        let s = utils::read_to_string(params_file)?;
        let params:Result<Self> = match is_toml(params_file) {
            true => toml::from_str(&s).map_err(anyhow::Error::from),
            false => serde_json::from_str(&s).map_err(anyhow::Error::from),
        };
        params.with_context(|| format!("cannot deserialize parameters from {:?}",params_file))
    }
    fn write(&self,params_file:&Path) -> Result<()> {
        let s = match is_toml(params_file) {
            true => toml::to_string_pretty(self).context("cannot serialize parameters")?,
            false => serde_json::to_string_pretty(self).context("cannot serialize parameters")?,
        };
        utils::write_to_file(params_file,&s)
    }
    fn write_default(params_file:&Path) -> Result<()> {
        Self::default().write(params_file)
    }
}

fn is_toml(params_file:&Path) -> bool {
    params_file.extension().and_then(|ext| ext.to_str()) == Some("toml")
}
