use std::collections::BTreeMap;
use std::fmt;
use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Serialize,Deserialize};
use crate::rf_phase::RfPhase;

// the console exposes tables t1 through t60
pub const MAX_TABLE_ID:u8 = 60;

#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
pub struct TableId(u8);

impl TableId {
    pub fn new(index:u8) -> Result<TableId> {
        if index < 1 || index > MAX_TABLE_ID {
            bail!("table index {} is out of range. Tables are t1 to t{}",index,MAX_TABLE_ID);
        }
        Ok(TableId(index))
    }
    pub fn index(&self) -> u8 {
        self.0
    }
    pub fn var_name(&self) -> String {
        format!("t{}",self.0)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",self.var_name())
    }
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct PhaseTable {
    label:String,
    steps:Vec<RfPhase>
}

impl PhaseTable {
    pub fn new(label:&str,steps:&[u8]) -> Result<PhaseTable> {
        if steps.is_empty() {
            bail!("phase table {} must have at least one entry",label);
        }
        let steps = steps.iter().enumerate().map(|(i,step)| {
            RfPhase::from_step(*step).with_context(|| format!("bad entry {} in phase table {}",i,label))
        }).collect::<Result<Vec<RfPhase>>>()?;
        Ok(PhaseTable{
            label:label.to_owned(),
            steps
        })
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn steps(&self) -> &[RfPhase] {
        &self.steps
    }
    pub fn raw_steps(&self) -> Vec<u8> {
        self.steps.iter().map(|phase| phase.step()).collect()
    }
    // tables repeat, so the transient counter wraps on the table length
    pub fn element(&self,ct:u32) -> RfPhase {
        self.steps[ct as usize % self.steps.len()]
    }
}

/// Table storage on the console. Tables are installed by slot and read back
/// by transient counter.
#[derive(Clone,Debug,Default)]
pub struct TableStore {
    tables:BTreeMap<TableId,PhaseTable>
}

impl TableStore {
    pub fn new() -> TableStore {
        Self::default()
    }
    pub fn set_table(&mut self,id:TableId,table:PhaseTable) {
        debug!("installing phase table {} into {} ({} steps)",table.label(),id,table.len());
        self.tables.insert(id,table);
    }
    pub fn get_elem(&self,id:TableId,ct:u32) -> Result<RfPhase> {
        let table = self.tables.get(&id).with_context(|| format!("no phase table installed in {}",id))?;
        Ok(table.element(ct))
    }
    pub fn table(&self,id:TableId) -> Option<&PhaseTable> {
        self.tables.get(&id)
    }
    pub fn iter(&self) -> impl Iterator<Item=(&TableId,&PhaseTable)> {
        self.tables.iter()
    }
    pub fn len(&self) -> usize {
        self.tables.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[test]
fn test_table_id() {
    assert!(TableId::new(0).is_err());
    assert!(TableId::new(61).is_err());
    assert_eq!(TableId::new(4).unwrap().var_name(),"t4");
}

#[test]
fn test_phase_table() {
    assert!(PhaseTable::new("empty",&[]).is_err());
    assert!(PhaseTable::new("bad",&[0,1,4]).is_err());
    let t = PhaseTable::new("ph",&[0,2,1,3]).unwrap();
    assert_eq!(t.len(),4);
    assert_eq!(t.element(1),RfPhase::OneEighty);
    assert_eq!(t.element(6),RfPhase::Ninety);
    assert_eq!(t.raw_steps(),vec![0,2,1,3]);
}

#[test]
fn test_table_store() {
    let mut store = TableStore::new();
    let t1 = TableId::new(1).unwrap();
    assert!(store.get_elem(t1,0).is_err());
    store.set_table(t1,PhaseTable::new("ph1",&[0,2]).unwrap());
    assert_eq!(store.get_elem(t1,3).unwrap(),RfPhase::OneEighty);
    // a second install replaces the first
    store.set_table(t1,PhaseTable::new("ph1",&[1]).unwrap());
    assert_eq!(store.get_elem(t1,3).unwrap(),RfPhase::Ninety);
    assert_eq!(store.len(),1);
}
