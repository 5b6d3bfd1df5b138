use std::collections::BTreeMap;
use std::path::Path;
use anyhow::{bail, Context, Result};
use serde::{Serialize,Deserialize};

/// Named experiment parameters as the console hands them to a sequence.
pub trait ParameterStore {
    fn get_val(&self,name:&str) -> Result<f64>;
    fn get_str(&self,name:&str) -> Result<String>;
}

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Real(f64),
    Text(String),
}

#[derive(Clone,Debug,Default,PartialEq,Serialize,Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values:BTreeMap<String,ParamValue>
}

impl ParameterSet {
    pub fn new() -> ParameterSet {
        Self::default()
    }
    pub fn set_val(&mut self,name:&str,value:f64) {
        self.values.insert(name.to_owned(),ParamValue::Real(value));
    }
    pub fn set_str(&mut self,name:&str,value:&str) {
        self.values.insert(name.to_owned(),ParamValue::Text(value.to_owned()));
    }
    pub fn get(&self,name:&str) -> Option<&ParamValue> {
        self.values.get(name)
    }
    pub fn remove(&mut self,name:&str) -> Option<ParamValue> {
        self.values.remove(name)
    }
    pub fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
    // values from other replace values with the same name
    pub fn merge(&mut self,other:&ParameterSet) {
        other.values.iter().for_each(|(name,value)|{
            self.values.insert(name.clone(),value.clone());
        });
    }
    pub fn from_json_str(json_str:&str) -> Result<ParameterSet> {
        serde_json::from_str(json_str).context("cannot deserialize parameter set from json")
    }
    pub fn from_toml_str(toml_str:&str) -> Result<ParameterSet> {
        toml::from_str(toml_str).context("cannot deserialize parameter set from toml")
    }
    pub fn load(params_file:&Path) -> Result<ParameterSet> {
        let s = utils::read_to_string(params_file)?;
        let params = match params_file.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&s),
            Some("toml") => Self::from_toml_str(&s),
            _=> bail!("unknown parameter file type {:?}. Expected .json or .toml",params_file)
        };
        params.with_context(|| format!("cannot load parameters from {:?}",params_file))
    }
    pub fn write(&self,params_file:&Path) -> Result<()> {
        let s = match params_file.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(&self).context("cannot serialize parameter set")?,
            _=> serde_json::to_string_pretty(&self).context("cannot serialize parameter set")?
        };
        utils::write_to_file(params_file,&s)
    }
}

impl ParameterStore for ParameterSet {
    fn get_val(&self,name:&str) -> Result<f64> {
        match self.values.get(name) {
            Some(ParamValue::Real(value)) => Ok(*value),
            Some(ParamValue::Text(_)) => bail!("parameter {} is a string, expected a number",name),
            None => bail!("parameter {} not found",name)
        }
    }
    fn get_str(&self,name:&str) -> Result<String> {
        match self.values.get(name) {
            Some(ParamValue::Text(value)) => Ok(value.clone()),
            Some(ParamValue::Real(_)) => bail!("parameter {} is a number, expected a string",name),
            None => bail!("parameter {} not found",name)
        }
    }
}

#[test]
fn test_get() {
    let mut p = ParameterSet::new();
    p.set_val("j1cf",250.0);
    p.set_str("invshape","wurst");
    assert_eq!(p.get_val("j1cf").unwrap(),250.0);
    assert_eq!(p.get_str("invshape").unwrap(),"wurst");
    assert!(p.get_val("invshape").is_err());
    assert!(p.get_str("j1cf").is_err());
    assert!(p.get_val("pwx").is_err());
}

#[test]
fn test_merge() {
    let mut console = ParameterSet::new();
    console.set_val("d1",1.0);
    console.set_val("pw",10.0);
    let mut experiment = ParameterSet::new();
    experiment.set_val("d1",2.5);
    console.merge(&experiment);
    assert_eq!(console.get_val("d1").unwrap(),2.5);
    assert_eq!(console.get_val("pw").unwrap(),10.0);
    assert_eq!(console.names(),vec!["d1".to_string(),"pw".to_string()]);
}

#[test]
fn test_parse() {
    let p = ParameterSet::from_json_str(r#"{"j1cf": 250, "invshape": "wurst"}"#).unwrap();
    assert_eq!(p.get_val("j1cf").unwrap(),250.0);
    let p = ParameterSet::from_toml_str("d1 = 1\nrof1 = 10.5\ninvshape = \"sech\"\n").unwrap();
    assert_eq!(p.get_val("d1").unwrap(),1.0);
    assert_eq!(p.get_val("rof1").unwrap(),10.5);
    assert_eq!(p.get_str("invshape").unwrap(),"sech");
}

#[test]
fn test_file() {
    let mut p = ParameterSet::new();
    p.set_val("tpwr",56.0);
    p.set_str("invshape","wurst");
    for ext in ["json","toml"] {
        let path = std::env::temp_dir().join("seq_tools_parameter_set_test").with_extension(ext);
        p.write(&path).unwrap();
        assert_eq!(ParameterSet::load(&path).unwrap(),p);
        std::fs::remove_file(&path).unwrap();
    }
    assert!(ParameterSet::load(std::path::Path::new("params.txt")).is_err());
}
