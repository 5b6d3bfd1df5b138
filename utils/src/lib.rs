use std::path::{Path, PathBuf};
use std::fs::File;
use std::io::{Write, Read};
use anyhow::{Context, Result};
use glob::glob;

pub fn read_to_string(filepath:&Path) -> Result<String> {
    let mut f = File::open(filepath).with_context(|| format!("cannot open file {:?}",filepath))?;
    let mut s = String::new();
    f.read_to_string(&mut s).with_context(|| format!("trouble reading file {:?}",filepath))?;
    Ok(s)
}

pub fn write_to_file(filepath:&Path,string:&str) -> Result<()> {
    let mut f = File::create(filepath).with_context(|| format!("failed to create file {:?}",filepath))?;
    f.write_all(string.as_bytes()).with_context(|| format!("trouble writing to file {:?}",filepath))?;
    Ok(())
}

pub fn vec_to_string<T>(vec:&[T],separator:&str) -> String
    where T:std::string::ToString {
    let vstr:Vec<String> = vec.iter().map(|num| num.to_string()).collect();
    vstr.join(separator)
}

// single depth search
pub fn get_all_matches(dir:&Path,pattern:&str) -> Result<Vec<PathBuf>> {
    let pat = dir.join(pattern);
    let pat = pat.to_str().with_context(|| format!("cannot coerce {:?} to str",pat))?;
    let mut matches:Vec<PathBuf> = glob(pat).context("failed to read glob pattern")?.flat_map(|m| m).collect();
    matches.sort();
    Ok(matches)
}

#[test]
fn test_vec_to_string() {
    assert_eq!(vec_to_string(&[0,2,0,2],","),"0,2,0,2");
    assert_eq!(vec_to_string::<u8>(&[],","),"");
}

#[test]
fn test_get_all_matches() {
    let dir = std::env::temp_dir().join("utils_get_all_matches_test");
    std::fs::create_dir_all(&dir).unwrap();
    write_to_file(&dir.join("b.json"),"{}").unwrap();
    write_to_file(&dir.join("a.json"),"{}").unwrap();
    write_to_file(&dir.join("c.toml"),"").unwrap();
    let matches = get_all_matches(&dir,"*.json").unwrap();
    assert_eq!(matches,vec![dir.join("a.json"),dir.join("b.json")]);
    assert_eq!(read_to_string(&dir.join("a.json")).unwrap(),"{}");
    std::fs::remove_dir_all(&dir).unwrap();
}
