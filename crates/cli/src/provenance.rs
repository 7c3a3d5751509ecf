use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the diagram input and the layout parameters.
pub struct Provenance {
    pub input: Value,
    pub params: Value,
}

impl Provenance {
    pub fn new(input: Value, params: Value) -> Self {
        Self { input, params }
    }

    /// JSON block with the code revision and crate version; `outputs` lists written files.
    pub fn to_json(&self, outputs: &[String]) -> Value {
        json!({
            "code_rev": current_git_rev(),
            "version": orthoknot::VERSION,
            "input": self.input,
            "params": self.params,
            "outputs": outputs,
        })
    }
}

/// Write `<stem>.provenance.json` next to `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, provenance: &Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let mut doc = provenance.to_json(&[artifact.to_string_lossy().into_owned()]);
    doc["callsite"] = json!({
        "file": callsite.file(),
        "line": callsite.line()
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("layout"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else `"unknown"`.
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_replaces_the_extension() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/out/trefoil.json")),
            Path::new("/tmp/out/trefoil.provenance.json")
        );
        assert_eq!(
            sidecar_path(Path::new("layout")),
            Path::new("layout.provenance.json")
        );
    }

    #[test]
    fn write_sidecar_records_input_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("knot.json");
        let prov = Provenance::new(json!({"braid": [1, 1, 1]}), json!({"exterior": null}));
        let path = write_sidecar(&artifact, &prov).unwrap();
        assert_eq!(path, dir.path().join("nested").join("knot.provenance.json"));

        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["input"]["braid"], json!([1, 1, 1]));
        assert_eq!(parsed["version"], orthoknot::VERSION);
        assert!(parsed["callsite"]["line"].as_u64().is_some());
    }
}
