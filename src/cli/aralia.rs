use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use mef_core::{write_mef, XmlOptions};

use crate::aralia;

/// Input file name without its directory, with the `.xml` extension.
pub fn default_output(input: &Path) -> PathBuf {
    input
        .file_name()
        .map_or_else(|| PathBuf::from("out"), PathBuf::from)
        .with_extension("xml")
}

pub fn run(
    cwd: &Path,
    input: &Path,
    multi_top: bool,
    out: Option<&Path>,
    options: &XmlOptions,
) -> Result<()> {
    let file = File::open(cwd.join(input))
        .with_context(|| format!("cannot open {}", input.display()))?;
    let tree = aralia::parse_reader(BufReader::new(file), multi_top)
        .with_context(|| format!("cannot convert {}", input.display()))?;
    info!(
        fault_tree = tree.name(),
        gates = tree.gates().len(),
        basic_events = tree.basic_events().len(),
        house_events = tree.house_events().len(),
        "parsed Aralia input"
    );

    let out = out.map_or_else(|| default_output(input), Path::to_path_buf);
    if out.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_mef(&tree, &mut lock, options)?;
        lock.flush()?;
        return Ok(());
    }

    let target = cwd.join(&out);
    let mut buf = Vec::new();
    write_mef(&tree, &mut buf, options)?;
    fs::write(&target, buf).with_context(|| format!("cannot write {}", out.display()))?;

    eprintln!(
        "{} Converted {} to {}",
        style("●").green(),
        style(tree.name()).bold(),
        out.display()
    );
    if !tree.undefined_events().is_empty() {
        eprintln!(
            "  {} undefined events",
            style(tree.undefined_events().len()).yellow()
        );
    }
    Ok(())
}
