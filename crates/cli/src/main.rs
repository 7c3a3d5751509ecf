use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use orthoknot::cfg::DEFAULT_MAX_ITERATIONS;
use orthoknot::diagram::{parse_pd_code, Braid, PlanarDiagram};
use orthoknot::{Layout, OrthoCfg};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod provenance;

use export::{face_lines, BendsDoc, OrthoDoc};
use provenance::{write_sidecar, Provenance};

#[derive(Parser, Debug)]
#[command(name = "orthoknot")]
#[command(about = "Orthogonal layouts of knot and link diagrams")]
struct Cmd {
    /// PD code (`PD[X[1,4,2,5], ...]` or JSON), or a file containing one
    #[arg(long, global = true, conflicts_with = "braid")]
    pd: Option<String>,

    /// Braid word, e.g. "1 -2 1"; its closure is laid out
    #[arg(long, global = true, allow_hyphen_values = true)]
    braid: Option<String>,

    /// Strand count for --braid (default: smallest that fits)
    #[arg(long, global = true)]
    strands: Option<usize>,

    /// Face to use as the unbounded region (default: a largest face)
    #[arg(long, global = true)]
    exterior: Option<usize>,

    /// Iteration budget passed to the LP backend
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u64,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the face cycles, one per line
    Faces,
    /// Print the minimum bends as JSON
    Bends,
    /// Write the orthogonal representation as JSON plus a provenance sidecar
    Ortho {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match &cmd.action {
        Action::Faces => faces(&cmd),
        Action::Bends => bends(&cmd),
        Action::Ortho { out } => ortho(&cmd, out),
        Action::Report => report(&cmd),
    }
}

impl Cmd {
    fn cfg(&self) -> OrthoCfg {
        OrthoCfg {
            exterior_face: self.exterior,
            max_iterations: self.max_iterations,
            ..OrthoCfg::default()
        }
    }

    fn params(&self) -> Value {
        json!({
            "exterior": self.exterior,
            "max_iterations": self.max_iterations,
        })
    }

    fn has_input(&self) -> bool {
        self.pd.is_some() || self.braid.is_some()
    }

    /// Build the diagram from `--pd` or `--braid`; also returns a JSON echo of the input.
    fn load(&self) -> Result<(PlanarDiagram, Value)> {
        if let Some(pd) = &self.pd {
            let text = if Path::new(pd).is_file() {
                fs::read_to_string(pd).with_context(|| format!("reading PD code from {pd}"))?
            } else {
                pd.clone()
            };
            let code = read_pd_code(&text)?;
            let diagram = PlanarDiagram::from_pd_code(&code)?;
            return Ok((diagram, json!({ "pd": code })));
        }
        if let Some(word) = &self.braid {
            let braid = Braid::parse(self.strands, word).context("parsing braid word")?;
            let diagram = braid.closure()?;
            let echo = json!({ "braid": braid.word(), "strands": braid.strands() });
            return Ok((diagram, echo));
        }
        bail!("no input: pass --pd or --braid")
    }

    fn layout(&self) -> Result<(Layout, Value)> {
        let (diagram, input) = self.load()?;
        tracing::info!(
            crossings = diagram.crossing_count(),
            arcs = diagram.arc_count(),
            "diagram loaded"
        );
        Ok((Layout::new(diagram, self.cfg()), input))
    }
}

/// JSON `[[i, j, k, l], ...]` through serde; anything else (`PD[X[...]]`) through the PD reader.
fn read_pd_code(text: &str) -> Result<Vec<[i64; 4]>> {
    match serde_json::from_str::<Vec<[i64; 4]>>(text) {
        Ok(code) => Ok(code),
        Err(json_err) => {
            tracing::debug!(%json_err, "PD input is not JSON; reading PD notation");
            parse_pd_code(text).context("parsing PD code")
        }
    }
}

fn faces(cmd: &Cmd) -> Result<()> {
    for line in face_report(cmd)? {
        println!("{line}");
    }
    Ok(())
}

fn face_report(cmd: &Cmd) -> Result<Vec<String>> {
    let (mut layout, _) = cmd.layout()?;
    Ok(face_lines(layout.faces()))
}

fn bends(cmd: &Cmd) -> Result<()> {
    let doc = bends_doc(cmd)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn bends_doc(cmd: &Cmd) -> Result<BendsDoc> {
    let (mut layout, _) = cmd.layout()?;
    let doc = BendsDoc::from(layout.bends()?);
    if doc.degraded {
        tracing::warn!(status = %doc.status, "bends are not certified optimal");
    }
    Ok(doc)
}

fn ortho(cmd: &Cmd, out: &Path) -> Result<()> {
    let (mut layout, input) = cmd.layout()?;
    let crossing_slots = layout.diagram().crossing_slots();
    let doc = OrthoDoc::new(layout.ortho()?, crossing_slots);

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let sidecar = write_sidecar(out, &Provenance::new(input, cmd.params()))?;
    tracing::info!(
        out = %out.display(),
        provenance = %sidecar.display(),
        vertices = doc.vertices.len(),
        bends = doc.bend_count,
        "orthogonal representation written"
    );
    Ok(())
}

fn report(cmd: &Cmd) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&report_block(cmd)?)?);
    Ok(())
}

fn report_block(cmd: &Cmd) -> Result<Value> {
    let mut block = if cmd.has_input() {
        let (mut layout, input) = cmd.layout()?;
        let faces = layout.faces().face_count();
        let bends = BendsDoc::from(layout.bends()?);
        let mut block = Provenance::new(input, cmd.params()).to_json(&[]);
        block["summary"] = json!({
            "crossings": layout.diagram().crossing_count(),
            "arcs": layout.diagram().arc_count(),
            "faces": faces,
            "total_bends": bends.total,
            "degraded": bends.degraded,
        });
        block
    } else {
        Provenance::new(Value::Null, cmd.params()).to_json(&[])
    };
    block["tool"] = json!("orthoknot");
    Ok(block)
}
