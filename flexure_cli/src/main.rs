//! # Flexure CLI
//!
//! Command-line front end over `flexure_core`.
//!
//! ```text
//! flexure new demo.flx                      # write a project with sample cases
//! flexure analyze demo.flx                  # report every case
//! flexure analyze demo.flx --case "C-1" --csv c1.csv
//! flexure materials steel                   # search the material library
//! flexure section i_beam 0.1 0.01 0.006 0.2 # section properties
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flexure_core::calculations::{AnalysisSettings, Beam, FailureCriterion, Support, SupportConfig};
use flexure_core::export::write_csv;
use flexure_core::file_io::{load_project, load_project_with_lock_check, save_project, FileLock};
use flexure_core::loads::{Load, LoadSet};
use flexure_core::materials::{MaterialLibrary, MaterialTable};
use flexure_core::project::{BeamCase, MaterialRef, Project};
use flexure_core::report::{sci_notation, text_report};
use flexure_core::sections::{SectionInput, SectionShape, StandardSections};

#[derive(Parser)]
#[command(name = "flexure", version, about = "Statically determinate beam analysis")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze the cases of a project file
    Analyze {
        /// Project file (.flx)
        project: PathBuf,

        /// Only the case with this label
        #[arg(long)]
        case: Option<String>,

        /// Write sampled diagrams of the selected case to CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print results as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// TOML file with analysis settings, replacing the project's
        #[arg(long)]
        config: Option<PathBuf>,

        /// Failure criterion override
        #[arg(long, value_enum)]
        criterion: Option<CriterionArg>,

        /// Diagram sample count override
        #[arg(long)]
        samples: Option<usize>,
    },

    /// List or search materials
    Materials {
        /// Case-insensitive name filter
        filter: Option<String>,

        /// Include the project's user materials
        #[arg(long)]
        project: Option<PathBuf>,

        /// Import name,E,Sy rows into the project (requires --project)
        #[arg(long, requires = "project")]
        import: Option<PathBuf>,

        /// Export all materials to CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Section properties for a standard shape (no shape lists them)
    Section {
        shape: Option<String>,

        /// Dimensions in the order the shape lists them
        #[arg(allow_negative_numbers = true)]
        dims: Vec<f64>,
    },

    /// Create a project file with sample cases
    New {
        path: PathBuf,

        #[arg(long, default_value = "")]
        engineer: String,

        #[arg(long, default_value = "")]
        job: String,

        #[arg(long, default_value = "")]
        client: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CriterionArg {
    Normal,
    Tresca,
    VonMises,
}

impl From<CriterionArg> for FailureCriterion {
    fn from(arg: CriterionArg) -> Self {
        match arg {
            CriterionArg::Normal => FailureCriterion::MaxNormalStress,
            CriterionArg::Tresca => FailureCriterion::Tresca,
            CriterionArg::VonMises => FailureCriterion::VonMises,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Analyze {
            project,
            case,
            csv,
            json,
            config,
            criterion,
            samples,
        } => {
            let options = AnalyzeOptions {
                case,
                csv,
                json,
                config,
                criterion: criterion.map(FailureCriterion::from),
                samples,
            };
            run_analyze(&project, &options)
        }
        Command::Materials {
            filter,
            project,
            import,
            export,
        } => run_materials(filter.as_deref(), project.as_deref(), import.as_deref(), export.as_deref()),
        Command::Section { shape, dims } => run_section(shape.as_deref(), &dims),
        Command::New {
            path,
            engineer,
            job,
            client,
            force,
        } => run_new(&path, Project::new(engineer, job, client), force),
    }
}

struct AnalyzeOptions {
    case: Option<String>,
    csv: Option<PathBuf>,
    json: bool,
    config: Option<PathBuf>,
    criterion: Option<FailureCriterion>,
    samples: Option<usize>,
}

/// Project settings, replaced by `--config`, then patched by flags
fn resolve_settings(project: &Project, options: &AnalyzeOptions) -> Result<AnalysisSettings> {
    let mut settings = match &options.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            toml::from_str::<AnalysisSettings>(&text)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        }
        None => project.settings.analysis,
    };
    if let Some(criterion) = options.criterion {
        settings.criterion = criterion;
    }
    if let Some(samples) = options.samples {
        settings.sample_count = samples;
    }
    settings.validate()?;
    Ok(settings)
}

fn run_analyze(path: &Path, options: &AnalyzeOptions) -> Result<()> {
    let (project, lock) =
        load_project_with_lock_check(path).with_context(|| format!("loading {}", path.display()))?;
    if let Some(info) = lock {
        tracing::info!("Opened read-only; {} is editing", info.holder());
    }
    let settings = resolve_settings(&project, options)?;

    let cases: Vec<&BeamCase> = match &options.case {
        Some(label) => match project.find_case(label) {
            Some((_, case)) => vec![case],
            None => bail!("no case labelled '{}' in {}", label, path.display()),
        },
        None => project.sorted_cases().into_iter().map(|(_, case)| case).collect(),
    };
    if cases.is_empty() {
        bail!("{} has no cases", path.display());
    }
    if options.csv.is_some() && cases.len() > 1 {
        bail!("--csv needs --case when the project has several cases");
    }

    let mut failures = 0;
    let mut json_results = Vec::new();
    for case in cases {
        let outcome = case
            .resolve(&project.materials, &StandardSections)
            .and_then(|input| input.analyze(&settings).map(|result| (input, result)));
        let (input, result) = match outcome {
            Ok(done) => done,
            Err(e) => {
                failures += 1;
                tracing::error!("Case '{}' failed [{}]: {}", case.label, e.error_code(), e);
                continue;
            }
        };

        if let Some(csv_path) = &options.csv {
            let file = File::create(csv_path).with_context(|| format!("creating {}", csv_path.display()))?;
            let rows = write_csv(&result, settings.sample_count, BufWriter::new(file))?;
            tracing::info!("Wrote {} rows to {}", rows, csv_path.display());
        }

        if options.json {
            json_results.push(serde_json::json!({
                "label": case.label,
                "result": result,
            }));
        } else {
            println!("{}", text_report(case, &input, &result));
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }
    if failures > 0 {
        bail!("{} case(s) failed", failures);
    }
    Ok(())
}

fn run_materials(filter: Option<&str>, project: Option<&Path>, import: Option<&Path>, export: Option<&Path>) -> Result<()> {
    let mut loaded = match project {
        Some(path) => Some(load_project(path).with_context(|| format!("loading {}", path.display()))?),
        None => None,
    };

    if let (Some(csv_path), Some(project_path)) = (import, project) {
        let _lock = FileLock::acquire(project_path, whoami())?;
        // Re-read under the lock
        let mut current = load_project(project_path)?;
        let file = File::open(csv_path).with_context(|| format!("opening {}", csv_path.display()))?;
        let count = current.materials.import_csv(file)?;
        current.touch();
        save_project(&current, project_path)?;
        println!("Imported {} materials into {}", count, project_path.display());
        loaded = Some(current);
    }

    let table = loaded.map(|p| p.materials).unwrap_or_else(MaterialTable::new);

    if let Some(csv_path) = export {
        let file = File::create(csv_path).with_context(|| format!("creating {}", csv_path.display()))?;
        table.export_csv(BufWriter::new(file))?;
        println!("Exported materials to {}", csv_path.display());
        return Ok(());
    }

    let names = table.search(filter.unwrap_or(""));
    if names.is_empty() {
        println!("No materials match");
    }
    for name in names {
        let material = table.lookup_material(&name)?;
        let sy = material.yield_strength.map(sci_notation).unwrap_or_else(|| "-".to_string());
        println!("{:<40} E = {:<14} Sy = {}", material.name, sci_notation(material.elastic_modulus), sy);
    }
    Ok(())
}

fn run_section(shape: Option<&str>, dims: &[f64]) -> Result<()> {
    let Some(shape) = shape else {
        for shape in SectionShape::ALL {
            println!("{:<18} {}", shape.id(), shape.dimension_names().join(" "));
        }
        return Ok(());
    };

    let shape = SectionShape::from_name(shape)?;
    let props = shape.properties(dims)?;
    println!("{}", shape.display_name());
    println!("  I  = {}", sci_notation(props.moment_of_inertia));
    println!("  c  = {}", sci_notation(props.extreme_fiber));
    println!("  S  = {}", sci_notation(props.section_modulus()));
    if let Some(area) = props.area {
        println!("  A  = {}", sci_notation(area));
    }
    if let Some(shear_area) = props.shear_area {
        println!("  Av = {}", sci_notation(shear_area));
    }
    println!("  k  = {}", props.shear_factor);
    Ok(())
}

fn run_new(path: &Path, mut project: Project, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} exists; pass --force to overwrite", path.display());
    }
    for case in demo_cases()? {
        project.add_case(case);
    }
    save_project(&project, path)?;
    println!("Created {} with {} cases", path.display(), project.case_count());
    Ok(())
}

/// Sample cases: simple span, cantilever, UDL and an overhang
fn demo_cases() -> Result<Vec<BeamCase>> {
    let steel = MaterialRef::Named("Carbon Steel A36".to_string());
    let rectangle = SectionInput::Shape {
        shape: "rectangle".to_string(),
        dimensions: vec![0.05, 0.1],
    };

    let simple = Beam::new(10.0)?;
    let cantilever = Beam::new(4.0)?;
    let udl = Beam::new(8.0)?;
    let overhang = Beam::new(6.0)?;

    Ok(vec![
        BeamCase {
            label: "S-1 Midspan point load".to_string(),
            beam: simple,
            supports: SupportConfig::simply_supported(simple.length),
            loads: LoadSet::new().with_load(Load::point(1000.0, 5.0)),
            section: rectangle.clone(),
            material: steel.clone(),
        },
        BeamCase {
            label: "C-1 Cantilever tip load".to_string(),
            beam: cantilever,
            supports: SupportConfig::cantilever(cantilever.length),
            loads: LoadSet::new().with_load(Load::point(100.0, 4.0)),
            section: rectangle.clone(),
            material: steel.clone(),
        },
        BeamCase {
            label: "U-1 Uniform load".to_string(),
            beam: udl,
            supports: SupportConfig::simply_supported(udl.length),
            loads: LoadSet::new().with_load(Load::uniform_full(50.0, &udl)),
            section: SectionInput::Shape {
                shape: "i_beam".to_string(),
                dimensions: vec![0.1, 0.01, 0.006, 0.2],
            },
            material: steel.clone(),
        },
        BeamCase {
            label: "O-1 Overhang".to_string(),
            beam: overhang,
            supports: SupportConfig::new(vec![Support::pinned(0.0), Support::roller(4.5), Support::free(6.0)]),
            loads: LoadSet::new()
                .with_load(Load::uniform(300.0, 0.0, 6.0))
                .with_load(Load::point(800.0, 6.0))
                .with_load(Load::moment(-250.0, 2.0)),
            section: SectionInput::Shape {
                shape: "hollow_circle".to_string(),
                dimensions: vec![0.1, 0.08],
            },
            material: MaterialRef::Named("Aluminum 6061-T6".to_string()),
        },
    ])
}

fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
