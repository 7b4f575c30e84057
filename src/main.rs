use casestudy_gallery::config::{self, CaseStudyConfig, GalleryConfig};
use casestudy_gallery::manifest::{ScreenshotLoader, ScreenshotManifest};
use casestudy_gallery::{output, render};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "casestudy-gallery")]
#[command(about = "Screenshot galleries for case-study pages")]
#[command(long_about = "\
Screenshot galleries for case-study pages

Captions and technical notes are hand-written Markdown; screenshots are image
files named after them. The builder matches the two and renders one tabbed
gallery per case study.

Project structure:

  site/
  ├── gallery.toml                             # Case studies, tabs, image widths
  ├── content/case-studies/mmh/
  │   ├── mmh-captions.md                      # Blocks headed by screenshot ids
  │   └── mmh-technical-notes.md               # Optional notes, same format
  └── public/case-studies/mmh/
      ├── mmh-admin-dashboard-600.png          # <id>-<width>.<png|webp>
      ├── mmh-admin-dashboard-1200.webp
      └── pagespeed/                           # Subdirectories are fine
          └── mmh-pagespeed-desktopbefore-1800.webp

Groups come from the id: 'pagespeed', then 'mobile', then 'admin', else
'public'.

Run 'casestudy-gallery gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Project root containing gallery.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Only process the case study with this slug
    #[arg(long, global = true)]
    case_study: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build manifests and render gallery pages into the output directory
    Build,
    /// Print the screenshot manifest as JSON
    Manifest,
    /// Report missing captions, orphaned text blocks and duplicate files
    Check {
        /// Exit with an error when any case study has findings
        #[arg(long)]
        strict: bool,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let strict = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Check { strict } => strict,
        _ => false,
    };

    let config = config::load_config(&cli.source)?;
    let studies = select_case_studies(&config, cli.case_study.as_deref())?;
    if studies.is_empty() {
        log::warn!(
            "no case studies configured in {}",
            cli.source.join(config::CONFIG_FILE).display()
        );
    }

    match cli.command {
        Command::Build => build(&cli, &config, &studies)?,
        Command::Manifest => print_manifests(&cli, &config, &studies)?,
        Command::Check { .. } => check(&cli, &config, &studies, strict)?,
        Command::GenConfig => {}
    }

    Ok(())
}

fn build(
    cli: &Cli,
    config: &GalleryConfig,
    studies: &[&CaseStudyConfig],
) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Building {} → {}", cli.source.display(), cli.output.display());
    let mut screenshots = 0;
    for (i, study) in studies.iter().enumerate() {
        let manifest = load_manifest(&cli.source, config, study)?;
        let summary = study.read_summary(&cli.source)?;
        render::write_case_study(&cli.output, study, summary.as_deref(), &manifest, &config.tabs)?;
        output::print_build_output(i + 1, study, &manifest);
        screenshots += manifest.len();
    }
    render::write_stylesheet(&cli.output)?;
    output::print_build_summary(studies.len(), screenshots, &cli.output);
    Ok(())
}

/// Print every selected manifest as one JSON object keyed by slug.
fn print_manifests(
    cli: &Cli,
    config: &GalleryConfig,
    studies: &[&CaseStudyConfig],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut manifests = serde_json::Map::new();
    for study in studies {
        let manifest = load_manifest(&cli.source, config, study)?;
        manifests.insert(study.slug.clone(), serde_json::to_value(&manifest)?);
    }
    println!("{}", serde_json::to_string_pretty(&manifests)?);
    Ok(())
}

fn check(
    cli: &Cli,
    config: &GalleryConfig,
    studies: &[&CaseStudyConfig],
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Checking {}", cli.source.display());
    let mut unclean = 0;
    for (i, study) in studies.iter().enumerate() {
        let manifest = load_manifest(&cli.source, config, study)?;
        output::print_check_output(i + 1, study, &manifest);
        if !manifest.report.is_clean() {
            unclean += 1;
        }
    }
    if strict && unclean > 0 {
        return Err(format!("{unclean} case studies have unresolved findings").into());
    }
    println!("==> Check complete");
    Ok(())
}

/// All configured case studies, or just the one named by `--case-study`.
fn select_case_studies<'a>(
    config: &'a GalleryConfig,
    slug: Option<&str>,
) -> Result<Vec<&'a CaseStudyConfig>, String> {
    match slug {
        None => Ok(config.case_studies.iter().collect()),
        Some(slug) => config
            .find_case_study(slug)
            .map(|study| vec![study])
            .ok_or_else(|| format!("unknown case study '{slug}'")),
    }
}

fn load_manifest(
    root: &Path,
    config: &GalleryConfig,
    study: &CaseStudyConfig,
) -> Result<ScreenshotManifest, Box<dyn std::error::Error>> {
    let loader = ScreenshotLoader::new(study.loader_config(root, &config.images));
    Ok(loader.load()?)
}
