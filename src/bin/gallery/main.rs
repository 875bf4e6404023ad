//! Galaxy Gallery generator.
//!
//! Usage:
//!   galaxy-gallery --image-list          # List cover URLs not yet downloaded
//!   galaxy-gallery --html5               # Write index.html from gameDB.csv
//!   galaxy-gallery --html5 --embed       # Inline the script and stylesheet
//!   galaxy-gallery -d ';' --save-config  # Store the given flags as defaults
//!
//! Defaults come from `~/.local/share/galaxy-gallery/config.json` when present.
//!
//! The page needs the browser bundle in `pkg/` beside it:
//!   wasm-pack build --target web --out-dir <site>/pkg

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use galaxy_gallery::catalog::{self, Catalog, HtmlOptions};
use galaxy_gallery::config::GalleryConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "galaxy-gallery")]
#[command(about = "Generate an HTML gallery from a GOG Galaxy 2 library export")]
struct Cli {
    /// CSV field delimiter
    #[arg(short = 'd', value_name = "CHARACTER")]
    delimiter: Option<char>,

    /// Library export (CSV)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Where to write the list of images to download
    #[arg(short = 'l', long)]
    list: Option<PathBuf>,

    /// Where to write the HTML page
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write the list of cover images that still need downloading
    #[arg(long)]
    image_list: bool,

    /// Export the library as an HTML5 page
    #[arg(long)]
    html5: bool,

    /// Store the resulting settings as the new defaults
    #[arg(long)]
    save_config: bool,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// Inline the script and stylesheet into the page
    #[arg(long)]
    embed: bool,

    /// Template directory (`<name>.custom.<ext>` files override the stock ones)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Only export these game ids, without cover images
    #[arg(long, num_args = 1.., hide = true)]
    debug: Vec<u32>,
}

impl Cli {
    fn apply(&self, config: &mut GalleryConfig) {
        if let Some(d) = self.delimiter {
            config.delimiter = d;
        }
        if let Some(p) = &self.input {
            config.input = p.clone();
        }
        if let Some(p) = &self.list {
            config.image_list = p.clone();
        }
        if let Some(p) = &self.output {
            config.output = p.clone();
        }
        if let Some(t) = &self.title {
            config.title = t.clone();
        }
        if let Some(p) = &self.templates {
            config.templates_dir = p.clone();
        }
        config.embed |= self.embed;
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if !cli.image_list && !cli.html5 && !cli.save_config {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = GalleryConfig::load();
    cli.apply(&mut config);

    if cli.save_config {
        config.save()?;
        println!("Saved defaults to {}", config.path().display());
        if !cli.image_list && !cli.html5 {
            return Ok(ExitCode::SUCCESS);
        }
    }

    if !config.input.is_file() {
        eprintln!(
            "Library export {} not found. Export your library from GOG Galaxy 2 as CSV \
             and pass it with -i.",
            config.input.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    let catalog = Catalog::load(&config.input, config.delimiter)?;
    let base = Path::new(".");

    if cli.image_list {
        let listed = catalog::write_image_list(&catalog, base, &config.image_list)?;
        if listed == 0 {
            println!("No new images to download");
        } else {
            println!(
                "{listed} image(s) to download, listed in {}. Fetch them with:\n  {}",
                config.image_list.display(),
                catalog::download_hint(&config.image_list)
            );
        }
    }

    if cli.html5 {
        let options = HtmlOptions {
            title: config.title.clone(),
            embed: config.embed,
            templates_dir: config.templates_dir.clone(),
            debug_ids: cli.debug.clone(),
        };
        let missing = catalog::write_html(&catalog, &options, base, &config.output)?;
        println!("Wrote {}", config.output.display());
        if let Some(bundle) = missing {
            println!(
                "{} is missing; build it with:\n  wasm-pack build --target web --out-dir {}",
                bundle.display(),
                bundle.parent().unwrap_or(Path::new("pkg")).display()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
