use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use docsage::{
    fix_files::{fix_files, Mode},
    nav::{config, front_matter, toc, Site},
    util::collect_markdown_files,
};
use log::error;

fn parse_path(arg: &str) -> Result<PathBuf, std::io::Error> {
    let path = PathBuf::from(arg);
    match path.try_exists() {
        Ok(true) => Ok(path),
        Ok(false) => Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Path not found".to_string(),
        )),
        Err(e) => Err(e),
    }
}

#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SiteArgs {
    /// The site root containing `docs/` and `mkdocs.yml`
    #[arg(short, long, default_value = ".")]
    #[clap(value_parser = parse_path)]
    root: PathBuf,

    /// Documentation directory, defaults to `<root>/docs`
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Site configuration file, defaults to `<root>/mkdocs.yml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory names under the docs directory that are not categories
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,
}

impl SiteArgs {
    fn site(self) -> Site {
        let mut site = Site::at_root(&self.root);
        if let Some(docs_dir) = self.docs_dir {
            site.docs_dir = docs_dir;
        }
        if let Some(config) = self.config {
            site.config_file = config;
        }
        if !self.exclude.is_empty() {
            site.exclude = self.exclude.into_iter().collect();
        }
        site
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add blank lines around $$ math blocks and tidy inline math
    FixMath {
        /// Markdown files or directories to fix
        #[arg(required = true)]
        #[clap(value_parser = parse_path)]
        paths: Vec<PathBuf>,

        /// Print a diff instead of writing, and fail if anything would change
        #[arg(long)]
        check: bool,
    },
    /// Give every category index page the fixed front matter
    FrontMatter(SiteArgs),
    /// Check the blogging dirs in the site configuration against the docs directory
    CheckDirs(SiteArgs),
    /// Regenerate the table of contents of every category index page
    Toc(SiteArgs),
    /// Front matter, dir check and table of contents, in that order
    Nav(SiteArgs),
}

fn run_fix_math(paths: &[PathBuf], mode: Mode) -> bool {
    let files = match collect_markdown_files(paths) {
        Ok(files) => files,
        Err(e) => {
            error!("{e}");
            return false;
        }
    };
    if files.is_empty() {
        error!("No Markdown files found");
        return false;
    }
    println!("Found {} files\n", files.len());

    let mut success = true;
    for (path, outcome) in fix_files(files, mode) {
        success &= outcome.is_success(mode);
        outcome.report(&path);
    }
    success
}

/// Logs a step's error and turns the count of failed pages into a verdict.
fn step_succeeded(name: &str, result: docsage::Result<usize>) -> bool {
    match result {
        Ok(0) => true,
        Ok(failures) => {
            error!("{name}: {failures} categories failed");
            false
        }
        Err(e) => {
            error!("{name}: {e}");
            false
        }
    }
}

fn run_check_dirs(site: &Site) -> bool {
    match config::check_blog_dirs(site) {
        Ok(Some(check)) => {
            check.report();
            check.is_consistent()
        }
        Ok(None) => true,
        Err(e) => {
            error!("{e}");
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let success = match args.command {
        Commands::FixMath { paths, check } => {
            let mode = if check { Mode::Check } else { Mode::Write };
            run_fix_math(&paths, mode)
        }
        Commands::FrontMatter(site_args) => {
            let site = site_args.site();
            step_succeeded("front matter", front_matter::format_index_pages(&site))
        }
        Commands::CheckDirs(site_args) => run_check_dirs(&site_args.site()),
        Commands::Toc(site_args) => {
            let site = site_args.site();
            step_succeeded("table of contents", toc::generate_links(&site))
        }
        Commands::Nav(site_args) => {
            let site = site_args.site();
            let front = step_succeeded("front matter", front_matter::format_index_pages(&site));
            let dirs = run_check_dirs(&site);
            let links = step_succeeded("table of contents", toc::generate_links(&site));
            front && dirs && links
        }
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
