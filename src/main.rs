use clap::{Parser, Subcommand};
use image::GenericImageView;
use sketchbook_variants::imaging::{ImageType, SizeCeiling, Tier};
use sketchbook_variants::{FsStore, config, naming, output, pipeline};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Which upload and which tiers.
#[derive(clap::Args, Clone)]
struct UploadArgs {
    /// Source image (JPEG or PNG)
    file: PathBuf,

    /// Upload archetype
    #[arg(long = "type", value_enum, default_value = "thumbnail")]
    image_type: ImageType,

    /// Highest tier to generate
    #[arg(long, value_enum, default_value = "large")]
    ceiling: SizeCeiling,
}

#[derive(Parser)]
#[command(name = "sketchbook-variants")]
#[command(about = "Generate stored size variants for sketch thumbnails and profile photos")]
#[command(long_about = "\
Generate stored size variants for sketch thumbnails and profile photos

Each upload is decoded, stripped of any solid border, and rendered into
cover-fit JPEG tiers:

  thumbnail (16:9)   small 320x180   medium 640x360   large 1280x720
  profile   (1:1)    small 88x88     medium 256x256   large 512x512

Medium and large shrink to the source's own resolution instead of
upscaling. Variants are written to <out>/<prefix>/<tier>/<name>.

Run 'sketchbook-variants gen-config' to generate a documented variants.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Pipeline config file (missing file = defaults)
    #[arg(long, default_value = "variants.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an upload and write its variants
    Process {
        #[command(flatten)]
        upload: UploadArgs,

        /// Storage prefix, e.g. "sketches/thumbnails"
        #[arg(long)]
        prefix: String,

        /// Storage root directory
        #[arg(long, default_value = "media")]
        out: PathBuf,

        /// Stored file name (default: content hash + extension)
        #[arg(long)]
        name: Option<String>,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the variants an upload would get, without writing anything
    Plan {
        #[command(flatten)]
        upload: UploadArgs,
    },
    /// Delete every tier of a stored file name
    Delete {
        /// Stored file name
        name: String,

        /// Storage prefix the variants were written under
        #[arg(long)]
        prefix: String,

        /// Storage root directory
        #[arg(long, default_value = "media")]
        out: PathBuf,
    },
    /// Print a stock variants.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            upload,
            prefix,
            out,
            name,
            json,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let bytes = std::fs::read(&upload.file)?;

            // Reject anything outside the MIME table before decoding
            let extension = naming::extension_for_mime(naming::sniff_mime(&bytes)?)?;
            let file_name = match name {
                Some(name) => name,
                None => naming::content_file_name(&bytes)?,
            };
            log::debug!("{} sniffed as .{extension}", upload.file.display());

            let store = FsStore::new(out);
            let stored = pipeline::run_pipeline_with(
                &bytes,
                upload.ceiling,
                upload.image_type,
                &file_name,
                &prefix,
                &store,
                &config,
            )?;

            if json {
                let report = output::ProcessReport {
                    file_name: &file_name,
                    image_type: upload.image_type,
                    prefix: &prefix,
                    variants: &stored,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_lines(&output::format_process_output(
                    &file_name,
                    upload.image_type,
                    &prefix,
                    &stored,
                ));
            }
        }
        Command::Plan { upload } => {
            let config = config::load_config(&cli.config)?;
            let bytes = std::fs::read(&upload.file)?;
            let image = pipeline::prepare(&bytes, &config)?;
            let specs =
                pipeline::plan_image(&image, upload.ceiling, upload.image_type, &config);
            output::print_lines(&output::format_plan_output(
                &display_name(&upload.file),
                upload.image_type,
                image.dimensions(),
                &specs,
            ));
        }
        Command::Delete { name, prefix, out } => {
            let store = FsStore::new(out);
            pipeline::delete_variants(&store, &prefix, &name)?;
            let paths: Vec<String> = Tier::ALL
                .iter()
                .map(|&tier| pipeline::variant_path(&prefix, tier, &name))
                .collect();
            output::print_lines(&output::format_delete_output(&prefix, &paths));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    if !processing.parallel {
        return;
    }
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
