use clap::Parser;
use cli::{Cli, Commands};
use coco::{AnnotationRecord, DatasetAssembler, ImageRecord};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the results, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => {
            let config = args.into_config()?;
            info!("Output directory: {}", config.output_dir.display());

            let report = DatasetAssembler::new(config)?.assemble()?;
            info!(
                "✅ {} manifests built, {} already present",
                report.built(),
                report.skipped()
            );
            for path in report.paths.to_array() {
                println!("{}", path.display());
            }
        }
        Commands::Inspect(args) => {
            let geometry = args.pipeline().process_path(&args.mask)?;
            info!(
                "{}: area {}, {} polygons, {} points",
                args.mask.display(),
                geometry.area,
                geometry.polygons.len(),
                geometry.point_count()
            );
            println!("{}", geometry.to_json(args.pretty)?);
        }
        Commands::Schema => {
            let schemas = serde_json::json!({
                "image": ImageRecord::schema(),
                "annotation": AnnotationRecord::schema(),
            });
            println!("{}", serde_json::to_string_pretty(&schemas)?);
        }
    }

    Ok(())
}
