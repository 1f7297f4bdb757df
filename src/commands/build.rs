use tracing::info;

use error_pages::{Builder, config::Config};

use crate::BuildArgs;

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config = Config::load_from_arg(Some(args.config_file.as_path()))?;

    info!("loading templates");
    let error_pages = config.error_pages()?;

    let output_dir = if args.output_directory.is_relative() {
        std::env::current_dir()?.join(&args.output_directory)
    } else {
        args.output_directory.clone()
    };

    let result = Builder::new(&error_pages)
        .with_index(args.index)
        .build(&output_dir)?;

    println!(
        "Built {} error page(s) for {} template(s) to {}",
        result.pages,
        result.templates,
        result.output_dir.display()
    );
    if result.index {
        println!("Wrote index to {}", result.output_dir.join("index.html").display());
    }

    Ok(())
}
