mod color;
mod data;
mod error;
mod pipeline;
mod plot;
mod report;

use pipeline::Paths;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let paths = Paths::default();
    let outcome = pipeline::run(&paths)?;
    for plot in &outcome.plots {
        log::debug!("{:?} -> {}", plot.kind, plot.path.display());
    }
    log::info!("Report has {} blocks", outcome.report.blocks.len());

    println!(
        "EDA complete! Plots saved in '{}' and report saved as '{}'.",
        paths.plots_dir.display(),
        paths.report.display()
    );
    Ok(())
}
