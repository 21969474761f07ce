use std::time::Instant;

use log::info;

use route_order_core::{Result, SolverInput, SolverOptions, SolverOutput, logging, solve};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let report = solve(input.matrix(), input.start(), input.end(), &options)?;
    SolverOutput::new(&report, input.stop_ids()).write(&options)?;

    info!(
        "output: stops={} strategy={} duration_min={} time={:.3}s",
        report.result().ordered_stops().len(),
        report.strategy(),
        report.result().total_duration(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
