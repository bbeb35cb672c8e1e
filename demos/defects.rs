//! Shift by defect type independence test on the NIST quality-assurance data.
use chisq::ingest::read_defects_path;
use chisq::{Analysis, ContingencyReport, GammaKernel, SeriesConfig};
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("resources/qa_data.csv");
    let cfg = match args.get(2) {
        Some(json) => SeriesConfig::from_json(json)?,
        None => SeriesConfig::default(),
    };

    let table = read_defects_path(path)?;
    let report = ContingencyReport::from_table("Contingency Table", "shift", &table)?;
    println!("{}", report);

    let kernel = GammaKernel::with_config(cfg)?;
    let analysis = Analysis::run(&kernel, &table)?;
    println!("{}", analysis.summary()?);
    Ok(())
}
