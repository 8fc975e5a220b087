mod analysis;
mod conditions;
mod report;

use std::error::Error;

use analysis::AnalysisSummary;
use clap::Parser;
use conditions::Options;
use env_logger::Env;
use report::render_summary;
use trussfos::read_truss_file;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let options = Options::parse();

    let mut truss = read_truss_file(&options.path)?;
    options.apply(&mut truss)?;
    truss.evaluate()?;

    let summary = AnalysisSummary::collect(&truss).ok_or("analysis results are unavailable")?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(())
}
