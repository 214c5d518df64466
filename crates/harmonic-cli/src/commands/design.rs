use anyhow::Result;
use clap::Args;
use harmonic_core::design::build_independents;

#[derive(Args)]
pub struct DesignArgs {
    /// Harmonic order (number of cos/sin pairs)
    #[arg(long, default_value = "3")]
    pub order: usize,
}

pub fn run(args: &DesignArgs) -> Result<()> {
    let names = build_independents(args.order)?;
    println!("Order {} ({} coefficients):", args.order, names.len());
    for (j, name) in names.iter().enumerate() {
        println!("  {:>2}  {}", j, name);
    }
    Ok(())
}
