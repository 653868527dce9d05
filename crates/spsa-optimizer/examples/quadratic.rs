use spsa_optimizer::{FnObjective, Spsa, SpsaConfig};
use tracing_subscriber::EnvFilter;

/// Shifted bowl with its minimum at (1.5, -0.5, 2.0).
fn shifted_quadratic(x: &[f64]) -> f64 {
    let target = [1.5, -0.5, 2.0];
    x.iter().zip(target).map(|(v, t)| (v - t).powi(2)).sum()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("SPSA quadratic example");

    let config = SpsaConfig::new()
        .with_max_trials(500)
        .with_save_steps(50)
        .with_last_avg(25)
        .with_seed(2024);

    let mut spsa = Spsa::new(config)?;
    println!("{}", spsa.setting());

    let run = spsa.run(FnObjective::new(3, shifted_quadratic), &[0.0, 0.0, 0.0])?;

    for (i, record) in run.history.iter().enumerate() {
        println!(
            "saved trial {:>2}: cost+ = {:>10.6}, cost- = {:>10.6}",
            i, record.cost_plus, record.cost_minus
        );
    }

    println!("calibrated c0: {:.6}", run.coefficients.a);
    println!("best point:    {:?}", run.best_theta);
    println!("final cost:    {:.6}", run.final_cost);
    println!("elapsed:       {} ms", run.duration().num_milliseconds());

    Ok(())
}
