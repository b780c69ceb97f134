use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use om_sim::{
    logging, msc, Error, FaultInjector, Id, Inverter, ParityLiar, SimConfig, Simulation, Value,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Adversary {
    /// Faulty generals tell even ids to attack and odd ids to retreat.
    Parity,
    /// Faulty generals relay the opposite of what they heard.
    Invert,
}

/// Simulates the Oral Messages OM(f) Byzantine generals algorithm.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Number of generals (N), must be at least 3F + 1 [default: 3F + 1].
    #[arg(short, long)]
    nodes: Option<String>,
    /// Number of faulty generals to tolerate (F).
    #[arg(short, long, default_value_t = 1)]
    faults: usize,
    /// Id of the commanding general.
    #[arg(short, long, default_value_t = 0)]
    sender: Id,
    /// Order the commander gives: attack or retreat.
    #[arg(short, long, default_value = "attack")]
    value: Value,
    /// Ids of faulty generals; the sender may be listed.
    #[arg(long, value_delimiter = ',')]
    faulty: Vec<Id>,
    /// Additionally mark this many random lieutenants faulty.
    #[arg(long, default_value_t = 0)]
    random_faulty: usize,
    /// Seed for --random-faulty.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = Adversary::Parity)]
    adversary: Adversary,
    /// Write the message trace as an mscgen chart.
    #[arg(long)]
    msc: Option<PathBuf>,
}

fn main() {
    logging::enable_logforth();
    let args = Args::parse();

    let result = match args.adversary {
        Adversary::Parity => run(&args, ParityLiar),
        Adversary::Invert => run(&args, Inverter),
    };

    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run<F: FaultInjector>(args: &Args, fault: F) -> Result<(), Error> {
    let config = SimConfig::from_input(
        args.nodes.as_deref(),
        args.faults,
        args.sender,
        args.value,
        args.faulty.iter().copied(),
    )?
    .with_random_faults(args.random_faulty, &mut StdRng::seed_from_u64(args.seed));

    let mut sim = Simulation::configure_with(config, fault)?;
    let reports = sim.run_to_completion()?;

    let view = sim.snapshot();
    for p in view.participants.iter() {
        match (p.is_faulty, p.final_decision) {
            (true, _) => println!("general {}: faulty", p.id),
            (false, Some(decision)) => println!("general {}: {}", p.id, decision),
            (false, None) => println!("general {}: undecided", p.id),
        }
    }
    println!(
        "{} faulty of {}, honest generals {}",
        view.faulty_count(),
        view.participants.len(),
        if sim.honest_generals_agree() {
            "agree"
        } else {
            "disagree"
        }
    );

    if let Some(path) = &args.msc {
        let mut msc_file = File::create(path)?;
        msc_file.write_all(msc::generate_msc(&view, &reports).as_bytes())?;
        info!("wrote message sequence chart to {}", path.display());
    }

    Ok(())
}
