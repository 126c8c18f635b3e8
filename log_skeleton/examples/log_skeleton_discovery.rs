use log_skeleton::{
    discover_log_skeleton, ActivitySet, EventLog, Importable, LogSkeletonOptions,
};
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <path_to_event_log> [noise_threshold]", args[0]);
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let noise_threshold: f64 = match args.get(2) {
        Some(n) => n.parse()?,
        None => 0.0,
    };

    println!("Importing event log from {:?}", input_path);
    let log = EventLog::import_from_path(&input_path)?;

    let activities = ActivitySet::from_log(&log)?;
    println!(
        "Discovering log skeleton for {} traces and {} activities...",
        log.traces.len(),
        activities.len()
    );
    let options = LogSkeletonOptions {
        noise_threshold,
        ..Default::default()
    };
    let model = discover_log_skeleton(&log, &activities, options)?;

    for (kind, pairs) in model.relations() {
        println!("{kind}: {} pairs", pairs.len());
        for (a1, a2) in pairs {
            println!("  {a1} -> {a2}");
        }
    }
    println!("counter:");
    for (activity, count) in &model.counter {
        println!(
            "  {activity}: sum={} min={} max={}",
            count.sum, count.min, count.max
        );
    }

    println!("Done!");
    Ok(())
}
