//! Gridfall entry point
//!
//! Headless demo driver: runs the bundled level sequence (or a plan file
//! given as the first argument) with the autopilot supplying intent, and
//! prints text frames as it goes. Real front ends replace the autopilot
//! with merged keyboard/touch intent and the printer with a display.

use gridfall::consts::FRAME_DT;
use gridfall::render::draw_text;
use gridfall::run::{Outcome, Run, autopilot};
use gridfall::tuning::Tuning;

const DEMO_LEVELS: [&str; 3] = [
    "\
......
@..o..
######",
    "\
.......
@...h.*
#######",
    "\
........
........
@..#..o.
########",
];

/// Frames between printed snapshots
const PRINT_EVERY: u64 = 30;
/// Give up if the autopilot cannot finish within this much simulated time
const MAX_FRAMES: u64 = 60 * 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let plan_file = std::env::args().nth(1);
    let plans: Vec<String> = match &plan_file {
        Some(path) => vec![std::fs::read_to_string(path)?],
        None => DEMO_LEVELS.iter().map(|s| s.to_string()).collect(),
    };
    let plan_refs: Vec<&str> = plans.iter().map(String::as_str).collect();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("seed: {seed}");

    let mut run = Run::new(&plan_refs, Tuning::default(), seed)?;

    let mut frames = 0u64;
    let outcome = loop {
        let intent = autopilot(run.state());
        if let Some(outcome) = run.frame(FRAME_DT, intent) {
            break outcome;
        }
        frames += 1;
        if frames.is_multiple_of(PRINT_EVERY) {
            println!("{}", draw_text(run.state()));
        }
        if frames > MAX_FRAMES {
            log::warn!("demo did not finish in time, stopping");
            break Outcome::Lost;
        }
    };

    println!("{}", draw_text(run.state()));
    match outcome {
        Outcome::Won => println!("You've won! ({} coins)", run.coins()),
        Outcome::Lost => println!("You've lost... ({} coins)", run.coins()),
    }
    Ok(())
}
