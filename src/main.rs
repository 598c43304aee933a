//! Fairway headless course runner
//!
//! Stands in for the excluded front end: builds a small demo course (or
//! loads one from a JSON file given as the first argument), then drives
//! the world at a fixed 16 ms frame, swinging toward the goal whenever
//! the episode is ready for input. Prints the final snapshot as JSON.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use fairway::Tuning;
use fairway::sim::{Course, GoalRect, World};

const FRAME_MS: f64 = 16.0;
const MAX_FRAMES: u32 = 20_000;
const MAX_STROKES: u32 = 20;

fn main() {
    env_logger::init();

    let course = match std::env::args().nth(1) {
        Some(path) => match load_course(&path) {
            Ok(course) => course,
            Err(err) => {
                log::error!("failed to load course {path}: {err}");
                std::process::exit(1);
            }
        },
        None => demo_course(0xF41A),
    };

    let mut world = match World::from_course(&course, Tuning::default()) {
        Ok(world) => world,
        Err(err) => {
            log::error!("bad course: {err}");
            std::process::exit(1);
        }
    };

    log::info!(
        "course ready: {} segments, spawn ({:.1}, {:.1})",
        world.terrain().segments().len(),
        course.spawn.x,
        course.spawn.y
    );

    for frame in 0..MAX_FRAMES {
        if world.victory() {
            log::info!("victory after {} strokes, {} frames", world.strokes(), frame);
            break;
        }

        if world.ready_for_input() && world.strokes() < MAX_STROKES {
            swing_toward_goal(&mut world);
        }

        world.update(FRAME_MS);

        if frame % 250 == 0 {
            let snap = world.snapshot();
            log::debug!(
                "frame {frame}: pos ({:.2}, {:.2}) regime {:?} strokes {}",
                snap.pos.x,
                snap.pos.y,
                snap.regime,
                snap.strokes
            );
        }
    }

    match serde_json::to_string_pretty(&world.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot encode failed: {err}"),
    }
}

fn load_course(path: &str) -> Result<Course, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// A jagged valley with a pocket toward the right end of the floor
fn demo_course(seed: u64) -> Course {
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut ring = vec![DVec2::new(-4.0, -4.0), DVec2::new(-4.0, 1.0)];
    let mut x: f64 = -4.0;
    while x < 4.0 {
        x += 0.5;
        // The floor dips into a pocket past x = 2
        let dip = if x < 2.0 { 0.0 } else { 0.4 };
        let y = 1.0 + dip + rng.random_range(-0.08..0.08);
        ring.push(DVec2::new(x.min(4.0), y));
    }
    ring.push(DVec2::new(4.0, -4.0));

    Course {
        loops: vec![ring],
        spawn: DVec2::new(-3.5, 0.7),
        goal: Some(GoalRect::new(DVec2::new(2.2, 0.9), DVec2::new(4.0, 1.8))),
    }
}

/// Drag away from the goal so the release fires the ball toward it
fn swing_toward_goal(world: &mut World) {
    let pos = world.body().pos;
    let target = world
        .terrain()
        .goal()
        .map(|goal| (goal.min + goal.max) / 2.0)
        .unwrap_or(pos + DVec2::new(10.0, 0.0));

    // Aim at the goal with a little loft (up is negative y)
    let dir = ((target - pos).normalize_or_zero() + DVec2::new(0.0, -0.4)).normalize_or_zero();
    let drag = -dir * world.tuning().max_hit;

    world.aim_start(pos);
    world.aim_move(pos + drag);
    world.aim_release();
}
