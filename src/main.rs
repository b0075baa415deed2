//! Gravity Hero entry point
//!
//! On the web, mounts the background on `#hero-canvas`. Natively, runs the
//! simulation headless and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    match gravity_hero::platform::GravityHero::mount("hero-canvas") {
        // Lives for the whole page
        Ok(hero) => std::mem::forget(hero),
        Err(e) => log::warn!("Gravity Hero not started: {:?}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gravity_hero::Tuning;
    use gravity_hero::platform::LoopDriver;
    use gravity_hero::sim::SurfaceState;

    env_logger::init();

    let frames: u64 = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("usage: gravity-hero [FRAMES]");
                std::process::exit(2);
            }
        },
        None => 3600,
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let surface = SurfaceState::new(1280.0, 720.0, 1.0);

    let mut driver = match LoopDriver::activate(Some(surface), Tuning::load(), seed) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Sweep the pointer around the middle of the surface
    let pointer = driver.pointer_handle();
    for frame in 0..frames {
        let t = frame as f32 * 0.01;
        pointer.set(640.0 + t.cos() * 300.0, 360.0 + t.sin() * 200.0);
        if let Some(det) = driver.frame(false).and_then(|f| f.detonation) {
            log::debug!("frame {}: burst at {:?}", frame, det.centroid);
        }
    }

    let stats = driver.stats();
    driver.deactivate();
    log::info!(
        "{} frames, {} detonations, {} shapes, {} sparks live",
        stats.frames,
        stats.detonations,
        driver.field().shapes.len(),
        driver.field().particles.len()
    );
}
