//! Turbofan Twin entry point
//!
//! On the web the JS host drives `platform::web::TwinHandle` directly. The
//! native binary runs the scene headless for a few seconds of simulated time
//! and logs what the airflow and stages are doing.

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

/// Frames at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const FRAMES: u32 = 600;
#[cfg(not(target_arch = "wasm32"))]
const DT: f32 = 1.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    use turbofan_twin::sim::EngineAssembly;
    use turbofan_twin::{QualityPreset, TwinConfig};

    turbofan_twin::platform::init_logging();
    log::info!("Turbofan Twin (native, headless) starting...");

    // Optional JSON config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => TwinConfig::from_json(&json),
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Ok(TwinConfig::default()),
    };

    // TWIN_QUALITY=low|medium|high overrides the configured preset
    let config = config.map(|mut config| {
        if let Some(preset) = std::env::var("TWIN_QUALITY")
            .ok()
            .and_then(|s| QualityPreset::from_str(&s))
        {
            config.quality = preset;
        }
        config
    });

    let engine = config.and_then(|config| EngineAssembly::new(&config));
    match engine {
        Ok(mut engine) => {
            run_headless(&mut engine);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Scripted session: a fan alert raised at 2 s and cleared at 8 s, with a
/// one-second pause at 5 s.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(engine: &mut turbofan_twin::sim::EngineAssembly) {
    use turbofan_twin::ComponentKey;
    use turbofan_twin::sim::{AlertMap, AxialZone, FrameInput, tick};

    let mut alerts = AlertMap::new();
    let mut elapsed = 0.0f32;

    for frame in 0..FRAMES {
        match frame {
            120 => alerts.set(ComponentKey::Fan, true),
            480 => alerts.set(ComponentKey::Fan, false),
            _ => {}
        }
        let playing = !(300..360).contains(&frame);
        if playing {
            elapsed += DT;
        }

        tick(engine, &FrameInput::new(DT, elapsed, playing), &alerts);

        if frame % 120 == 119 {
            let stats = engine.flow().stats();
            let zones = AxialZone::ALL
                .iter()
                .zip(stats.zone_counts.iter().zip(&stats.zone_mean_radius))
                .map(|(zone, (count, radius))| format!("{} {} (r̄ {:.2})", zone.as_str(), count, radius))
                .collect::<Vec<_>>()
                .join(", ");
            log::info!("t={:.2}s playing={} | {}", elapsed, playing, zones);
        }
    }

    for stage in engine.stages() {
        log::info!(
            "{:>6} @ x={:+.2}: {} blades, rotation {:+.3} rad{}",
            stage.name(),
            stage.config().axial_position,
            stage.blade_count(),
            stage.rotation(),
            if stage.is_alert() { " [ALERT]" } else { "" }
        );
    }
    println!("\n✓ Simulated {} frames with {} particles", FRAMES, engine.flow().len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is TwinHandle, this is just to satisfy the compiler
}
