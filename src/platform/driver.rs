//! Loop driver
//!
//! Owns the field, the surface and the per-frame schedule, independent of
//! any particular host. The host calls [`LoopDriver::frame`] once per
//! animation frame and feeds pointer and resize events through the cloneable
//! handles. Events land in single-value cells (last write wins) that the
//! driver reads at frame start, so nothing changes mid-tick.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::error::{EngineError, EngineResult};
use crate::renderer::{DrawCommand, Theme, render_scene};
use crate::sim::{Detonation, Field, SurfaceState, TickInput, tick};
use crate::tuning::Tuning;

/// Writer side of the pointer cell
#[derive(Debug, Clone, Default)]
pub struct PointerHandle(Rc<Cell<Option<Vec2>>>);

impl PointerHandle {
    /// Record a pointer position in surface-local coordinates
    pub fn set(&self, x: f32, y: f32) {
        self.0.set(Some(Vec2::new(x, y)));
    }

    pub fn get(&self) -> Option<Vec2> {
        self.0.get()
    }
}

/// Writer side of the pending-resize cell
#[derive(Debug, Clone, Default)]
pub struct ResizeHandle(Rc<Cell<Option<SurfaceState>>>);

impl ResizeHandle {
    /// Queue new surface dimensions for the next frame
    pub fn notify(&self, surface: SurfaceState) {
        self.0.set(Some(surface));
    }

    fn take(&self) -> Option<SurfaceState> {
        self.0.take()
    }
}

/// Output of one frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// New surface size, when the backing store must be reallocated before
    /// drawing this frame
    pub resized: Option<SurfaceState>,
    pub detonation: Option<Detonation>,
    pub commands: Vec<DrawCommand>,
}

/// Frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub frames: u64,
    pub detonations: u64,
    pub skipped_frames: u64,
}

/// Drives the simulation one frame at a time
#[derive(Debug)]
pub struct LoopDriver {
    field: Field,
    surface: SurfaceState,
    tuning: Tuning,
    pointer: PointerHandle,
    resize: ResizeHandle,
    /// Shapes wait for a non-empty surface before the first spawn
    populated: bool,
    backing_stale: bool,
    active: bool,
    stats: DriverStats,
}

impl LoopDriver {
    /// Start the engine on `surface`
    ///
    /// Declines to start without a surface. `fallback_seed` is used when the
    /// tuning doesn't pin one.
    pub fn activate(
        surface: Option<SurfaceState>,
        tuning: Tuning,
        fallback_seed: u64,
    ) -> EngineResult<Self> {
        let surface = surface.ok_or(EngineError::SurfaceUnavailable {
            reason: "host provided no surface",
        })?;
        tuning.validate()?;

        let seed = tuning.seed.unwrap_or(fallback_seed);
        let mut driver = Self {
            field: Field::new(seed),
            surface,
            tuning,
            pointer: PointerHandle::default(),
            resize: ResizeHandle::default(),
            populated: false,
            backing_stale: true,
            active: true,
            stats: DriverStats::default(),
        };
        driver.populate_if_ready();

        log::info!(
            "Engine activated: {}x{} @{}x, seed {}, {} neighbor index",
            surface.width,
            surface.height,
            surface.pixel_ratio,
            seed,
            driver.tuning.neighbor_index.as_str()
        );
        if surface.is_empty() {
            log::warn!("Surface has no area, waiting for a resize");
        }
        Ok(driver)
    }

    fn populate_if_ready(&mut self) {
        if self.populated || self.surface.is_empty() {
            return;
        }
        let bounds = self.surface.bounds();
        for _ in 0..self.tuning.population {
            self.field.spawn_shape(bounds);
        }
        self.populated = true;
    }

    /// Handle for pointer-move callbacks
    pub fn pointer_handle(&self) -> PointerHandle {
        self.pointer.clone()
    }

    /// Handle for resize callbacks
    pub fn resize_handle(&self) -> ResizeHandle {
        self.resize.clone()
    }

    /// Run one frame: apply a pending resize, tick, render
    ///
    /// Returns `None` once deactivated; the host must not schedule again.
    pub fn frame(&mut self, dark: bool) -> Option<Frame> {
        if !self.active {
            return None;
        }

        if let Some(surface) = self.resize.take() {
            if surface != self.surface {
                log::debug!(
                    "Surface resized to {}x{} @{}x",
                    surface.width,
                    surface.height,
                    surface.pixel_ratio
                );
                if surface.is_empty() && !self.surface.is_empty() {
                    log::warn!("Surface collapsed to zero area, pausing");
                }
                self.surface = surface;
                self.backing_stale = true;
            }
        }
        self.populate_if_ready();

        let resized = if self.backing_stale {
            self.backing_stale = false;
            Some(self.surface)
        } else {
            None
        };

        self.stats.frames += 1;
        if self.surface.is_empty() {
            self.stats.skipped_frames += 1;
            return Some(Frame {
                resized,
                detonation: None,
                commands: Vec::new(),
            });
        }

        let input = TickInput {
            pointer: self.pointer.get(),
        };
        let detonation = tick(&mut self.field, &self.surface, &input, &self.tuning);
        if detonation.is_some() {
            self.stats.detonations += 1;
        }

        let commands = render_scene(
            &self.field,
            &self.surface,
            Theme::from_dark(dark),
            &self.tuning,
        );

        Some(Frame {
            resized,
            detonation,
            commands,
        })
    }

    /// Stop producing frames. Idempotent.
    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            log::info!(
                "Engine deactivated after {} frames, {} detonations",
                self.stats.frames,
                self.stats.detonations
            );
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn surface(&self) -> SurfaceState {
        self.surface
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }
}

/// Register every subscription or none of them
///
/// If `register` fails partway, the subscriptions already in place are passed
/// to `unregister` (newest first) before the error is returned, so nothing
/// stays attached to a callback that is about to be dropped.
pub fn register_all<S, E>(
    subscriptions: Vec<S>,
    mut register: impl FnMut(&S) -> Result<(), E>,
    mut unregister: impl FnMut(&S),
) -> Result<Vec<S>, E> {
    let mut registered = Vec::with_capacity(subscriptions.len());
    for sub in subscriptions {
        if let Err(e) = register(&sub) {
            for done in registered.iter().rev() {
                unregister(done);
            }
            return Err(e);
        }
        registered.push(sub);
    }
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SurfaceState {
        SurfaceState::new(800.0, 600.0, 2.0)
    }

    #[test]
    fn test_declines_without_surface() {
        let err = LoopDriver::activate(None, Tuning::default(), 1).unwrap_err();
        assert!(matches!(err, EngineError::SurfaceUnavailable { .. }));
    }

    #[test]
    fn test_declines_invalid_tuning() {
        let tuning = Tuning {
            cluster_radius: 0.0,
            ..Tuning::default()
        };
        assert!(LoopDriver::activate(Some(surface()), tuning, 1).is_err());
    }

    #[test]
    fn test_activation_populates_and_first_frame_sizes_backing_store() {
        let mut driver = LoopDriver::activate(Some(surface()), Tuning::seeded(3), 1).unwrap();
        assert_eq!(driver.field().shapes.len(), 50);
        assert_eq!(driver.field().seed, 3);

        let frame = driver.frame(false).unwrap();
        assert_eq!(frame.resized, Some(surface()));
        assert!(!frame.commands.is_empty());

        let frame = driver.frame(false).unwrap();
        assert_eq!(frame.resized, None);
    }

    #[test]
    fn test_resize_applies_next_frame_without_reset() {
        let mut driver = LoopDriver::activate(Some(surface()), Tuning::seeded(3), 1).unwrap();
        driver.frame(false);
        let ids: Vec<u32> = driver.field().shapes.iter().map(|s| s.id).collect();

        let bigger = SurfaceState::new(1200.0, 700.0, 1.0);
        let handle = driver.resize_handle();
        handle.notify(SurfaceState::new(1000.0, 650.0, 1.0));
        handle.notify(bigger);
        assert_eq!(driver.surface(), surface());

        let frame = driver.frame(true).unwrap();
        assert_eq!(frame.resized, Some(bigger));
        assert_eq!(driver.surface(), bigger);
        assert_eq!(
            frame.commands[0],
            DrawCommand::Clear {
                width: 1200.0,
                height: 700.0
            }
        );
        // Detonations may have replaced a few shapes, the rest carry over
        let kept = driver
            .field()
            .shapes
            .iter()
            .filter(|s| ids.contains(&s.id))
            .count();
        assert!(kept >= 47);
    }

    #[test]
    fn test_pointer_handle_feeds_the_tick() {
        let mut tuning = Tuning::seeded(5);
        tuning.population = 0;
        let mut driver = LoopDriver::activate(Some(surface()), tuning, 1).unwrap();
        driver.field.insert_shape(
            crate::sim::ShapeKind::Circle,
            Vec2::new(100.0, 100.0),
        );

        driver.pointer_handle().set(150.0, 100.0);
        driver.frame(false);

        assert!(driver.field().shapes[0].vel.x > 0.0);
    }

    #[test]
    fn test_zero_area_waits_then_populates() {
        let flat = SurfaceState::new(0.0, 0.0, 1.0);
        let mut driver = LoopDriver::activate(Some(flat), Tuning::seeded(7), 1).unwrap();
        assert!(driver.field().shapes.is_empty());

        let frame = driver.frame(false).unwrap();
        assert!(frame.commands.is_empty());
        assert_eq!(driver.field().time_ticks, 0);
        assert_eq!(driver.stats().skipped_frames, 1);

        driver.resize_handle().notify(surface());
        let frame = driver.frame(false).unwrap();
        assert_eq!(driver.field().shapes.len(), 50);
        assert_eq!(driver.field().time_ticks, 1);
        assert!(!frame.commands.is_empty());
    }

    #[test]
    fn test_no_frames_after_deactivation() {
        let mut driver = LoopDriver::activate(Some(surface()), Tuning::seeded(9), 1).unwrap();
        for _ in 0..5 {
            assert!(driver.frame(false).is_some());
        }
        driver.deactivate();
        driver.deactivate();
        assert!(!driver.is_active());

        let ticks = driver.field().time_ticks;
        assert!(driver.frame(false).is_none());
        assert_eq!(driver.field().time_ticks, ticks);
        assert_eq!(driver.stats().frames, 5);
    }

    #[test]
    fn test_fallback_seed_used_when_unpinned() {
        let driver = LoopDriver::activate(Some(surface()), Tuning::default(), 77).unwrap();
        assert_eq!(driver.field().seed, 77);
    }

    #[test]
    fn test_register_all_rolls_back_on_failure() {
        let attached = std::cell::RefCell::new(Vec::new());
        let result = register_all(
            vec!["resize", "mousemove", "touchmove"],
            |&kind| {
                if kind == "mousemove" {
                    return Err("refused");
                }
                attached.borrow_mut().push(kind);
                Ok(())
            },
            |&kind| attached.borrow_mut().retain(|&k| k != kind),
        );
        assert_eq!(result, Err("refused"));
        assert!(attached.borrow().is_empty());
    }

    #[test]
    fn test_register_all_keeps_everything_on_success() {
        let mut attached = Vec::new();
        let subs = register_all(
            vec!["resize", "mousemove"],
            |&kind| {
                attached.push(kind);
                Ok::<_, ()>(())
            },
            |_| unreachable!(),
        )
        .unwrap();
        assert_eq!(subs, vec!["resize", "mousemove"]);
        assert_eq!(attached, subs);
    }
}
