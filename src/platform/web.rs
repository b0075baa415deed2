//! Browser wiring
//!
//! Measures the canvas container, subscribes to window resize and mouse
//! movement, and runs the loop driver from `requestAnimationFrame`. Unlike a
//! page-lifetime game, the widget can be unmounted: every listener and the
//! pending frame are released on [`GravityHero::unmount`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, MouseEvent, Window};

use super::driver::{LoopDriver, register_all};
use crate::error::EngineError;
use crate::renderer::canvas::replay;
use crate::sim::SurfaceState;
use crate::tuning::Tuning;

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn unavailable(reason: &'static str) -> EngineError {
    EngineError::SurfaceUnavailable { reason }
}

/// Install the console logger and panic hook once per page
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already installed".into());
        }
    });
}

/// A window event subscription that can be removed later
struct Listener {
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn detach(&self, window: &Window) {
        let _ = window
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct Mounted {
    driver: LoopDriver,
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    frame_id: Option<i32>,
    frame_callback: Option<Closure<dyn FnMut(f64)>>,
    listeners: Vec<Listener>,
}

impl Mounted {
    /// Run one frame. Returns false once the driver has stopped.
    fn run_frame(&mut self) -> bool {
        let dark = is_dark(&self.document);
        let Some(frame) = self.driver.frame(dark) else {
            return false;
        };

        if let Some(surface) = frame.resized {
            if let Err(e) = self.size_backing_store(surface) {
                log::warn!("Could not resize canvas: {:?}", e);
            }
        }
        if let Err(e) = replay(&self.ctx, &frame.commands) {
            log::warn!("Draw failed: {:?}", e);
        }
        true
    }

    /// Allocate a device-pixel backing store and scale drawing to match
    fn size_backing_store(&self, surface: SurfaceState) -> Result<(), JsValue> {
        let (width, height) = surface.backing_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", surface.width))?;
        style.set_property("height", &format!("{}px", surface.height))?;

        let ratio = surface.pixel_ratio as f64;
        self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
    }

    fn request_frame(&mut self) {
        let id = match self.frame_callback.as_ref() {
            Some(callback) => self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok(),
            None => None,
        };
        self.frame_id = id;
    }

    fn teardown(&mut self) {
        if !self.driver.is_active() && self.listeners.is_empty() {
            return;
        }
        self.driver.deactivate();

        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        for listener in self.listeners.drain(..) {
            listener.detach(&self.window);
        }
        self.frame_callback = None;
    }
}

fn is_dark(document: &Document) -> bool {
    document
        .document_element()
        .map(|root| root.class_list().contains("dark"))
        .unwrap_or(false)
}

/// Container size in CSS pixels plus the current device pixel ratio
fn measure(window: &Window, container: &Element) -> SurfaceState {
    SurfaceState::new(
        container.client_width() as f32,
        container.client_height() as f32,
        window.device_pixel_ratio() as f32,
    )
}

/// Handle to a mounted background. Dropping it unmounts.
#[wasm_bindgen]
pub struct GravityHero {
    inner: Rc<RefCell<Mounted>>,
}

#[wasm_bindgen]
impl GravityHero {
    /// Start the background on the canvas with id `canvas_id`
    ///
    /// The canvas is sized to fill its parent element.
    pub fn mount(canvas_id: &str) -> Result<GravityHero, JsValue> {
        init_logging();

        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let document = window.document().ok_or_else(|| unavailable("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| unavailable("canvas element not found"))?
            .dyn_into()
            .map_err(|_| unavailable("element is not a canvas"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| unavailable("2d context not supported"))?
            .dyn_into()
            .map_err(|_| unavailable("2d context has the wrong type"))?;
        let container: Element = canvas
            .parent_element()
            .ok_or_else(|| unavailable("canvas has no container"))?;

        let surface = measure(&window, &container);
        let seed = js_sys::Date::now() as u64;
        let driver = LoopDriver::activate(Some(surface), Tuning::load(), seed)?;

        // Resize: queue new dimensions for the next frame
        let on_resize = {
            let resize = driver.resize_handle();
            let window_clone = window.clone();
            Listener {
                kind: "resize",
                callback: Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    resize.notify(measure(&window_clone, &container));
                }),
            }
        };

        // Mouse move: page coordinates to canvas-local
        let on_mouse_move = {
            let pointer = driver.pointer_handle();
            let canvas_clone = canvas.clone();
            Listener {
                kind: "mousemove",
                callback: Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    if let Some(event) = event.dyn_ref::<MouseEvent>() {
                        let rect = canvas_clone.get_bounding_client_rect();
                        pointer.set(
                            (event.client_x() as f64 - rect.left()) as f32,
                            (event.client_y() as f64 - rect.top()) as f32,
                        );
                    }
                }),
            }
        };

        let listeners = register_all(
            vec![on_resize, on_mouse_move],
            |listener| {
                window.add_event_listener_with_callback(
                    listener.kind,
                    listener.callback.as_ref().unchecked_ref(),
                )
            },
            |listener| listener.detach(&window),
        )?;

        let inner = Rc::new(RefCell::new(Mounted {
            driver,
            window,
            document,
            canvas,
            ctx,
            frame_id: None,
            frame_callback: None,
            listeners,
        }));

        start_loop(&inner);
        log::info!("Gravity Hero mounted on #{}", canvas_id);

        Ok(GravityHero { inner })
    }

    /// Stop the loop and drop every subscription. Safe to call twice.
    pub fn unmount(&self) {
        self.inner.borrow_mut().teardown();
    }

    /// Frames run so far
    pub fn frames(&self) -> f64 {
        self.inner.borrow().driver.stats().frames as f64
    }

    /// Detonations so far
    pub fn detonations(&self) -> f64 {
        self.inner.borrow().driver.stats().detonations as f64
    }
}

impl Drop for GravityHero {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.teardown();
        }
    }
}

fn start_loop(inner: &Rc<RefCell<Mounted>>) {
    let weak: Weak<RefCell<Mounted>> = Rc::downgrade(inner);
    let callback = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let mut mounted = state.borrow_mut();
        if mounted.run_frame() {
            mounted.request_frame();
        } else {
            mounted.frame_id = None;
        }
    });

    let mut mounted = inner.borrow_mut();
    mounted.frame_callback = Some(callback);
    mounted.request_frame();
}
