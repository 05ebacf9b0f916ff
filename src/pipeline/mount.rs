//! Mount API: the render loop instance and its lifecycle.
//!
//! [`render`] mounts a producer and draws the first frame synchronously. From
//! then on the producer runs inside a deferred root effect: when a signal it
//! read changes, the effect only marks the instance dirty, and the next
//! [`Instance::tick`] that the frame throttle allows re-runs the producer,
//! lays out, paints and writes the diff.
//!
//! # Example
//!
//! ```no_run
//! use ember_tui::pipeline::{RenderOptions, render};
//! use ember_tui::primitives::{Node, text};
//! use ember_tui::reactive::Signal;
//!
//! let count = Signal::new(0);
//! let shown = count.clone();
//! let app = render(
//!     move || Node::from(text(format!("count: {}", shown.get()))),
//!     RenderOptions::default(),
//! )?;
//!
//! count.set(1);
//! app.wait_until_exit()?;
//! # Ok::<(), ember_tui::error::RenderError>(())
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, Write};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::error::RenderError;
use crate::layout::compute_layout;
use crate::primitives::Node;
use crate::reactive::{Effect, create_deferred_effect};
use crate::renderer::{DiffRenderer, FrameBuffer, PaintOptions, StaticLedger, ansi, paint, render_static};

use super::input::{CrosstermInput, InputEvent, InputSource};
use super::terminal::{TerminalCaps, TerminalSetup};
use super::throttle::FrameThrottle;

// =============================================================================
// Producer
// =============================================================================

/// Builds the current node tree. Signals read while it runs are tracked.
pub type Producer = Rc<dyn Fn() -> Node>;

/// Anything that can be rendered: a fixed tree or a producer closure.
pub trait IntoProducer {
    fn into_producer(self) -> Producer;
}

impl IntoProducer for Node {
    fn into_producer(self) -> Producer {
        Rc::new(move || self.clone())
    }
}

impl<F> IntoProducer for F
where
    F: Fn() -> Node + 'static,
{
    fn into_producer(self) -> Producer {
        Rc::new(self)
    }
}

/// How the loop ended.
pub type ExitOutcome = Result<(), RenderError>;

type ExitListener = Box<dyn FnOnce(&ExitOutcome)>;
type InputHandler = Box<dyn FnMut(&InputEvent)>;

// =============================================================================
// Options
// =============================================================================

/// Loop configuration. Build with the `with_*` methods:
///
/// ```
/// use ember_tui::pipeline::{RenderOptions, SharedBuffer, ScriptedInput};
///
/// let options = RenderOptions::default()
///     .with_stdout(SharedBuffer::new())
///     .with_stdin(ScriptedInput::default())
///     .with_max_fps(Some(60))
///     .with_show_cursor(true);
/// # let _ = options;
/// ```
pub struct RenderOptions {
    pub stdout: Box<dyn Write>,
    pub stdin: Box<dyn InputSource>,
    /// Clear the screen before the first frame.
    pub clear_on_start: bool,
    /// Unmount on Ctrl+C. Also enables raw mode when stdin is a terminal.
    pub exit_on_ctrl_c: bool,
    /// Frame-rate cap; `None` renders on every tick with pending changes.
    pub max_fps: Option<u32>,
    pub show_cursor: bool,
    /// Write every frame in full instead of diffing.
    pub debug: bool,
    /// Capabilities to use instead of detecting them.
    pub caps: Option<TerminalCaps>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stdout: Box::new(io::stdout()),
            stdin: Box::new(CrosstermInput),
            clear_on_start: false,
            exit_on_ctrl_c: true,
            max_fps: Some(30),
            show_cursor: false,
            debug: false,
            caps: None,
        }
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("clear_on_start", &self.clear_on_start)
            .field("exit_on_ctrl_c", &self.exit_on_ctrl_c)
            .field("max_fps", &self.max_fps)
            .field("show_cursor", &self.show_cursor)
            .field("debug", &self.debug)
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl RenderOptions {
    pub fn with_stdout(mut self, stdout: impl Write + 'static) -> Self {
        self.stdout = Box::new(stdout);
        self
    }

    pub fn with_stdin(mut self, stdin: impl InputSource + 'static) -> Self {
        self.stdin = Box::new(stdin);
        self
    }

    pub fn with_clear_on_start(mut self, clear: bool) -> Self {
        self.clear_on_start = clear;
        self
    }

    pub fn with_exit_on_ctrl_c(mut self, exit: bool) -> Self {
        self.exit_on_ctrl_c = exit;
        self
    }

    pub fn with_max_fps(mut self, max_fps: Option<u32>) -> Self {
        self.max_fps = max_fps;
        self
    }

    pub fn with_show_cursor(mut self, show: bool) -> Self {
        self.show_cursor = show;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_caps(mut self, caps: TerminalCaps) -> Self {
        self.caps = Some(caps);
        self
    }
}

// =============================================================================
// Instance
// =============================================================================

/// A mounted render loop. Clones share the same instance.
///
/// Dropping the last clone without unmounting disposes the producer and
/// restores the terminal, but resolves no exit outcome. An input handler
/// that captures a clone keeps the instance alive until it unmounts.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<RefCell<Inner>>,
    /// Set by the root effect when a dependency changes.
    dirty: Rc<Cell<bool>>,
    producer: Rc<RefCell<Producer>>,
    /// Output of the latest root effect run, taken by the next frame.
    produced: Rc<RefCell<Option<Result<Node, RenderError>>>>,
}

struct Inner {
    out: Box<dyn Write>,
    input: Box<dyn InputSource>,
    caps: TerminalCaps,
    exit_on_ctrl_c: bool,
    debug: bool,
    setup: TerminalSetup,
    renderer: DiffRenderer,
    ledger: StaticLedger,
    throttle: FrameThrottle,
    root: Option<Effect>,
    tree: Option<Node>,
    frames: u64,
    exit: Option<ExitOutcome>,
    exit_listeners: Vec<ExitListener>,
    input_handler: Option<InputHandler>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.exit.is_some() {
            return;
        }
        if let Some(root) = self.root.take() {
            root.try_dispose();
        }
        if let Err(err) = self.setup.restore(self.out.as_mut()) {
            warn!(%err, "terminal restore on drop failed");
        }
        debug!(frames = self.frames, "dropped while mounted");
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Instance")
            .field("caps", &inner.caps)
            .field("frames", &inner.frames)
            .field("mounted", &inner.exit.is_none())
            .finish_non_exhaustive()
    }
}

/// Mount `producer` and draw the first frame.
///
/// A failure while drawing the first frame unmounts the instance (restoring
/// the terminal) and is returned here.
pub fn render(producer: impl IntoProducer, options: RenderOptions) -> Result<Instance, RenderError> {
    let RenderOptions {
        mut stdout,
        stdin,
        clear_on_start,
        exit_on_ctrl_c,
        max_fps,
        show_cursor,
        debug,
        caps,
    } = options;

    let caps = caps.unwrap_or_else(TerminalCaps::detect);
    let raw = exit_on_ctrl_c && stdin.is_terminal();
    let mut setup = TerminalSetup::new();
    if let Err(err) = setup.enter(stdout.as_mut(), clear_on_start, !show_cursor, raw) {
        let _ = setup.restore(stdout.as_mut());
        return Err(err.into());
    }
    debug!(width = caps.width, height = caps.height, color_mode = ?caps.color_mode, raw, "mounted");

    let dirty = Rc::new(Cell::new(false));
    let producer = Rc::new(RefCell::new(producer.into_producer()));
    let produced = Rc::new(RefCell::new(None));

    let root = {
        let producer = Rc::clone(&producer);
        let produced = Rc::clone(&produced);
        let dirty = Rc::clone(&dirty);
        create_deferred_effect(
            move || {
                let current = Rc::clone(&*producer.borrow());
                let result = catch_unwind(AssertUnwindSafe(|| current()))
                    .map_err(RenderError::from_panic);
                *produced.borrow_mut() = Some(result);
            },
            move || {
                trace!("root invalidated");
                dirty.set(true);
            },
        )
    };

    let instance = Instance {
        inner: Rc::new(RefCell::new(Inner {
            out: stdout,
            input: stdin,
            caps,
            exit_on_ctrl_c,
            debug,
            setup,
            renderer: DiffRenderer::new(caps.color_mode),
            ledger: StaticLedger::new(),
            throttle: FrameThrottle::new(max_fps),
            root: Some(root),
            tree: None,
            frames: 0,
            exit: None,
            exit_listeners: Vec::new(),
            input_handler: None,
        })),
        dirty,
        producer,
        produced,
    };

    instance.dirty.set(true);
    if let Err(err) = instance.render_frame() {
        instance.finish(Err(err.clone()));
        return Err(err);
    }
    Ok(instance)
}

impl Instance {
    // -------------------------------------------------------------------------
    // Frames
    // -------------------------------------------------------------------------

    /// Re-run the producer if needed, then draw.
    fn render_frame(&self) -> Result<(), RenderError> {
        let root = {
            let mut inner = self.inner.borrow_mut();
            inner.throttle.rendered(Instant::now());
            if self.dirty.replace(false) || inner.tree.is_none() {
                inner.root
            } else {
                None
            }
        };

        // The producer runs without the instance borrowed.
        if let Some(root) = root {
            root.run();
            match self.produced.borrow_mut().take() {
                Some(Ok(tree)) => self.inner.borrow_mut().tree = Some(tree),
                Some(Err(err)) => return Err(err),
                None => {}
            }
        }

        self.inner.borrow_mut().draw()
    }

    /// Render now if a render is pending and the throttle allows it.
    fn render_if_ready(&self) -> Result<(), RenderError> {
        let ready = {
            let mut inner = self.inner.borrow_mut();
            if self.dirty.get() {
                inner.throttle.invalidate();
            }
            inner.exit.is_none() && inner.throttle.ready(Instant::now())
        };
        if ready { self.render_frame() } else { Ok(()) }
    }

    // -------------------------------------------------------------------------
    // Loop
    // -------------------------------------------------------------------------

    /// Run one loop iteration: render if allowed, then wait up to `timeout`
    /// for one input event and handle it.
    ///
    /// Returns `Ok(true)` while mounted, `Ok(false)` after a clean exit and
    /// the failure if the loop ended with one.
    pub fn tick(&self, timeout: Duration) -> Result<bool, RenderError> {
        if let Some(outcome) = self.exit_outcome() {
            return outcome.map(|()| false);
        }

        if let Err(err) = self.render_if_ready() {
            self.finish(Err(err.clone()));
            return Err(err);
        }

        let polled = {
            let mut inner = self.inner.borrow_mut();
            // Don't sleep past a throttled frame.
            let wait = inner
                .throttle
                .wait(Instant::now())
                .map_or(timeout, |until| until.min(timeout));
            inner.input.poll(wait)
        };
        match polled {
            Ok(Some(event)) => self.handle_input(event),
            Ok(None) => {}
            Err(err) => {
                let err = RenderError::from(err);
                self.finish(Err(err.clone()));
                return Err(err);
            }
        }

        if let Err(err) = self.render_if_ready() {
            self.finish(Err(err.clone()));
            return Err(err);
        }

        match self.exit_outcome() {
            Some(outcome) => outcome.map(|()| false),
            None => Ok(true),
        }
    }

    /// Tick until the instance unmounts.
    pub fn wait_until_exit(&self) -> ExitOutcome {
        while self.tick(Duration::from_millis(16))? {}
        Ok(())
    }

    fn handle_input(&self, event: InputEvent) {
        let exit_on_ctrl_c = {
            let mut inner = self.inner.borrow_mut();
            if let InputEvent::Resize(width, height) = event {
                debug!(width, height, "resize");
                inner.caps.width = width.max(1);
                inner.caps.height = height.max(1);
                inner.throttle.invalidate();
            }
            inner.exit_on_ctrl_c
        };

        // Handlers may call back into the instance; nothing is borrowed here.
        let handler = self.inner.borrow_mut().input_handler.take();
        if let Some(mut handler) = handler {
            handler(&event);
            let mut inner = self.inner.borrow_mut();
            if inner.exit.is_none() && inner.input_handler.is_none() {
                inner.input_handler = Some(handler);
            }
        }

        if exit_on_ctrl_c && event.is_ctrl_c() {
            debug!("ctrl+c");
            self.unmount();
        }
    }

    // -------------------------------------------------------------------------
    // Control
    // -------------------------------------------------------------------------

    /// Replace the tree or producer. The change is drawn, throttled and
    /// diffed, on a following tick.
    pub fn rerender(&self, producer: impl IntoProducer) -> Result<(), RenderError> {
        if !self.is_mounted() {
            return Err(RenderError::Unmounted);
        }
        *self.producer.borrow_mut() = producer.into_producer();
        self.dirty.set(true);
        Ok(())
    }

    /// Clear the screen and forget the previous frame; the next frame is a
    /// full redraw.
    pub fn clear(&self) -> Result<(), RenderError> {
        let mut inner = self.inner.borrow_mut();
        if inner.exit.is_some() {
            return Err(RenderError::Unmounted);
        }
        ansi::clear_screen(inner.out.as_mut())?;
        inner.out.flush()?;
        inner.renderer.forget_screen();
        inner.throttle.invalidate();
        Ok(())
    }

    /// Stop the loop and restore the terminal. Idempotent: only the first
    /// call resolves the exit outcome.
    pub fn unmount(&self) {
        self.finish(Ok(()));
    }

    fn finish(&self, outcome: ExitOutcome) {
        let root = {
            let mut inner = self.inner.borrow_mut();
            if inner.exit.is_some() {
                return;
            }
            inner.throttle.cancel();
            inner.input_handler = None;
            inner.root.take()
        };
        // Disposal runs producer cleanups; keep the instance unborrowed.
        if let Some(root) = root {
            root.dispose();
        }
        self.produced.borrow_mut().take();

        let (outcome, listeners) = {
            let mut inner = self.inner.borrow_mut();
            let Inner { setup, out, .. } = &mut *inner;
            let restored = setup.restore(out.as_mut());
            let outcome = match (outcome, restored) {
                (Ok(()), Err(err)) => Err(RenderError::from(err)),
                (outcome, _) => outcome,
            };
            match &outcome {
                Ok(()) => debug!(frames = inner.frames, "unmounted"),
                Err(err) => warn!(%err, "unmounted with error"),
            }
            inner.exit = Some(outcome.clone());
            (outcome, std::mem::take(&mut inner.exit_listeners))
        };
        for listener in listeners {
            listener(&outcome);
        }
    }

    /// Call `listener` once with the exit outcome. Runs immediately when
    /// already unmounted.
    pub fn on_exit(&self, listener: impl FnOnce(&ExitOutcome) + 'static) {
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            match &inner.exit {
                Some(outcome) => outcome.clone(),
                None => {
                    inner.exit_listeners.push(Box::new(listener));
                    return;
                }
            }
        };
        listener(&outcome);
    }

    /// Receive every input event before the loop acts on it.
    pub fn set_input_handler(&self, handler: impl FnMut(&InputEvent) + 'static) {
        let mut inner = self.inner.borrow_mut();
        if inner.exit.is_none() {
            inner.input_handler = Some(Box::new(handler));
        }
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().exit.is_none()
    }

    pub fn exit_outcome(&self) -> Option<ExitOutcome> {
        self.inner.borrow().exit.clone()
    }

    /// Frames drawn so far, including ones that wrote nothing.
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frames
    }

    pub fn caps(&self) -> TerminalCaps {
        self.inner.borrow().caps
    }

    /// The live frame as last drawn.
    pub fn last_frame(&self) -> Option<FrameBuffer> {
        self.inner.borrow().renderer.previous().cloned()
    }
}

impl Inner {
    /// Flush new static items, then lay out, paint and write the live frame.
    fn draw(&mut self) -> Result<(), RenderError> {
        let Some(tree) = self.tree.as_ref() else {
            return Ok(());
        };
        let caps = self.caps;
        self.renderer.set_viewport_height(caps.height);

        let pending = self.ledger.take_new(tree);
        if !pending.is_empty() {
            let rows = render_static(&pending, caps.width, caps.height, caps.unicode, caps.color_mode)?;
            self.renderer.erase(self.out.as_mut())?;
            self.out.write_all(&rows)?;
            self.out.flush()?;
            debug!(items = pending.iter().map(|p| p.count).sum::<usize>(), "static flushed");
        }

        let layout = compute_layout(tree, caps.width, caps.height)?;
        let frame = paint(
            tree,
            &layout,
            &PaintOptions {
                unicode: caps.unicode,
                width: Some(caps.width),
            },
        );
        let (width, height) = (frame.width(), frame.height());
        let written = if self.debug {
            self.renderer.render_full(frame, self.out.as_mut())?
        } else {
            self.renderer.render(frame, self.out.as_mut())?
        };
        self.frames += 1;
        debug!(frame = self.frames, width, height, written, "frame");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ScriptedInput, SharedBuffer};
    use crate::primitives::text;
    use crate::reactive::Signal;

    fn options(out: &SharedBuffer) -> RenderOptions {
        RenderOptions::default()
            .with_stdout(out.clone())
            .with_stdin(ScriptedInput::default())
            .with_max_fps(None)
            .with_caps(TerminalCaps {
                width: 20,
                height: 5,
                ..TerminalCaps::default()
            })
    }

    #[test]
    fn test_first_frame_is_synchronous() {
        let out = SharedBuffer::new();
        let app = render(Node::from("hello"), options(&out)).unwrap();
        assert_eq!(app.frame_count(), 1);
        assert!(out.contents().contains("hello"));
        // Cursor hidden at mount.
        assert!(out.contents().starts_with("\x1b[?25l"));
        app.unmount();
    }

    #[test]
    fn test_signal_change_renders_on_tick() {
        let out = SharedBuffer::new();
        let count = Signal::new(1);
        let shown = count.clone();
        let app = render(move || Node::from(text(format!("n={}", shown.get()))), options(&out)).unwrap();

        count.set(2);
        // Nothing is drawn until the loop ticks.
        assert_eq!(app.frame_count(), 1);
        assert!(app.tick(Duration::ZERO).unwrap());
        assert_eq!(app.frame_count(), 2);
        assert_eq!(app.last_frame().unwrap().row_text(0), "n=2");
        app.unmount();
    }

    #[test]
    fn test_rerender_replaces_producer() {
        let out = SharedBuffer::new();
        let app = render(Node::from("one"), options(&out)).unwrap();
        app.rerender(Node::from("two")).unwrap();
        app.tick(Duration::ZERO).unwrap();
        assert_eq!(app.last_frame().unwrap().row_text(0), "two");
        app.unmount();
        assert!(matches!(app.rerender(Node::from("x")), Err(RenderError::Unmounted)));
    }

    #[test]
    fn test_resize_relayouts() {
        let out = SharedBuffer::new();
        let opts = options(&out).with_stdin(ScriptedInput::new([InputEvent::Resize(8, 5)]));
        let app = render(Node::from("hello world"), opts).unwrap();
        app.tick(Duration::ZERO).unwrap();
        assert_eq!(app.caps().width, 8);
        let frame = app.last_frame().unwrap();
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.row_text(1), "world");
        app.unmount();
    }

    #[test]
    fn test_ctrl_c_unmounts() {
        let out = SharedBuffer::new();
        let opts = options(&out).with_stdin(ScriptedInput::new([InputEvent::ctrl_c()]));
        let app = render(Node::from("x"), opts).unwrap();
        assert!(app.wait_until_exit().is_ok());
        assert!(!app.is_mounted());
        assert!(out.contents().ends_with("\x1b[0m\x1b[?25h"));
    }

    #[test]
    fn test_producer_panic_surfaces_on_tick() {
        let out = SharedBuffer::new();
        let fail = Signal::new(false);
        let reader = fail.clone();
        let app = render(
            move || {
                if reader.get() {
                    panic!("producer exploded");
                }
                Node::from("ok")
            },
            options(&out),
        )
        .unwrap();

        fail.set(true);
        let err = app.tick(Duration::ZERO).unwrap_err();
        assert!(matches!(err, RenderError::Producer(ref m) if m == "producer exploded"));
        assert!(!app.is_mounted());
        assert!(app.tick(Duration::ZERO).is_err());
    }

    #[test]
    fn test_input_handler_sees_events() {
        let out = SharedBuffer::new();
        let seen = Rc::new(Cell::new(0));
        let opts = options(&out).with_stdin(ScriptedInput::new([
            InputEvent::key(crossterm::event::KeyCode::Enter),
            InputEvent::key(crossterm::event::KeyCode::Esc),
        ]));
        let app = render(Node::from("x"), opts).unwrap();
        let counter = Rc::clone(&seen);
        app.set_input_handler(move |_| counter.set(counter.get() + 1));
        app.tick(Duration::ZERO).unwrap();
        app.tick(Duration::ZERO).unwrap();
        assert_eq!(seen.get(), 2);
        app.unmount();
    }

    #[test]
    fn test_clear_forces_full_redraw() {
        let out = SharedBuffer::new();
        let app = render(Node::from("same"), options(&out)).unwrap();
        out.take();
        app.clear().unwrap();
        app.tick(Duration::ZERO).unwrap();
        let written = out.contents();
        assert!(written.starts_with("\x1b[2J\x1b[H"));
        assert!(written.contains("same"));
        app.unmount();
    }

    #[test]
    fn test_frame_taller_than_terminal_redraws_from_top() {
        let out = SharedBuffer::new();
        let first = Signal::new("top");
        let shown = first.clone();
        let app = render(
            move || {
                let mut lines = vec![shown.get().to_string()];
                lines.extend((1..10).map(|i| format!("line {i}")));
                Node::from(text(lines.join("\n")))
            },
            options(&out),
        )
        .unwrap();
        assert_eq!(app.last_frame().unwrap().height(), 10);

        out.take();
        first.set("TOP");
        app.tick(Duration::ZERO).unwrap();
        let written = out.contents();
        assert!(written.contains("\x1b[2J\x1b[H"));
        assert!(!written.contains("\x1b[10A"));
        assert!(written.contains("TOP"));
        app.unmount();
    }

    #[test]
    fn test_dropping_mounted_instance_restores_terminal() {
        let out = SharedBuffer::new();
        let count = Signal::new(0);
        {
            let shown = count.clone();
            let _app = render(move || Node::from(text(format!("{}", shown.get()))), options(&out)).unwrap();
            assert_eq!(count.subscriber_count(), 1);
        }
        assert!(out.contents().ends_with("\x1b[0m\x1b[?25h"));
        assert_eq!(count.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_after_unmount_writes_nothing() {
        let out = SharedBuffer::new();
        let app = render(Node::from("x"), options(&out)).unwrap();
        app.unmount();
        let len = out.len();
        drop(app);
        assert_eq!(out.len(), len);
    }
}
