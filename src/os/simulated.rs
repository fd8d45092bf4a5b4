//! In-memory desktop
//!
//! Behaves like a single-monitor Windows desktop: one work area that can be
//! replaced, plus AppBar strips that are carved out of it. Clones share the
//! same desktop, so a test can hand one clone to a reservation manager and
//! inspect the "OS-visible" state through another.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::error::{ReservationError, ReservationResult};
use crate::core::types::{Edge, WindowHandle, WorkArea};
use crate::os::{AppBarBackend, ApplyOptions, WorkareaBackend};

#[derive(Debug)]
struct DesktopState {
    /// Work area as last written through `apply_work_area`
    base: WorkArea,
    /// Registered AppBars and their committed strip, if any
    appbars: Vec<AppBarEntry>,
    applied: Vec<WorkArea>,
    broadcasts: usize,
    persisted: Option<WorkArea>,
    fail_query: bool,
    fail_apply: bool,
    /// Fail only this 1-based `apply_work_area` call
    fail_apply_call: Option<usize>,
    apply_calls: usize,
}

/// Shared handle to a simulated desktop
#[derive(Debug, Clone)]
pub struct SimulatedDesktop {
    state: Arc<Mutex<DesktopState>>,
}

impl SimulatedDesktop {
    /// Create a desktop whose work area starts at `area`
    pub fn new(area: WorkArea) -> Self {
        Self {
            state: Arc::new(Mutex::new(DesktopState {
                base: area,
                appbars: Vec::new(),
                applied: Vec::new(),
                broadcasts: 0,
                persisted: None,
                fail_query: false,
                fail_apply: false,
                fail_apply_call: None,
                apply_calls: 0,
            })),
        }
    }

    /// 1920x1080 monitor with a 40px taskbar at the bottom
    pub fn full_hd() -> Self {
        Self::new(WorkArea::new(0, 0, 1920, 1040))
    }

    /// Effective work area: the base area minus committed AppBar strips
    pub fn work_area(&self) -> WorkArea {
        let state = self.state.lock();
        effective_area(&state)
    }

    /// Every rectangle written through `apply_work_area`, oldest first
    pub fn applied(&self) -> Vec<WorkArea> {
        self.state.lock().applied.clone()
    }

    /// Number of settings-change broadcasts sent
    pub fn broadcast_count(&self) -> usize {
        self.state.lock().broadcasts
    }

    /// Last rectangle written with the persist flag
    pub fn persisted(&self) -> Option<WorkArea> {
        self.state.lock().persisted
    }

    /// Handles currently registered as AppBars
    pub fn registered_appbars(&self) -> Vec<WindowHandle> {
        self.state.lock().appbars.iter().map(|(hwnd, _, _)| *hwnd).collect()
    }

    pub fn set_fail_query(&self, fail: bool) {
        self.state.lock().fail_query = fail;
    }

    pub fn set_fail_apply(&self, fail: bool) {
        self.state.lock().fail_apply = fail;
    }

    /// Make the `nth` work area write from now on fail, counting from 1
    pub fn fail_nth_apply(&self, nth: usize) {
        let mut state = self.state.lock();
        state.fail_apply_call = Some(state.apply_calls + nth);
    }
}

type AppBarEntry = (WindowHandle, Edge, Option<WorkArea>);

fn effective_area(state: &DesktopState) -> WorkArea {
    carve(state.base, state.appbars.iter())
}

fn carve<'a>(base: WorkArea, appbars: impl Iterator<Item = &'a AppBarEntry>) -> WorkArea {
    let mut area = base;
    for (_, edge, rect) in appbars {
        let Some(rect) = rect else { continue };
        match edge {
            Edge::Left => area.left = area.left.max(rect.right),
            Edge::Right => area.right = area.right.min(rect.left),
            Edge::Top => area.top = area.top.max(rect.bottom),
            Edge::Bottom => area.bottom = area.bottom.min(rect.top),
        }
    }
    area
}

impl WorkareaBackend for SimulatedDesktop {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn query_work_area(&self) -> ReservationResult<WorkArea> {
        let state = self.state.lock();
        if state.fail_query {
            return Err(ReservationError::query("simulated query failure"));
        }
        Ok(effective_area(&state))
    }

    fn apply_work_area(&mut self, area: &WorkArea, options: ApplyOptions) -> ReservationResult<()> {
        let mut state = self.state.lock();
        state.apply_calls += 1;
        if state.fail_apply || state.fail_apply_call == Some(state.apply_calls) {
            return Err(ReservationError::apply("simulated apply failure"));
        }
        if area.is_degenerate() {
            return Err(ReservationError::apply(format!(
                "rejected degenerate work area {area}"
            )));
        }

        state.base = *area;
        state.applied.push(*area);
        if options.persist {
            state.persisted = Some(*area);
        }
        if options.broadcast {
            state.broadcasts += 1;
        }
        Ok(())
    }
}

impl AppBarBackend for SimulatedDesktop {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn screen_area(&self) -> ReservationResult<WorkArea> {
        let state = self.state.lock();
        if state.fail_query {
            return Err(ReservationError::query("simulated query failure"));
        }
        Ok(state.base)
    }

    fn register(&mut self, hwnd: WindowHandle) -> ReservationResult<()> {
        let mut state = self.state.lock();
        if hwnd.is_null() {
            return Err(ReservationError::InvalidWindowHandle {
                reason: "null window handle".to_string(),
            });
        }
        if state.appbars.iter().any(|(existing, _, _)| *existing == hwnd) {
            return Err(ReservationError::apply("window is already an AppBar"));
        }
        // Edge is a placeholder until the first QUERYPOS/SETPOS
        state.appbars.push((hwnd, Edge::Right, None));
        Ok(())
    }

    fn query_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        proposed: WorkArea,
    ) -> ReservationResult<WorkArea> {
        let state = self.state.lock();
        if !state.appbars.iter().any(|(existing, _, _)| *existing == hwnd) {
            return Err(ReservationError::apply("window is not a registered AppBar"));
        }

        // The shell keeps a new bar inside what other bars left over
        let free = carve(
            state.base,
            state.appbars.iter().filter(|(existing, _, _)| *existing != hwnd),
        );
        let mut adjusted = proposed;
        adjusted.top = free.top;
        adjusted.bottom = free.bottom;
        match edge {
            Edge::Right => adjusted.right = adjusted.right.min(free.right),
            Edge::Left => adjusted.left = adjusted.left.max(free.left),
            Edge::Top => adjusted.top = adjusted.top.max(free.top),
            Edge::Bottom => adjusted.bottom = adjusted.bottom.min(free.bottom),
        }
        Ok(adjusted)
    }

    fn set_position(
        &mut self,
        hwnd: WindowHandle,
        edge: Edge,
        rect: WorkArea,
    ) -> ReservationResult<WorkArea> {
        let mut state = self.state.lock();
        if state.fail_apply {
            return Err(ReservationError::apply("simulated apply failure"));
        }
        if rect.is_degenerate() {
            return Err(ReservationError::apply(format!(
                "rejected degenerate AppBar rect {rect}"
            )));
        }
        let entry = state
            .appbars
            .iter_mut()
            .find(|(existing, _, _)| *existing == hwnd)
            .ok_or_else(|| ReservationError::apply("window is not a registered AppBar"))?;
        entry.1 = edge;
        entry.2 = Some(rect);
        state.broadcasts += 1;
        Ok(rect)
    }

    fn remove(&mut self, hwnd: WindowHandle) -> ReservationResult<()> {
        let mut state = self.state.lock();
        let before = state.appbars.len();
        state.appbars.retain(|(existing, _, _)| *existing != hwnd);
        if state.appbars.len() != before {
            state.broadcasts += 1;
        }
        Ok(())
    }
}
