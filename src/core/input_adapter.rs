use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// Discrete interaction edge delivered to the autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Start,
    End,
}

/// Adapter that turns Winit pointer events into interaction start/end edges
///
/// Any number of held mouse buttons and touches form one interaction: it
/// starts with the first press and ends with the last release. Cursor motion
/// is deliberately ignored.
#[derive(Debug, Clone, Default)]
pub struct InteractionTracker {
    /// Mouse buttons currently held
    buttons: HashSet<MouseButton>,
    /// Active touch ids
    touches: HashSet<u64>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any button or touch is held
    pub fn is_active(&self) -> bool {
        !self.buttons.is_empty() || !self.touches.is_empty()
    }

    /// Process a Winit WindowEvent and return the edges it produced
    pub fn process_event(&mut self, event: &WindowEvent) -> Vec<Interaction> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press(*button).into_iter().collect(),
                ElementState::Released => self.release(*button).into_iter().collect(),
            },
            WindowEvent::Touch(touch) => match touch.phase {
                TouchPhase::Started => self.touch_start(touch.id).into_iter().collect(),
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    self.touch_end(touch.id).into_iter().collect()
                }
                TouchPhase::Moved => Vec::new(),
            },
            WindowEvent::MouseWheel { .. } => self.scroll(),
            WindowEvent::Focused(false) => self.cancel().into_iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn press(&mut self, button: MouseButton) -> Option<Interaction> {
        let was_active = self.is_active();
        self.buttons.insert(button);
        (!was_active).then_some(Interaction::Start)
    }

    pub fn release(&mut self, button: MouseButton) -> Option<Interaction> {
        let removed = self.buttons.remove(&button);
        (removed && !self.is_active()).then_some(Interaction::End)
    }

    pub fn touch_start(&mut self, id: u64) -> Option<Interaction> {
        let was_active = self.is_active();
        self.touches.insert(id);
        (!was_active).then_some(Interaction::Start)
    }

    pub fn touch_end(&mut self, id: u64) -> Option<Interaction> {
        let removed = self.touches.remove(&id);
        (removed && !self.is_active()).then_some(Interaction::End)
    }

    /// A wheel step is a complete interaction on its own unless one is already running
    pub fn scroll(&mut self) -> Vec<Interaction> {
        if self.is_active() {
            Vec::new()
        } else {
            vec![Interaction::Start, Interaction::End]
        }
    }

    /// Drop all held input, e.g. when the window loses focus mid-drag
    pub fn cancel(&mut self) -> Option<Interaction> {
        let was_active = self.is_active();
        self.buttons.clear();
        self.touches.clear();
        was_active.then_some(Interaction::End)
    }
}
