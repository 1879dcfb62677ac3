/// Input event types the engine understands.
/// Coordinates are viewport pixels, Y-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// A key was pressed.
    KeyDown { key_code: u32 },
}

/// A queue of input events.
/// The browser bridge pushes events as they arrive; the runner hands them
/// to the game once per frame and then drains the queue.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Horizontal offsets of every pointer-down, in arrival order.
    pub fn pointer_downs(&self) -> impl Iterator<Item = f32> + '_ {
        self.events.iter().filter_map(|e| match *e {
            InputEvent::PointerDown { x, .. } => Some(x),
            _ => None,
        })
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_take() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 32 });
        assert_eq!(q.len(), 2);
        let taken = std::mem::take(&mut q);
        assert_eq!(taken.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn pointer_downs_filters_other_events() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 1.0, y: 1.0 });
        q.push(InputEvent::PointerDown { x: 120.0, y: 5.0 });
        q.push(InputEvent::PointerUp { x: 120.0, y: 5.0 });
        q.push(InputEvent::PointerDown { x: -3.0, y: 5.0 });
        let xs: Vec<f32> = q.pointer_downs().collect();
        assert_eq!(xs, vec![120.0, -3.0]);
    }
}
