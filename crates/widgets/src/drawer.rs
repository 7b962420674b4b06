use serde::Serialize;

/// Fullscreen player drawer. Only downward drags move it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DrawerState {
    Closed,
    Open,
    Dragging { start_y: f32, offset: f32 },
}

impl DrawerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Dragging { .. } => "dragging",
        }
    }
}

impl std::fmt::Display for DrawerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drawer {
    state: DrawerState,
    /// Drag distance in pixels past which releasing closes the drawer.
    dismiss_threshold: f32,
}

impl Default for Drawer {
    fn default() -> Self {
        Self::new(150.0)
    }
}

impl Drawer {
    pub fn new(dismiss_threshold: f32) -> Self {
        Self {
            state: DrawerState::Closed,
            dismiss_threshold,
        }
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, DrawerState::Closed)
    }

    /// Current downward translation; zero unless dragging.
    pub fn offset(&self) -> f32 {
        match self.state {
            DrawerState::Dragging { offset, .. } => offset,
            _ => 0.0,
        }
    }

    pub fn open(&mut self) {
        self.state = DrawerState::Open;
    }

    pub fn close(&mut self) {
        self.state = DrawerState::Closed;
    }

    /// Ignored unless the drawer is open.
    pub fn pointer_down(&mut self, y: f32) {
        if self.state == DrawerState::Open {
            self.state = DrawerState::Dragging {
                start_y: y,
                offset: 0.0,
            };
        }
    }

    pub fn pointer_move(&mut self, y: f32) {
        if let DrawerState::Dragging { start_y, .. } = self.state {
            self.state = DrawerState::Dragging {
                start_y,
                offset: (y - start_y).max(0.0),
            };
        }
    }

    /// Finish a drag: far enough closes, otherwise snap back open.
    pub fn pointer_up(&mut self) -> DrawerState {
        if let DrawerState::Dragging { offset, .. } = self.state {
            self.state = if offset > self.dismiss_threshold {
                DrawerState::Closed
            } else {
                DrawerState::Open
            };
        }
        self.state
    }
}
