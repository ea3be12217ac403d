//! Logical buttons

/// Number of physical buttons
pub const BUTTON_COUNT: usize = 5;

/// Logical buttons on the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Toggle camera request
    Camera,
    /// Toggle microphone request
    Microphone,
    /// Send "plus" action
    Plus,
    /// Send "minus" action
    Minus,
    /// Send screenshot action
    Screenshot,
}

impl Button {
    /// All buttons in pin order
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Camera,
        Button::Microphone,
        Button::Plus,
        Button::Minus,
        Button::Screenshot,
    ];

    /// Position of this button in pin order
    pub fn index(self) -> usize {
        match self {
            Button::Camera => 0,
            Button::Microphone => 1,
            Button::Plus => 2,
            Button::Minus => 3,
            Button::Screenshot => 4,
        }
    }
}
