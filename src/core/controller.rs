/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    MouseMiddle,
    Escape,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Any of `buttons` is down
    fn any_down(&self, buttons: &[Button]) -> bool {
        buttons.iter().any(|&button| self.is_down(button))
    }
}
