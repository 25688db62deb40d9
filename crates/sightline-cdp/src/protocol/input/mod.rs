//! Input domain types.

use serde::Serialize;

/// Mouse event kind for Input.dispatchMouseEvent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    /// Button pressed.
    MousePressed,
    /// Button released.
    MouseReleased,
    /// Pointer moved.
    MouseMoved,
    /// Wheel scrolled.
    MouseWheel,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// No button.
    #[default]
    None,
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
}

/// Parameters for Input.dispatchMouseEvent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseEventParams {
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: MouseEventType,
    /// X coordinate in CSS pixels relative to the viewport.
    pub x: f64,
    /// Y coordinate in CSS pixels relative to the viewport.
    pub y: f64,
    /// Button associated with the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    /// Number of clicks (2 for double-click).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i64>,
    /// Horizontal scroll delta (wheel events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    /// Vertical scroll delta (wheel events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
    /// Bit field of held modifier keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i64>,
}

impl DispatchMouseEventParams {
    /// A pointer move to (x, y).
    pub fn mouse_move(x: f64, y: f64) -> Self {
        Self {
            event_type: MouseEventType::MouseMoved,
            x,
            y,
            button: None,
            click_count: None,
            delta_x: None,
            delta_y: None,
            modifiers: None,
        }
    }

    /// A button press at (x, y).
    pub fn mouse_down(x: f64, y: f64, button: MouseButton, click_count: i64) -> Self {
        Self {
            event_type: MouseEventType::MousePressed,
            x,
            y,
            button: Some(button),
            click_count: Some(click_count),
            delta_x: None,
            delta_y: None,
            modifiers: None,
        }
    }

    /// A button release at (x, y).
    pub fn mouse_up(x: f64, y: f64, button: MouseButton, click_count: i64) -> Self {
        Self {
            event_type: MouseEventType::MouseReleased,
            x,
            y,
            button: Some(button),
            click_count: Some(click_count),
            delta_x: None,
            delta_y: None,
            modifiers: None,
        }
    }
}

/// Key event kind for Input.dispatchKeyEvent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    /// Key pressed (with text production).
    KeyDown,
    /// Key released.
    KeyUp,
    /// Key pressed (no text production).
    RawKeyDown,
    /// A produced character.
    Char,
}

/// Parameters for Input.dispatchKeyEvent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEventParams {
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: KeyEventType,
    /// DOM key value (e.g. "Enter", "a").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Physical key code (e.g. "KeyA").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Text produced by the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text produced without modifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmodified_text: Option<String>,
    /// Windows virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_virtual_key_code: Option<i64>,
    /// Native virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_virtual_key_code: Option<i64>,
    /// Bit field of held modifier keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<i64>,
}

impl DispatchKeyEventParams {
    /// A bare event of the given kind with all fields unset.
    pub fn of_type(event_type: KeyEventType) -> Self {
        Self {
            event_type,
            key: None,
            code: None,
            text: None,
            unmodified_text: None,
            windows_virtual_key_code: None,
            native_virtual_key_code: None,
            modifiers: None,
        }
    }

    /// A `char` event producing the given text.
    pub fn char_event(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text: Some(text.clone()),
            unmodified_text: Some(text),
            ..Self::of_type(KeyEventType::Char)
        }
    }
}

/// Parameters for Input.insertText.
#[derive(Debug, Clone, Serialize)]
pub struct InsertTextParams {
    /// Text to insert at the cursor.
    pub text: String,
}

#[cfg(test)]
mod tests;
