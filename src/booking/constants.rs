use std::time::Duration;

// thirtyfour (selenium) inputs
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 775;

/// Rendered background colour of a genuinely bookable slot button, as Chrome
/// reports #0a308f through getComputedStyle. Compared by exact string
/// equality; overridable via the ACCEPTED_COLOR env var.
pub const DEFAULT_ACCEPTED_COLOR: &str = "rgb(10, 48, 143)";

// Booking window: slots at [10:00, 14:00) qualify, minutes unconstrained.
pub const BOOKING_WINDOW_START_HOUR: u32 = 10;
pub const BOOKING_WINDOW_END_HOUR: u32 = 14;

// HTML element selectors used in automation
pub const USERNAME_INPUT_ID: &str = "username";
pub const PASSWORD_INPUT_ID: &str = "password";
pub const LOGIN_SUBMIT_SELECTOR: &str = "button[type='submit']";
pub const AVAILABLE_SLOT_SELECTOR: &str = "button.tls-time-unit.-available";
pub const CONFIRM_BUTTON_SELECTOR: &str = "button[data-tls-value='confirm']";
pub const PROCEED_BUTTON_SELECTOR: &str = "button.tls-button-primary.-uppercase";

// Scripts evaluated against a single element argument
pub const SCRIPT_BACKGROUND_COLOR: &str =
    "return window.getComputedStyle(arguments[0]).backgroundColor;";
pub const SCRIPT_CLICK: &str = "arguments[0].click();";

// Timing
pub const ELEMENT_WAIT: Duration = Duration::from_secs(10);
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const LOGIN_SETTLE: Duration = Duration::from_secs(5);
pub const SCROLL_SETTLE: Duration = Duration::from_millis(500);
pub const CLICK_SETTLE: Duration = Duration::from_secs(1);
pub const RETRY_INTERVAL: Duration = Duration::from_secs(60);
