//! Display abstraction for the speed dashboard.
//!
//! This module defines the [`TachoDisplay`] trait for rendering the current
//! motor speeds to various display devices (OLED, LCD, etc.).

use crate::tachometer::TachoState;

/// Display trait for rendering motor speeds.
///
/// Implementors provide hardware-specific rendering for displays like the
/// SSD1306 OLED, character LCDs, or simulated displays for testing. The
/// display is a pure consumer: it polls a [`TachoState`] snapshot and never
/// feeds anything back into the estimator.
///
/// # Example
///
/// ```ignore
/// use rs_tacho::traits::TachoDisplay;
/// use rs_tacho::TachoState;
///
/// struct MyDisplay { /* ... */ }
///
/// impl TachoDisplay for MyDisplay {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn render(&mut self, state: &TachoState) -> Result<(), ()> {
///         // One "Motor N: X RPM" line per channel.
///         Ok(())
///     }
///     fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait TachoDisplay {
    /// Error type for display operations.
    type Error;

    /// Initializes the display hardware.
    ///
    /// Called once at startup. Implementations should:
    /// - Configure display controller
    /// - Clear the screen
    /// - Set up any required modes
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears the display.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Renders the current motor speeds.
    ///
    /// This is the main rendering method, called each polling cycle.
    /// Implementations should display one line per registered motor.
    fn render(&mut self, state: &TachoState) -> Result<(), Self::Error>;

    /// Shows a simple message (e.g., for startup or errors).
    ///
    /// # Arguments
    ///
    /// * `line1` - First line of text
    /// * `line2` - Optional second line of text
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;
}
