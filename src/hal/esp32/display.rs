//! SSD1306 OLED dashboard for ESP32.
//!
//! Shows one line per motor with its current RPM estimate. The display is a
//! pure consumer of [`TachoState`] snapshots; it owns no estimator state.
//!
//! # Wiring
//!
//! - SDA → GPIO21
//! - SCL → GPIO22
//! - VCC → 3.3V
//! - GND → GND

use crate::tachometer::TachoState;
use crate::traits::TachoDisplay;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::Text,
};
use esp_idf_hal::i2c::I2cDriver;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

/// SSD1306 display type alias for cleaner code.
type DisplayDriver<'d> = Ssd1306<
    I2CInterface<I2cDriver<'d>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// SSD1306 OLED dashboard for ESP32.
///
/// Uses I2C on GPIO21 (SDA) and GPIO22 (SCL) to drive a 128x64 OLED.
///
/// # Display Layout
///
/// ```text
/// ┌────────────────────────────┐
/// │  Motor 1: 600 RPM          │
/// │  Motor 2: 0 RPM            │
/// │                            │
/// └────────────────────────────┘
/// ```
pub struct Esp32Display<'d> {
    display: DisplayDriver<'d>,
}

impl<'d> Esp32Display<'d> {
    /// Creates a new display instance.
    ///
    /// # Arguments
    ///
    /// * `i2c` - I2C driver configured for GPIO21/22
    pub fn new(i2c: I2cDriver<'d>) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Ok(Self { display })
    }
}

impl TachoDisplay for Esp32Display<'_> {
    type Error = DisplayError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.display.init()?;
        self.clear()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;
        self.display.flush()?;
        Ok(())
    }

    fn render(&mut self, state: &TachoState) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;

        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        // One line per motor, 14px apart starting below the top margin.
        let mut y = 14;
        for motor in &state.motors {
            let mut line_buf = [0u8; 24];
            let line = format_motor_line(&mut line_buf, motor.id, motor.rpm);
            Text::new(line, Point::new(4, y), text_style).draw(&mut self.display)?;
            y += 14;
        }

        self.display.flush()?;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;

        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        // Center the text vertically
        Text::new(line1, Point::new(4, 24), text_style).draw(&mut self.display)?;

        if let Some(l2) = line2 {
            Text::new(l2, Point::new(4, 40), text_style).draw(&mut self.display)?;
        }

        self.display.flush()?;
        Ok(())
    }
}

/// Formats "Motor N: X RPM" into a buffer without heap allocation.
///
/// Returns a string slice into the buffer.
fn format_motor_line(buf: &mut [u8; 24], id: u8, rpm: u32) -> &str {
    let prefix = b"Motor ";
    buf[..6].copy_from_slice(prefix);

    let mut idx = 6;
    idx += write_u32(&mut buf[idx..], u32::from(id));

    buf[idx] = b':';
    buf[idx + 1] = b' ';
    idx += 2;

    idx += write_u32(&mut buf[idx..], rpm);

    let suffix = b" RPM";
    buf[idx..idx + 4].copy_from_slice(suffix);
    idx += 4;

    // Safety: we only wrote ASCII bytes
    core::str::from_utf8(&buf[..idx]).unwrap_or("Motor ?")
}

/// Writes a decimal number into the buffer, returning the digit count.
fn write_u32(buf: &mut [u8], value: u32) -> usize {
    let mut digits = [0u8; 10];
    let mut n = value;
    let mut count = 0;
    loop {
        digits[count] = b'0' + (n % 10) as u8;
        n /= 10;
        count += 1;
        if n == 0 {
            break;
        }
    }
    for i in 0..count {
        buf[i] = digits[count - 1 - i];
    }
    count
}

/// Display error type.
#[derive(Debug)]
pub struct DisplayError;

impl From<display_interface::DisplayError> for DisplayError {
    fn from(_: display_interface::DisplayError) -> Self {
        DisplayError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_line_formatting() {
        let mut buf = [0u8; 24];
        assert_eq!(format_motor_line(&mut buf, 1, 600), "Motor 1: 600 RPM");

        let mut buf = [0u8; 24];
        assert_eq!(format_motor_line(&mut buf, 2, 0), "Motor 2: 0 RPM");

        let mut buf = [0u8; 24];
        assert_eq!(format_motor_line(&mut buf, 12, 65535), "Motor 12: 65535 RPM");
    }
}
