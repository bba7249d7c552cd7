//! GPIO any-edge interrupt source for a motor feedback line.
//!
//! Registers directly with the ESP-IDF GPIO ISR service so that each
//! feedback pin carries its own handler and context pointer - two motors
//! mean two fully independent registrations, no shared dispatch slot.
//!
//! # Wiring
//!
//! The Hall/encoder wave line connects straight to the feedback GPIO with
//! the internal pull-down enabled (the line idles low between pulses).

use core::ffi::c_void;

use crate::traits::PulseInput;
use esp_idf_hal::sys::{
    esp, gpio_config, gpio_config_t, gpio_install_isr_service, gpio_int_type_t_GPIO_INTR_ANYEDGE,
    gpio_isr_handler_add, gpio_mode_t_GPIO_MODE_INPUT, gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
    gpio_pullup_t_GPIO_PULLUP_DISABLE, EspError, ESP_ERR_INVALID_STATE,
};

/// Any-edge interrupt source on one feedback GPIO.
///
/// Construction configures the pin (input, pull-down, any-edge interrupts)
/// and makes sure the shared GPIO ISR service is installed. Attaching hands
/// the channel's edge closure to the ISR service together with a per-pin
/// context pointer.
///
/// The attached handler lives for the process lifetime - feedback capture
/// runs forever, so there is no detach path.
///
/// # Example
///
/// ```ignore
/// use rs_tacho::hal::esp32::{pins, Esp32PulseInput};
///
/// let mut pulse = Esp32PulseInput::new(pins::FEEDBACK1)?;
/// channel.begin(clock, &mut pulse, &mut ticker)?;
/// ```
pub struct Esp32PulseInput {
    pin: i32,
}

impl Esp32PulseInput {
    /// Configures the given GPIO for any-edge feedback capture.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO configuration fails.
    pub fn new(pin: i32) -> Result<Self, EspError> {
        let config = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };
        esp!(unsafe { gpio_config(&config) })?;

        // The ISR service is shared by all pins; the first channel installs
        // it and later channels see ESP_ERR_INVALID_STATE, which is fine.
        let installed = unsafe { gpio_install_isr_service(0) };
        if installed != ESP_ERR_INVALID_STATE as i32 {
            esp!(installed)?;
        }

        Ok(Self { pin })
    }

    /// The configured GPIO number.
    #[inline]
    pub fn pin(&self) -> i32 {
        self.pin
    }
}

impl PulseInput for Esp32PulseInput {
    type Error = EspError;

    fn attach(&mut self, on_edge: impl FnMut() + Send + 'static) -> Result<(), EspError> {
        // The handler is leaked intentionally: the ISR service keeps the raw
        // context pointer for the rest of the process lifetime.
        let handler: Box<Box<dyn FnMut() + Send>> = Box::new(Box::new(on_edge));
        let context = Box::into_raw(handler) as *mut c_void;

        esp!(unsafe { gpio_isr_handler_add(self.pin, Some(edge_trampoline), context) })
    }
}

/// ISR trampoline: recovers the per-pin closure from the context pointer.
///
/// Runs in interrupt context; the closure it calls is the channel's edge
/// entry point, which is bounded and allocation-free.
unsafe extern "C" fn edge_trampoline(context: *mut c_void) {
    let handler = &mut *(context as *mut Box<dyn FnMut() + Send>);
    handler();
}
