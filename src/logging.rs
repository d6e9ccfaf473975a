//! Serial console logging for ESP32 targets

/// Route the `log` facade to the serial console
///
/// The level filter comes from `ESP_LOG` at build time.
pub fn init() {
    esp_println::logger::init_logger_from_env();
    log::info!("logger ready");
}
