//! Adapters: concrete implementations at the edge of the hexagon.
//!
//! | Adapter     | Implements / serves   | Connects to             |
//! |-------------|-----------------------|-------------------------|
//! | `http`      | command + telemetry   | ESP-IDF HTTP server     |
//! | `log_sink`  | EventSink             | Serial log output       |
//! | `wifi`      | station bring-up      | ESP-IDF WiFi STA        |

pub mod http;
pub mod log_sink;
pub mod wifi;
