pub const APP_NAME: &str = "Slot Cost Calculator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_label() -> String {
    format!("v{APP_VERSION}")
}

/// User agent sent to the routing service.
pub fn user_agent() -> String {
    format!("slot-cost-calculator/{APP_VERSION}")
}
