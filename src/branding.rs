pub const APP_DISPLAY_NAME: &str = "Squid Dock";
pub const TRIGGER_LABEL: &str = "Apps";
