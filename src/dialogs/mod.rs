pub mod prefs;
pub mod warning;
