//! Feature flags.
//!
//! Flags only gate functionality elsewhere in the application; nothing in
//! this crate acts on them. Flag names match the field names, and the
//! `key` of any error about them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    enable_reservations: bool,
    enable_waitlist: bool,
}

impl Features {
    pub const RESERVATIONS: &'static str = "enable_reservations";
    pub const WAITLIST: &'static str = "enable_waitlist";

    pub fn new(enable_reservations: bool, enable_waitlist: bool) -> Self {
        Self {
            enable_reservations,
            enable_waitlist,
        }
    }

    pub fn enable_reservations(&self) -> bool {
        self.enable_reservations
    }

    pub fn enable_waitlist(&self) -> bool {
        self.enable_waitlist
    }

    /// Look a flag up by its name. `None` for unknown flags.
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, enabled)| enabled)
    }

    /// All flags as `(name, enabled)` pairs, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            (Self::RESERVATIONS, self.enable_reservations),
            (Self::WAITLIST, self.enable_waitlist),
        ]
        .into_iter()
    }
}

impl Default for Features {
    /// Both features ship enabled.
    fn default() -> Self {
        Self::new(true, true)
    }
}
