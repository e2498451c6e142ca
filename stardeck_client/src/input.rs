//! Input handling.
//!
//! The host samples its keyboard (or whatever drives it) once per frame into
//! a `Buttons` set; the controller only ever sees this value.

bitflags::bitflags! {
    /// Pressed state of the six logical inputs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const ATTACK = 1 << 4;
        /// Debug input that drops the local player into the terminal pose.
        const KNOCKDOWN = 1 << 5;
    }
}
