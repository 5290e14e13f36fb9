//! Narrow interfaces to the hardware the controller drives.

use crate::pose::JointVector;

/// Receives resolved poses. Only ever handed vectors that match the active
/// profile's joint count and range.
pub trait ActuatorSink {
    fn apply(&mut self, pose: &JointVector);
}

/// Receives status text for the operator display.
pub trait DisplaySink {
    /// Replaces the whole display with `lines`.
    fn render(&mut self, lines: &[String]);

    /// Announces a mode change to an external observer.
    fn echo(&mut self, _text: &str) {}
}

impl<T: ActuatorSink + ?Sized> ActuatorSink for &mut T {
    fn apply(&mut self, pose: &JointVector) {
        (**self).apply(pose);
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn render(&mut self, lines: &[String]) {
        (**self).render(lines);
    }

    fn echo(&mut self, text: &str) {
        (**self).echo(text);
    }
}
