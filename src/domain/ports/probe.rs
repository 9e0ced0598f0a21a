//! Application probe port - "does the app answer?"

use std::time::Duration;

/// One health probe against the running application
pub trait AppProbe {
    /// `true` when the app answered with a successful status within
    /// `within`. Connection errors and timeouts count as "not yet".
    fn responds(&self, within: Duration) -> bool;

    /// Human readable target, for logs
    fn target(&self) -> String;
}

impl<P: AppProbe + ?Sized> AppProbe for &P {
    fn responds(&self, within: Duration) -> bool {
        (**self).responds(within)
    }

    fn target(&self) -> String {
        (**self).target()
    }
}
