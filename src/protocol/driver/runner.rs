//! Async runner standing in for the cooperative scheduler on executors
//! such as embassy or tokio.
use core::ops::ControlFlow;

use crate::protocol::driver::{LinkStatus, UbxDriver};
use crate::protocol::navigation::NavSolution;
use crate::protocol::transport::traits::driver_timer::DriverTimer;
use crate::protocol::transport::traits::serial_port::SerialPort;
use crate::protocol::transport::traits::ubx_clock::UbxClock;

impl<S: SerialPort, C: UbxClock> UbxDriver<S, C> {
    /// Poll every `period_ms` until `observer` breaks.
    ///
    /// `observer` sees the status of each tick and the solution published
    /// during that tick, if any. Returns the status of the last tick.
    pub async fn drive<T, F>(&mut self, timer: &mut T, period_ms: u32, mut observer: F) -> LinkStatus
    where
        T: DriverTimer,
        F: FnMut(LinkStatus, Option<&NavSolution>) -> ControlFlow<()>,
    {
        loop {
            let epochs = self.stats().epochs;
            let status = self.poll();
            let fresh = if self.stats().epochs != epochs {
                self.solution()
            } else {
                None
            };

            if observer(status, fresh).is_break() {
                return status;
            }
            timer.delay_ms(period_ms).await;
        }
    }
}
