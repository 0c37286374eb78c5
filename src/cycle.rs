//! Cycle controller
//!
//! One cycle per trigger signal: join wifi, read the sensors, encode one
//! reading, transmit it, release the association. Strictly serial; the
//! sensors are only read after a successful join, and the association is
//! always released before the next signal is consumed.

use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::identity;
use crate::indicator::StatusIndicator;
use crate::reading::Reading;
use crate::sensors::{Barometer, Hygrometer};
use crate::session::{NetworkSession, SessionError};
use crate::transport::CollectorConnector;
use crate::trigger::PeriodicTrigger;
use crate::wifi::WifiInterface;

/// Result of one trigger firing, surfaced via the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Reading delivered to the collector
    Sent,
    /// Wifi association not established within the retry limit
    WifiUnavailable,
    /// Collector unreachable within the connect timeout
    ConnectFailed,
    /// Connected but the reading was not delivered
    TransmitFailed,
}

pub struct CycleController<W, C, I, H, B> {
    config: AgentConfig,
    session: NetworkSession<W, C, I>,
    hygrometer: H,
    barometer: B,
}

impl<W, C, I, H, B> CycleController<W, C, I, H, B>
where
    W: WifiInterface,
    C: CollectorConnector,
    I: StatusIndicator,
    H: Hygrometer,
    B: Barometer,
{
    pub fn new(
        config: AgentConfig,
        session: NetworkSession<W, C, I>,
        hygrometer: H,
        barometer: B,
    ) -> Self {
        Self {
            config,
            session,
            hygrometer,
            barometer,
        }
    }

    /// Consume trigger signals forever, one cycle per signal
    pub async fn run(mut self, mut trigger: PeriodicTrigger) {
        info!(
            location = %self.config.location,
            interval = ?self.config.sample_interval,
            "cycle controller running"
        );
        while trigger.recv().await.is_some() {
            let outcome = self.run_cycle().await;
            info!(?outcome, "cycle complete");
        }
    }

    /// One full sample-connect-transmit-disconnect cycle
    async fn run_cycle(&mut self) -> CycleOutcome {
        if let Err(err) = self.session.join().await {
            // No association, so nothing to release; the indicator keeps
            // showing the join failure until the next cycle.
            warn!(%err, "skipping cycle");
            return CycleOutcome::WifiUnavailable;
        }

        let (temperature, humidity) = self.hygrometer.sample().await;
        let pressure_pa = self.barometer.sample_pa().await;
        let device_id = identity::device_id(self.session.hardware_address());
        let reading = Reading::new(
            self.config.location.clone(),
            device_id,
            temperature,
            humidity,
            pressure_pa,
        );
        debug!(%reading, "sampled");

        let result = self.session.send(&reading.encode()).await;

        // Guaranteed release, whatever the transmit outcome.
        self.session.leave().await;

        match result {
            Ok(()) => CycleOutcome::Sent,
            Err(SessionError::Connect { .. }) => CycleOutcome::ConnectFailed,
            Err(SessionError::Transmit { .. }) => CycleOutcome::TransmitFailed,
            Err(SessionError::Join { .. }) => CycleOutcome::WifiUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::indicator::{RecordingIndicator, StatusColor};
    use crate::sensors::{CountingBarometer, CountingHygrometer};
    use crate::transport::MockCollector;
    use crate::wifi::ScriptedWifi;

    fn test_config() -> AgentConfig {
        AgentConfig {
            location: "2F寝室".into(),
            retry_limit: 3,
            retry_delay: Duration::from_millis(10),
            ..AgentConfig::default()
        }
    }

    fn controller(
        wifi: ScriptedWifi,
        collector: MockCollector,
        indicator: RecordingIndicator,
    ) -> CycleController<
        ScriptedWifi,
        MockCollector,
        RecordingIndicator,
        CountingHygrometer,
        CountingBarometer,
    > {
        let config = test_config();
        let session = NetworkSession::new(config.clone(), wifi, collector, indicator);
        CycleController::new(
            config,
            session,
            CountingHygrometer::new(23.4, 55.1),
            CountingBarometer::new(100_800.0),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn successful_cycle_delivers_one_reading() {
        let collector = MockCollector::new();
        let received = collector.received.clone();
        let (indicator, _history) = RecordingIndicator::new();
        let mut controller = controller(ScriptedWifi::new(1), collector, indicator);

        assert_eq!(controller.run_cycle().await, CycleOutcome::Sent);

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let reading: Reading = serde_json::from_str(&received[0]).unwrap();
        assert_eq!(reading.location, "2F寝室");
        assert_eq!(reading.device_id, "aa:bb:cc:dd:ee:ff");
        assert_eq!(reading.temperature, 23.4);
        assert_eq!(reading.humidity, 55.1);
        assert_eq!(reading.air_pressure, 1008.0);
    }

    #[tokio::test(start_paused = true)]
    async fn join_failure_skips_sensors_and_transmit() {
        let wifi = ScriptedWifi::new(u32::MAX);
        let collector = MockCollector::new();
        let connects = collector.connects.clone();
        let (indicator, history) = RecordingIndicator::new();
        let mut controller = controller(wifi, collector, indicator);
        let samples = controller.hygrometer.samples.clone();

        assert_eq!(controller.run_cycle().await, CycleOutcome::WifiUnavailable);

        assert_eq!(samples.load(Ordering::SeqCst), 0);
        assert_eq!(connects.load(Ordering::SeqCst), 0);
        // The join failure stays visible; no leave() wipes it.
        assert_eq!(history.lock().unwrap().last(), Some(&StatusColor::Red));
    }

    #[tokio::test(start_paused = true)]
    async fn connect_failure_still_releases_the_association() {
        let wifi = ScriptedWifi::new(1);
        let leaves = wifi.leaves.clone();
        let (indicator, history) = RecordingIndicator::new();
        let mut controller = controller(wifi, MockCollector::refusing(), indicator);

        assert_eq!(controller.run_cycle().await, CycleOutcome::ConnectFailed);

        assert_eq!(leaves.load(Ordering::SeqCst), 1);
        assert_eq!(history.lock().unwrap().last(), Some(&StatusColor::Off));
    }

    #[tokio::test(start_paused = true)]
    async fn transmit_failure_still_releases_the_association() {
        let wifi = ScriptedWifi::new(1);
        let leaves = wifi.leaves.clone();
        let (indicator, history) = RecordingIndicator::new();
        let mut controller = controller(wifi, MockCollector::holding_open(), indicator);
        let samples = controller.hygrometer.samples.clone();

        assert_eq!(controller.run_cycle().await, CycleOutcome::TransmitFailed);

        assert_eq!(samples.load(Ordering::SeqCst), 1);
        assert_eq!(leaves.load(Ordering::SeqCst), 1);
        assert_eq!(history.lock().unwrap().last(), Some(&StatusColor::Off));
    }

    #[tokio::test(start_paused = true)]
    async fn sensors_sampled_exactly_once_per_cycle() {
        let (indicator, _history) = RecordingIndicator::new();
        let mut controller = controller(ScriptedWifi::new(1), MockCollector::new(), indicator);
        let hygrometer_samples = controller.hygrometer.samples.clone();
        let barometer_samples = controller.barometer.samples.clone();

        controller.run_cycle().await;
        controller.run_cycle().await;

        assert_eq!(hygrometer_samples.load(Ordering::SeqCst), 2);
        assert_eq!(barometer_samples.load(Ordering::SeqCst), 2);
    }
}
