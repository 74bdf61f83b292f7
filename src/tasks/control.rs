use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant};

use crate::common::{InertialSample, MotorCommand, StickCommand, Update};
use crate::config::TaskConfig;
use crate::error::ConfigError;
use crate::vehicle::radio::throttle_level;
use crate::vehicle::Stabilizer;

/// IMU reading stamped by the sensor side with a monotonic timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuSample {
    pub data: InertialSample,
    pub timestamp: Instant,
}

/// Queues between the control task and its collaborators.
pub struct ControlLinks<'a, M: RawMutex, const N: usize> {
    pub imu: Receiver<'a, M, ImuSample, N>,
    /// Latest stick command from the radio link
    pub sticks: &'a Signal<M, StickCommand>,
    /// Latest motor duties for the actuator driver
    pub motors: &'a Signal<M, MotorCommand>,
}

/// The single context that drives the stabilizer.
///
/// Every IMU sample produces exactly one tick. Stick commands only replace the held command.
/// When the link goes quiet for longer than `link_timeout` the task ticks with a low-throttle,
/// centered command instead, which keeps the motors off until commands resume.
pub struct ControlTask<'a, M: RawMutex, const N: usize> {
    stabilizer: Stabilizer,
    links: ControlLinks<'a, M, N>,
    config: TaskConfig,
    stick: Update<StickCommand>,
    stick_timestamp: Option<Instant>,
    previous_sample: Option<Instant>,
    link_lost: bool,
}

impl<'a, M: RawMutex, const N: usize> ControlTask<'a, M, N> {
    pub fn new(
        stabilizer: Stabilizer,
        links: ControlLinks<'a, M, N>,
        config: TaskConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(ControlTask {
            stabilizer,
            links,
            config,
            stick: Update::Unchanged(StickCommand::default()),
            stick_timestamp: None,
            previous_sample: None,
            link_lost: false,
        })
    }

    /// Wait for the next IMU sample, tick once and publish the result.
    pub async fn step(&mut self) -> MotorCommand {
        enum ControlTaskEvent {
            Stick(StickCommand),
            Imu(ImuSample),
        }

        let sample = loop {
            let event = match select(self.links.sticks.wait(), self.links.imu.receive()).await {
                Either::First(stick) => ControlTaskEvent::Stick(stick),
                Either::Second(sample) => ControlTaskEvent::Imu(sample),
            };
            match event {
                ControlTaskEvent::Stick(stick) => self.stick = Update::Updated(stick),
                ControlTaskEvent::Imu(sample) => break sample,
            }
        };

        let now = sample.timestamp;
        if let Some(stick) = self.stick.updated().copied() {
            self.stick = Update::Unchanged(stick);
            self.stick_timestamp = Some(now);
        }

        let dt = self.dt(now);
        let stick = self.command(now);
        let motors = self.stabilizer.tick(&stick, &sample.data, dt, now);
        self.links.motors.signal(motors);
        motors
    }

    pub async fn run(&mut self) -> ! {
        info!("control task started");
        loop {
            self.step().await;
        }
    }

    fn dt(&mut self, now: Instant) -> f32 {
        let elapsed = match self.previous_sample {
            None => self.config.nominal_period,
            Some(previous) => now
                .checked_duration_since(previous)
                .unwrap_or(Duration::from_ticks(0)),
        };
        self.previous_sample = Some(now);
        elapsed.as_micros() as f32 / 1_000_000.0
    }

    fn command(&mut self, now: Instant) -> StickCommand {
        let timed_out = match self.stick_timestamp {
            None => true,
            Some(received) => now
                .checked_duration_since(received)
                .is_some_and(|age| age > self.config.link_timeout),
        };

        if timed_out && !self.link_lost {
            warn!("stick link timeout, motors off");
        } else if !timed_out && self.link_lost {
            info!("stick link restored");
        }
        self.link_lost = timed_out;

        if timed_out {
            self.failsafe_command()
        } else {
            *self.stick.value()
        }
    }

    fn failsafe_command(&self) -> StickCommand {
        let config = self.stabilizer.config();
        let low = config.sticks.range.saturating_neg();
        StickCommand {
            throttle: throttle_level(low, &config.throttle),
            ..StickCommand::default()
        }
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    pub fn link_lost(&self) -> bool {
        self.link_lost
    }
}
