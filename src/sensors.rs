//! Sensor seams
//!
//! The hardware drivers are external collaborators; the cycle only needs
//! opaque read sources returning numeric values. Driver construction is
//! the one place allowed to fail, and that failure is fatal at startup.

use async_trait::async_trait;

/// Combined temperature/humidity sensor (SHT3x class)
#[async_trait]
pub trait Hygrometer: Send {
    /// Take one sample, returning degrees Celsius and relative humidity
    async fn sample(&mut self) -> (f32, f32);
}

/// Barometric pressure sensor (LPS2x class)
#[async_trait]
pub trait Barometer: Send {
    /// Take one sample, returning raw Pascals
    async fn sample_pa(&mut self) -> f32;
}

/// Bench hygrometer reporting fixed values
#[derive(Debug)]
pub struct SyntheticHygrometer {
    temperature: f32,
    humidity: f32,
}

impl SyntheticHygrometer {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}

#[async_trait]
impl Hygrometer for SyntheticHygrometer {
    async fn sample(&mut self) -> (f32, f32) {
        (self.temperature, self.humidity)
    }
}

/// Bench barometer reporting a fixed raw pressure
#[derive(Debug)]
pub struct SyntheticBarometer {
    pressure_pa: f32,
}

impl SyntheticBarometer {
    pub fn new(pressure_pa: f32) -> Self {
        Self { pressure_pa }
    }
}

#[async_trait]
impl Barometer for SyntheticBarometer {
    async fn sample_pa(&mut self) -> f32 {
        self.pressure_pa
    }
}

/// Test hygrometer that counts how often it was sampled
#[cfg(test)]
pub(crate) struct CountingHygrometer {
    pub(crate) temperature: f32,
    pub(crate) humidity: f32,
    pub(crate) samples: std::sync::Arc<std::sync::atomic::AtomicU32>,
}

#[cfg(test)]
impl CountingHygrometer {
    pub(crate) fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
            samples: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0)),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Hygrometer for CountingHygrometer {
    async fn sample(&mut self) -> (f32, f32) {
        self.samples
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        (self.temperature, self.humidity)
    }
}

/// Test barometer that counts how often it was sampled
#[cfg(test)]
pub(crate) struct CountingBarometer {
    pub(crate) pressure_pa: f32,
    pub(crate) samples: std::sync::Arc<std::sync::atomic::AtomicU32>,
}

#[cfg(test)]
impl CountingBarometer {
    pub(crate) fn new(pressure_pa: f32) -> Self {
        Self {
            pressure_pa,
            samples: std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0)),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Barometer for CountingBarometer {
    async fn sample_pa(&mut self) -> f32 {
        self.samples
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.pressure_pa
    }
}
