use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, Timestep, WeatherSample},
};

pub mod tomorrow;

pub use tomorrow::TomorrowProvider;

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// First sample of the `timestep` series at `coordinates`.
    async fn fetch(
        &self,
        coordinates: Coordinates,
        timestep: Timestep,
    ) -> Result<WeatherSample, WeatherError>;
}
