//! Pedido de una bebida, listo para que lo tome un dispenser
use std::time::Duration;

use crate::{
    beverage::Beverage, errors::CoffeeMachineError, inventory::Inventory,
    outcome::PreparationOutcome,
};

#[derive(Debug, Clone)]
pub struct PreparationTask {
    beverage: Beverage,
    time_per_unit: Duration,
}

impl PreparationTask {
    pub fn new(beverage: Beverage, time_per_unit: Duration) -> PreparationTask {
        PreparationTask {
            beverage,
            time_per_unit,
        }
    }

    pub fn beverage_name(&self) -> &str {
        &self.beverage.name
    }

    /// Tiempo que el dispenser queda ocupado sirviendo la bebida una vez descontado el inventario
    pub fn preparation_time(&self) -> Duration {
        let units = u32::try_from(self.beverage.total_units()).unwrap_or(u32::MAX);
        self.time_per_unit.saturating_mul(units)
    }

    /// Intenta descontar del inventario todos los ingredientes de la bebida.
    /// La atomicidad la garantiza el inventario; el pedido no toma ningun lock.
    pub fn prepare(&self, inventory: &Inventory) -> Result<PreparationOutcome, CoffeeMachineError> {
        inventory.try_reduce(&self.beverage.ingredients)
    }
}
