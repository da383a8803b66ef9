//! Inventario compartido por todos los dispensers de la cafetera.
//!
//! Todo el inventario esta protegido por un unico lock: verificar y descontar los
//! ingredientes de una bebida ocurre dentro de la misma seccion critica, asi dos
//! dispensers nunca pueden aprobar la misma cantidad de un ingrediente.
use std::{collections::HashMap, sync::Mutex};

use log::{debug, info, warn};

use crate::{
    constants::LOW_STOCK_PERCENTAGE, container::Container, errors::CoffeeMachineError,
    outcome::PreparationOutcome,
};

#[derive(Debug, Default)]
pub struct Inventory {
    containers: Mutex<HashMap<String, Container>>,
}

impl Inventory {
    pub fn new() -> Inventory {
        Inventory::default()
    }

    /// Devuelve `None` si el ingrediente nunca se cargo, que no es lo mismo que tenerlo en cero.
    pub fn get(&self, ingredient: &str) -> Result<Option<u64>, CoffeeMachineError> {
        let containers = self.containers.lock()?;
        Ok(containers.get(ingredient).map(|container| container.remaining))
    }

    pub fn add(&self, ingredient: &str, quantity: u64) -> Result<(), CoffeeMachineError> {
        let mut containers = self.containers.lock()?;
        match containers.get_mut(ingredient) {
            Some(container) => {
                if !container.refill(quantity) {
                    return Err(CoffeeMachineError::InvalidConfiguration(format!(
                        "the stock of {} does not fit in the container",
                        ingredient
                    )));
                }
            }
            None => {
                containers.insert(ingredient.to_string(), Container::new(quantity));
            }
        }
        debug!("[INVENTORY] Added {} of {}", quantity, ingredient);
        Ok(())
    }

    /// Verifica que alcancen todos los ingredientes y, solo si alcanzan, los descuenta.
    /// Si falla alguno se informa el primero en el orden del pedido y no se toca el inventario.
    pub fn try_reduce(
        &self,
        requirements: &[(String, u64)],
    ) -> Result<PreparationOutcome, CoffeeMachineError> {
        let mut containers = self.containers.lock()?;

        for (ingredient, required) in requirements {
            match containers.get(ingredient) {
                None => return Ok(PreparationOutcome::Unavailable(ingredient.clone())),
                Some(container) if container.is_empty() => {
                    return Ok(PreparationOutcome::Unavailable(ingredient.clone()))
                }
                Some(container) if container.remaining < *required => {
                    return Ok(PreparationOutcome::Insufficient(ingredient.clone()))
                }
                Some(_) => {}
            }
        }

        for (ingredient, required) in requirements {
            if let Some(container) = containers.get_mut(ingredient) {
                let before = container.remaining;
                container.consume(*required);
                match stock_level(container, before) {
                    StockLevel::Empty => {
                        warn!("[INVENTORY] {} is empty. Please refill", ingredient)
                    }
                    StockLevel::Low => info!(
                        "[INVENTORY] {} is running low, {} left",
                        ingredient, container.remaining
                    ),
                    StockLevel::Enough => {}
                }
            }
        }
        Ok(PreparationOutcome::Prepared)
    }

    pub fn reset(&self) -> Result<(), CoffeeMachineError> {
        self.containers.lock()?.clear();
        debug!("[INVENTORY] Cleared");
        Ok(())
    }

    #[cfg(test)]
    pub fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _containers = self.containers.lock();
            panic!("poisoning the inventory");
        }));
    }

    /// Copia del estado de cada contenedor, ordenada por ingrediente
    pub fn snapshot(&self) -> Result<Vec<(String, Container)>, CoffeeMachineError> {
        let containers = self.containers.lock()?;
        let mut snapshot: Vec<(String, Container)> = containers
            .iter()
            .map(|(ingredient, container)| (ingredient.clone(), *container))
            .collect();
        snapshot.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(snapshot)
    }
}

/// Aviso que deja un descuento: `Low` solo la primera vez que se cruza el limite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Empty,
    Low,
    Enough,
}

pub fn stock_level(container: &Container, before: u64) -> StockLevel {
    if container.is_empty() {
        return StockLevel::Empty;
    }
    let limit = u128::from(container.filled) * u128::from(LOW_STOCK_PERCENTAGE) / 100;
    let before = u128::from(before);
    let remaining = u128::from(container.remaining);
    if before >= limit && remaining < limit {
        return StockLevel::Low;
    }
    StockLevel::Enough
}
