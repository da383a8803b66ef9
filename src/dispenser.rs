//! Dispenser de la cafetera. Procesa los pedidos.
use std::{
    sync::{mpsc::Sender, Arc},
    time::Duration,
};

use log::{debug, error, info, warn};

use crate::{
    dispatcher::Pool,
    errors::CoffeeMachineError,
    inventory::Inventory,
    outcome::{BeverageReport, PreparationOutcome},
    preparation::PreparationTask,
};

/// Representa a un dispenser (una salida) de la cafetera.
/// Tiene referencias a la cola de pedidos (junto con sus variables condicionales),
/// al inventario compartido y al canal por el que informa el resultado de cada bebida.
pub struct Dispenser {
    id: usize,
    pool: Arc<Pool>,
    inventory: Arc<Inventory>,
    reports: Sender<BeverageReport>,
}

impl Dispenser {
    pub fn new(
        id: usize,
        pool: Arc<Pool>,
        inventory: Arc<Inventory>,
        reports: Sender<BeverageReport>,
    ) -> Dispenser {
        Dispenser {
            id,
            pool,
            inventory,
            reports,
        }
    }

    pub fn handle_orders(&self) -> Result<(), CoffeeMachineError> {
        loop {
            let task = {
                let mut state = self
                    .pool
                    .tasks_cond
                    .wait_while(self.pool.state.lock()?, |state| {
                        state.backlog.is_empty() && !state.backlog.closed && !state.aborted
                    })?;

                if state.aborted || (state.backlog.is_empty() && state.backlog.closed) {
                    debug!("[DISPENSER {}] No more orders, finishing", self.id);
                    return Ok(());
                }

                let task = state
                    .backlog
                    .pop()
                    .ok_or(CoffeeMachineError::EmptyQueueWhenNotExpected)?;
                state.in_flight += 1;
                task
            };

            debug!("[DISPENSER {}] Takes order {}", self.id, task.beverage_name());
            let outcome = self.process_order(&task);
            match &outcome {
                Ok(outcome) => self.report(&task, outcome.clone()),
                Err(err) => {
                    error!(
                        "[DISPENSER {}] Could not process {}: {}",
                        self.id,
                        task.beverage_name(),
                        err
                    );
                    self.report(&task, PreparationOutcome::Interrupted);
                }
            }
            self.release_outlet(&task, &outcome)?;
            outcome?;
        }
    }

    /// Una vez descontado el inventario la bebida queda preparada: apagar la cafetera
    /// solo acorta la espera del dispenser, no cambia el resultado.
    fn process_order(&self, task: &PreparationTask) -> Result<PreparationOutcome, CoffeeMachineError> {
        let outcome = task.prepare(&self.inventory)?;
        if outcome.is_prepared() {
            match self.dispense(task.preparation_time()) {
                Ok(true) => {}
                Ok(false) => debug!(
                    "[DISPENSER {}] Machine shutting down, {} served early",
                    self.id,
                    task.beverage_name()
                ),
                Err(err) => error!(
                    "[DISPENSER {}] Error while serving {}: {}",
                    self.id,
                    task.beverage_name(),
                    err
                ),
            }
        }
        Ok(outcome)
    }

    /// Sirve la bebida. Devuelve `false` si la cafetera se apago antes de terminar.
    fn dispense(&self, preparation_time: Duration) -> Result<bool, CoffeeMachineError> {
        if preparation_time.is_zero() {
            return Ok(true);
        }
        let (state, _) = self.pool.abort_cond.wait_timeout_while(
            self.pool.state.lock()?,
            preparation_time,
            |state| !state.aborted,
        )?;
        Ok(!state.aborted)
    }

    fn report(&self, task: &PreparationTask, outcome: PreparationOutcome) {
        let report = BeverageReport::new(task.beverage_name(), outcome);
        match report.outcome {
            PreparationOutcome::Prepared => info!("[DISPENSER {}] {}", self.id, report),
            _ => warn!("[DISPENSER {}] {}", self.id, report),
        }
        if self.reports.send(report).is_err() {
            debug!("[DISPENSER {}] Nobody is listening for reports", self.id);
        }
    }

    fn release_outlet(
        &self,
        task: &PreparationTask,
        outcome: &Result<PreparationOutcome, CoffeeMachineError>,
    ) -> Result<(), CoffeeMachineError> {
        let mut state = self.pool.state.lock()?;
        state.in_flight -= 1;
        match outcome {
            Ok(_) => state.completed += 1,
            Err(_) => state.interrupted.push(task.beverage_name().to_string()),
        }
        self.pool.drained_cond.notify_all();
        Ok(())
    }
}
