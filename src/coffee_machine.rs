//! Cafetera con varias salidas: llena el inventario, reparte los pedidos entre los
//! dispensers, espera a que terminen y vacia el inventario.
use std::{
    sync::{
        mpsc::{channel, Receiver},
        Arc,
    },
    thread::{self, JoinHandle},
};

use log::{error, info};

use crate::{
    dispatcher::{Admission, Dispatcher},
    errors::CoffeeMachineError,
    inventory::Inventory,
    machine_reader::{MachineConfig, MachineSettings, OrderBatch},
    outcome::{BeverageReport, PreparationOutcome},
    preparation::PreparationTask,
    statistics::StatisticsPrinter,
};

/// Resultado de servir un lote de pedidos
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub reports: Vec<BeverageReport>,
    pub submitted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub prepared: usize,
    pub unavailable: usize,
    pub insufficient: usize,
    pub interrupted: usize,
}

impl BatchSummary {
    fn new(reports: Vec<BeverageReport>, submitted: usize, accepted: usize) -> BatchSummary {
        let mut summary = BatchSummary {
            submitted,
            accepted,
            ..BatchSummary::default()
        };
        for report in &reports {
            match report.outcome {
                PreparationOutcome::Prepared => summary.prepared += 1,
                PreparationOutcome::Unavailable(_) => summary.unavailable += 1,
                PreparationOutcome::Insufficient(_) => summary.insufficient += 1,
                PreparationOutcome::Rejected => summary.rejected += 1,
                PreparationOutcome::Interrupted => summary.interrupted += 1,
            }
        }
        summary.reports = reports;
        summary
    }

    pub fn outcome_of(&self, beverage: &str) -> Option<&PreparationOutcome> {
        self.reports
            .iter()
            .find(|report| report.beverage == beverage)
            .map(|report| &report.outcome)
    }
}

pub struct CoffeeMachine {
    inventory: Arc<Inventory>,
    dispatcher: Dispatcher,
    settings: MachineSettings,
    reports: Receiver<BeverageReport>,
    rejected: Vec<BeverageReport>,
    submitted: usize,
    accepted: usize,
    statistics: Arc<StatisticsPrinter>,
    statistics_thread: Option<JoinHandle<Result<(), CoffeeMachineError>>>,
}

impl CoffeeMachine {
    pub fn new(outlets: usize, settings: MachineSettings) -> Result<CoffeeMachine, CoffeeMachineError> {
        let inventory = Arc::new(Inventory::new());
        let (sender, reports) = channel();
        let mut dispatcher =
            Dispatcher::new(outlets, settings.backlog_capacity, inventory.clone(), sender)?;
        dispatcher.start()?;
        let statistics = Arc::new(StatisticsPrinter::new(dispatcher.pool(), inventory.clone()));
        info!("[MACHINE] New machine with {} outlets", outlets);

        Ok(CoffeeMachine {
            inventory,
            dispatcher,
            settings,
            reports,
            rejected: Vec::new(),
            submitted: 0,
            accepted: 0,
            statistics,
            statistics_thread: None,
        })
    }

    /// Llena la cafetera, sirve todo el lote, la apaga y vacia el inventario
    pub fn run(config: &MachineConfig, batch: OrderBatch) -> Result<BatchSummary, CoffeeMachineError> {
        let mut coffee_machine = CoffeeMachine::new(config.outlets, config.settings.clone())?;
        coffee_machine.fill_inventory(&config.ingredients)?;
        coffee_machine.serve_orders(batch)?;
        let summary = coffee_machine.stop()?;
        coffee_machine.reset()?;
        Ok(summary)
    }

    pub fn inventory(&self) -> Arc<Inventory> {
        self.inventory.clone()
    }

    pub fn fill_inventory(&self, ingredients: &[(String, u64)]) -> Result<(), CoffeeMachineError> {
        for (ingredient, quantity) in ingredients {
            self.inventory.add(ingredient, *quantity)?;
        }
        info!("[MACHINE] Inventory filled with {} ingredients", ingredients.len());
        Ok(())
    }

    /// Manda todas las bebidas a los dispensers sin esperar a que terminen
    pub fn serve_orders(&mut self, batch: OrderBatch) -> Result<(), CoffeeMachineError> {
        self.start_statistics();
        for beverage in batch {
            let task = PreparationTask::new(beverage, self.settings.preparation_time_per_unit());
            self.submitted += 1;
            match self.dispatcher.submit(task)? {
                Admission::Accepted => self.accepted += 1,
                Admission::Rejected(report) => self.rejected.push(report),
            }
        }
        info!(
            "[MACHINE] {} orders accepted, {} rejected",
            self.accepted,
            self.rejected.len()
        );
        Ok(())
    }

    /// Apaga los dispensers y junta el resultado de todas las bebidas pedidas
    pub fn stop(&mut self) -> Result<BatchSummary, CoffeeMachineError> {
        let shutdown = self.dispatcher.shutdown(self.settings.shutdown_grace());
        self.stop_statistics();
        shutdown?;
        self.statistics.print_statistics()?;

        let mut reports: Vec<BeverageReport> = self.rejected.drain(..).collect();
        reports.extend(self.reports.try_iter());
        let summary = BatchSummary::new(reports, self.submitted, self.accepted);
        info!(
            "[MACHINE] Batch finished: {} prepared, {} unavailable, {} insufficient, {} rejected, {} interrupted",
            summary.prepared,
            summary.unavailable,
            summary.insufficient,
            summary.rejected,
            summary.interrupted
        );
        Ok(summary)
    }

    /// Vacia el inventario. Falla si todavia hay pedidos en cola o preparandose.
    pub fn reset(&self) -> Result<(), CoffeeMachineError> {
        let pending = {
            let pool = self.dispatcher.pool();
            let state = pool.state.lock()?;
            state.in_flight + state.backlog.len()
        };
        if pending > 0 {
            return Err(CoffeeMachineError::TasksInFlight(pending));
        }
        info!("[MACHINE] Resetting");
        self.inventory.reset()
    }

    fn start_statistics(&mut self) {
        if self.statistics_thread.is_some() {
            return;
        }
        if let Some(interval) = self.settings.statistics_interval() {
            let statistics = self.statistics.clone();
            self.statistics_thread = Some(thread::spawn(move || statistics.process_statistics(interval)));
        }
    }

    fn stop_statistics(&mut self) {
        self.statistics.finish();
        if let Some(handle) = self.statistics_thread.take() {
            match handle.join() {
                Ok(Err(err)) => error!("[STATISTICS] Finished with error: {}", err),
                Err(_) => error!("[STATISTICS] Statistics thread panicked"),
                Ok(Ok(())) => {}
            }
        }
    }
}

impl Drop for CoffeeMachine {
    fn drop(&mut self) {
        self.stop_statistics();
    }
}
