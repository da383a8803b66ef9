//! Reparte los pedidos entre un numero fijo de dispensers.
//!
//! Los pedidos aceptados esperan en una cola acotada. Si la cola esta llena el pedido se
//! rechaza en el momento: `submit` nunca bloquea a quien pide.
use std::{
    sync::{mpsc::Sender, Arc, Condvar, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{debug, error, info, warn};

use crate::{
    backlog::Backlog,
    dispenser::Dispenser,
    errors::CoffeeMachineError,
    inventory::Inventory,
    outcome::{BeverageReport, PreparationOutcome},
    preparation::PreparationTask,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Created,
    Running,
    ShuttingDown,
    Stopped,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected(BeverageReport),
}

/// Pedidos que terminaron normalmente y bebidas interrumpidas al apagar
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShutdownSummary {
    pub completed: usize,
    pub interrupted: Vec<String>,
}

pub struct PoolState {
    pub backlog: Backlog,
    pub in_flight: usize,
    pub aborted: bool,
    pub completed: usize,
    pub interrupted: Vec<String>,
}

/// Estado compartido entre el dispatcher y sus dispensers
pub struct Pool {
    pub state: Mutex<PoolState>,
    /// Avisa a los dispensers que hay pedidos nuevos o que la cola se cerro
    pub tasks_cond: Condvar,
    /// Avisa al que apaga la cafetera que un dispenser termino un pedido
    pub drained_cond: Condvar,
    /// Corta a los dispensers que estan sirviendo cuando se fuerza el apagado
    pub abort_cond: Condvar,
}

pub struct Dispatcher {
    outlets: usize,
    state: DispatcherState,
    pool: Arc<Pool>,
    inventory: Arc<Inventory>,
    reports: Sender<BeverageReport>,
    dispensers: Vec<JoinHandle<Result<(), CoffeeMachineError>>>,
}

impl Dispatcher {
    pub fn new(
        outlets: usize,
        backlog_capacity: usize,
        inventory: Arc<Inventory>,
        reports: Sender<BeverageReport>,
    ) -> Result<Dispatcher, CoffeeMachineError> {
        if outlets == 0 {
            return Err(CoffeeMachineError::InvalidConfiguration(
                "the machine needs at least one outlet".to_string(),
            ));
        }
        if backlog_capacity == 0 {
            return Err(CoffeeMachineError::InvalidConfiguration(
                "the backlog capacity must be positive".to_string(),
            ));
        }
        let pool = Pool {
            state: Mutex::new(PoolState {
                backlog: Backlog::new(backlog_capacity),
                in_flight: 0,
                aborted: false,
                completed: 0,
                interrupted: Vec::new(),
            }),
            tasks_cond: Condvar::new(),
            drained_cond: Condvar::new(),
            abort_cond: Condvar::new(),
        };
        Ok(Dispatcher {
            outlets,
            state: DispatcherState::Created,
            pool: Arc::new(pool),
            inventory,
            reports,
            dispensers: Vec::new(),
        })
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn pool(&self) -> Arc<Pool> {
        self.pool.clone()
    }

    pub fn start(&mut self) -> Result<(), CoffeeMachineError> {
        match self.state {
            DispatcherState::Created => {}
            DispatcherState::Running => return Ok(()),
            DispatcherState::ShuttingDown | DispatcherState::Stopped => {
                return Err(CoffeeMachineError::DispatcherNotRunning)
            }
        }

        self.dispensers = (0..self.outlets)
            .map(|id| {
                let dispenser = Dispenser::new(
                    id,
                    self.pool.clone(),
                    self.inventory.clone(),
                    self.reports.clone(),
                );
                thread::spawn(move || dispenser.handle_orders())
            })
            .collect();
        self.state = DispatcherState::Running;
        info!("[DISPATCHER] Started {} dispensers", self.outlets);
        Ok(())
    }

    /// Encola el pedido o lo rechaza en el momento si no hay lugar en la cola.
    pub fn submit(&self, task: PreparationTask) -> Result<Admission, CoffeeMachineError> {
        match self.state {
            DispatcherState::Created => return Err(CoffeeMachineError::DispatcherNotRunning),
            DispatcherState::ShuttingDown | DispatcherState::Stopped => {
                return Ok(reject(task))
            }
            DispatcherState::Running => {}
        }

        let mut state = self.pool.state.lock()?;
        match state.backlog.try_push(task) {
            Ok(()) => {
                self.pool.tasks_cond.notify_one();
                Ok(Admission::Accepted)
            }
            Err(task) => Ok(reject(task)),
        }
    }

    /// Deja de aceptar pedidos y espera a que se terminen los pendientes. Si pasado `grace`
    /// todavia quedan pedidos, se interrumpen: los que estaban en cola no se preparan y los
    /// que se estaban sirviendo terminan antes pero quedan preparados, porque el inventario
    /// ya se desconto. Al volver todos los dispensers terminaron.
    pub fn shutdown(&mut self, grace: Duration) -> Result<ShutdownSummary, CoffeeMachineError> {
        match self.state {
            DispatcherState::Running => {}
            DispatcherState::Created => {
                self.state = DispatcherState::Stopped;
                return Ok(ShutdownSummary::default());
            }
            DispatcherState::ShuttingDown | DispatcherState::Stopped => {
                return Ok(ShutdownSummary::default())
            }
        }
        self.state = DispatcherState::ShuttingDown;
        info!("[DISPATCHER] Shutting down, waiting for pending orders");

        {
            let mut state = self.pool.state.lock()?;
            state.backlog.closed = true;
            self.pool.tasks_cond.notify_all();

            let (mut state, _) = self.pool.drained_cond.wait_timeout_while(
                state,
                grace,
                |state| !state.backlog.is_empty() || state.in_flight > 0,
            )?;

            if !state.backlog.is_empty() || state.in_flight > 0 {
                warn!(
                    "[DISPATCHER] Grace period of {:?} elapsed with {} queued and {} in flight, interrupting",
                    grace,
                    state.backlog.len(),
                    state.in_flight
                );
                state.aborted = true;
                for task in state.backlog.drain() {
                    let report =
                        BeverageReport::new(task.beverage_name(), PreparationOutcome::Interrupted);
                    warn!("[DISPATCHER] {}", report);
                    state.interrupted.push(report.beverage.clone());
                    if self.reports.send(report).is_err() {
                        debug!("[DISPATCHER] Nobody is listening for reports");
                    }
                }
                self.pool.tasks_cond.notify_all();
                self.pool.abort_cond.notify_all();
            }
        }

        let joined = self.join_dispensers();
        self.state = DispatcherState::Stopped;
        joined?;

        let state = self.pool.state.lock()?;
        let summary = ShutdownSummary {
            completed: state.completed,
            interrupted: state.interrupted.clone(),
        };
        info!(
            "[DISPATCHER] Stopped, {} orders completed and {} interrupted",
            summary.completed,
            summary.interrupted.len()
        );
        Ok(summary)
    }

    fn join_dispensers(&mut self) -> Result<(), CoffeeMachineError> {
        let mut result = Ok(());
        for dispenser in self.dispensers.drain(..) {
            let joined = match dispenser.join() {
                Ok(finished) => finished,
                Err(_) => Err(CoffeeMachineError::WorkerPanicked),
            };
            if let Err(err) = joined {
                error!("[DISPATCHER] Dispenser finished with error: {}", err);
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if self.state == DispatcherState::Running {
            if let Err(err) = self.shutdown(Duration::ZERO) {
                error!("[DISPATCHER] Error while shutting down on drop: {}", err);
            }
        }
    }
}

fn reject(task: PreparationTask) -> Admission {
    let report = BeverageReport::new(task.beverage_name(), PreparationOutcome::Rejected);
    warn!("[DISPATCHER] {}", report);
    Admission::Rejected(report)
}
