//! Representacion de la cola de pedidos aceptados
use std::collections::VecDeque;

use crate::preparation::PreparationTask;

/// Cola acotada de pedidos que esperan un dispenser libre. Se le agrega el campo `closed`
/// para indicar que no se van a estar aceptando más pedidos.
pub struct Backlog {
    tasks: VecDeque<PreparationTask>,
    capacity: usize,
    pub closed: bool,
}

impl Backlog {
    pub fn new(capacity: usize) -> Backlog {
        Backlog {
            tasks: VecDeque::new(),
            capacity,
            closed: false,
        }
    }

    /// Encola el pedido si hay lugar. Si la cola esta llena o cerrada devuelve el pedido.
    pub fn try_push(&mut self, task: PreparationTask) -> Result<(), PreparationTask> {
        if self.closed || self.is_full() {
            return Err(task);
        }
        self.tasks.push_back(task);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<PreparationTask> {
        self.tasks.pop_front()
    }

    /// Saca todos los pedidos que nunca llegaron a un dispenser
    pub fn drain(&mut self) -> Vec<PreparationTask> {
        self.tasks.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
