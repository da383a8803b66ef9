//! Estadisticas de la cafetera: pedidos procesados y estado de cada contenedor
use std::{
    sync::{Arc, Condvar, Mutex},
    time::Duration,
};

use log::{error, info};

use crate::{dispatcher::Pool, errors::CoffeeMachineError, inventory::Inventory};

pub struct StatisticsPrinter {
    pool: Arc<Pool>,
    inventory: Arc<Inventory>,
    finish: Mutex<bool>,
    finish_cond: Condvar,
}

impl StatisticsPrinter {
    pub fn new(pool: Arc<Pool>, inventory: Arc<Inventory>) -> StatisticsPrinter {
        StatisticsPrinter {
            pool,
            inventory,
            finish: Mutex::new(false),
            finish_cond: Condvar::new(),
        }
    }

    pub fn finish(&self) {
        if let Ok(mut finish) = self.finish.lock() {
            *finish = true;
            self.finish_cond.notify_all();
            return;
        }
        error!("Error setting statistics thread to finish");
    }

    /// Imprime las estadisticas cada `interval` hasta que se llame a `finish`
    pub fn process_statistics(&self, interval: Duration) -> Result<(), CoffeeMachineError> {
        loop {
            let (finish, _) = self
                .finish_cond
                .wait_timeout_while(self.finish.lock()?, interval, |finish| !*finish)?;
            if *finish {
                return Ok(());
            }
            drop(finish);
            self.print_statistics()?;
        }
    }

    pub fn print_statistics(&self) -> Result<(), CoffeeMachineError> {
        info!("{}", self.statistics()?);
        Ok(())
    }

    fn statistics(&self) -> Result<String, CoffeeMachineError> {
        let mut statistics = {
            let state = self.pool.state.lock()?;
            format!(
                "[STATISTICS] Orders processed={} | Queued={} | Ingredient=(remaining, consumed) |",
                state.completed,
                state.backlog.len()
            )
        };
        for (ingredient, container) in self.inventory.snapshot()? {
            statistics.push_str(&format!(
                " {}=({},{}) ",
                ingredient, container.remaining, container.consumed
            ));
        }
        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{beverage::Beverage, dispatcher::Dispatcher, preparation::PreparationTask};
    use std::{sync::mpsc::channel, thread};

    #[test]
    fn should_include_processed_orders_and_containers() {
        let inventory = Arc::new(Inventory::new());
        inventory.add("hot_water", 500).unwrap();
        let (sender, _receiver) = channel();
        let mut dispatcher = Dispatcher::new(1, 10, inventory.clone(), sender).unwrap();
        dispatcher.start().unwrap();
        dispatcher
            .submit(PreparationTask::new(
                Beverage::new("tea", vec![("hot_water".to_string(), 200)]),
                Duration::ZERO,
            ))
            .unwrap();
        dispatcher.shutdown(Duration::from_secs(5)).unwrap();

        let printer = StatisticsPrinter::new(dispatcher.pool(), inventory);
        let statistics = printer.statistics().unwrap();

        assert_eq!(true, statistics.contains("Orders processed=1"));
        assert_eq!(true, statistics.contains("hot_water=(300,200)"));
    }

    #[test]
    fn should_stop_printing_when_finished() {
        let (sender, _receiver) = channel();
        let inventory = Arc::new(Inventory::new());
        let dispatcher = Dispatcher::new(1, 10, inventory.clone(), sender).unwrap();
        let printer = Arc::new(StatisticsPrinter::new(dispatcher.pool(), inventory));

        let printer_clone = printer.clone();
        let handle =
            thread::spawn(move || printer_clone.process_statistics(Duration::from_millis(5)));
        thread::sleep(Duration::from_millis(20));
        printer.finish();

        assert_eq!(true, handle.join().unwrap().is_ok());
    }
}
