use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoffeeMachineError {
    #[error("a lock was poisoned")]
    LockError,
    #[error("could not read the input file: {0}")]
    FileReaderError(#[from] std::io::Error),
    #[error("malformed input: {0}")]
    InvalidInput(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("duplicate entry '{0}'")]
    DuplicateEntry(String),
    #[error("the dispatcher is not running")]
    DispatcherNotRunning,
    #[error("the backlog was empty when a task was expected")]
    EmptyQueueWhenNotExpected,
    #[error("a dispenser thread panicked")]
    WorkerPanicked,
    #[error("{0} tasks are still in flight")]
    TasksInFlight(usize),
}

impl<T> From<std::sync::PoisonError<T>> for CoffeeMachineError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        CoffeeMachineError::LockError
    }
}
