/// Contenedor de un ingrediente. `filled` es todo lo que se cargo en la etapa de llenado,
/// por lo que siempre vale `remaining + consumed == filled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    pub remaining: u64,
    pub consumed: u64,
    pub filled: u64,
}

impl Container {
    pub fn new(initial_capacity: u64) -> Container {
        Container {
            remaining: initial_capacity,
            consumed: 0,
            filled: initial_capacity,
        }
    }

    /// Devuelve `false` sin tocar el contenedor si el total cargado no entra en un `u64`
    pub fn refill(&mut self, quantity: u64) -> bool {
        match self.filled.checked_add(quantity) {
            Some(filled) => {
                self.filled = filled;
                self.remaining += quantity;
                true
            }
            None => false,
        }
    }

    pub fn consume(&mut self, quantity: u64) {
        self.remaining -= quantity;
        self.consumed += quantity;
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_a_full_container() {
        let container = Container::new(500);
        assert_eq!(500, container.remaining);
        assert_eq!(0, container.consumed);
        assert_eq!(false, container.is_empty());
    }

    #[test]
    fn should_keep_track_of_consumed_quantity() {
        let mut container = Container::new(500);
        container.consume(200);
        container.consume(300);
        assert_eq!(0, container.remaining);
        assert_eq!(500, container.consumed);
        assert_eq!(true, container.is_empty());
    }

    #[test]
    fn should_add_refills_to_the_filled_total() {
        let mut container = Container::new(100);
        assert_eq!(true, container.refill(50));
        container.consume(30);
        assert_eq!(120, container.remaining);
        assert_eq!(150, container.filled);
        assert_eq!(container.filled, container.remaining + container.consumed);
    }

    #[test]
    fn should_refuse_a_refill_that_overflows() {
        let mut container = Container::new(u64::MAX - 10);
        assert_eq!(false, container.refill(11));
        assert_eq!(u64::MAX - 10, container.filled);
        assert_eq!(u64::MAX - 10, container.remaining);
    }
}
