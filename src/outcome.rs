//! Resultado de cada bebida pedida
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparationOutcome {
    Prepared,
    /// El ingrediente no esta en el inventario o esta en cero
    Unavailable(String),
    /// Hay ingrediente pero no alcanza
    Insufficient(String),
    /// La cola de pedidos estaba llena o la cafetera se estaba apagando
    Rejected,
    /// La cafetera se apago antes de que el pedido terminara
    Interrupted,
}

impl PreparationOutcome {
    pub fn is_prepared(&self) -> bool {
        *self == PreparationOutcome::Prepared
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeverageReport {
    pub beverage: String,
    pub outcome: PreparationOutcome,
}

impl BeverageReport {
    pub fn new(beverage: impl Into<String>, outcome: PreparationOutcome) -> BeverageReport {
        BeverageReport {
            beverage: beverage.into(),
            outcome,
        }
    }
}

impl fmt::Display for BeverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            PreparationOutcome::Prepared => write!(f, "{} is prepared", self.beverage),
            PreparationOutcome::Unavailable(ingredient) => write!(
                f,
                "{} cannot be prepared because {} is not available",
                self.beverage, ingredient
            ),
            PreparationOutcome::Insufficient(ingredient) => write!(
                f,
                "{} cannot be prepared because {} is not sufficient",
                self.beverage, ingredient
            ),
            PreparationOutcome::Rejected => {
                write!(f, "{} has been rejected by the coffee machine", self.beverage)
            }
            PreparationOutcome::Interrupted => {
                write!(f, "{} was interrupted while the machine shut down", self.beverage)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_describe_a_prepared_beverage() {
        let report = BeverageReport::new("hot_tea", PreparationOutcome::Prepared);
        assert_eq!("hot_tea is prepared", report.to_string());
    }

    #[test]
    fn should_name_the_missing_ingredient() {
        let report = BeverageReport::new(
            "green_tea",
            PreparationOutcome::Unavailable("green_mixture".to_string()),
        );
        assert_eq!(
            "green_tea cannot be prepared because green_mixture is not available",
            report.to_string()
        );
    }

    #[test]
    fn should_name_the_insufficient_ingredient() {
        let report = BeverageReport::new(
            "black_tea",
            PreparationOutcome::Insufficient("hot_water".to_string()),
        );
        assert_eq!(
            "black_tea cannot be prepared because hot_water is not sufficient",
            report.to_string()
        );
        assert_eq!(false, report.outcome.is_prepared());
    }
}
