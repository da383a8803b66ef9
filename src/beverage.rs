/// Bebida pedida. Los ingredientes se guardan en el orden en el que vienen en el pedido,
/// que es el orden en el que se verifican contra el inventario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beverage {
    pub name: String,
    pub ingredients: Vec<(String, u64)>,
}

impl Beverage {
    pub fn new(name: impl Into<String>, ingredients: Vec<(String, u64)>) -> Beverage {
        Beverage {
            name: name.into(),
            ingredients,
        }
    }

    pub fn total_units(&self) -> u64 {
        self.ingredients.iter().map(|(_, quantity)| quantity).sum()
    }
}
