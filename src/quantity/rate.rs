use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Price of one unit of usage: dollars per kilowatt-hour or per therm.
pub type UnitRate = Quantity<-1, 0, 1>;

impl Display for UnitRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.4}", self.0)
    }
}

impl Debug for UnitRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}$/u", self.0)
    }
}
