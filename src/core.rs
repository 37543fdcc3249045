pub mod hours;
pub mod month;
pub mod reading;
pub mod series;

pub use self::{
    hours::HourRange,
    month::{MonthKey, Season},
    reading::Reading,
};
