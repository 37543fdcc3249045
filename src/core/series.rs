use std::{
    array,
    cmp::Ordering,
    iter::Sum,
    ops::{Add, Div},
};

use chrono::Timelike;
use itertools::Itertools;

impl<T> Aggregate for T where T: ?Sized {}

pub trait Aggregate {
    #[must_use]
    fn median<V>(self) -> Option<V>
    where
        Self: Sized + Iterator<Item = V>,
        V: Copy + PartialOrd + Add<Output = V> + Div<f64, Output = V>,
    {
        let mut values = self.collect_vec();
        if values.is_empty() {
            return None;
        }
        values.sort_unstable_by(compare);
        let index = values.len() / 2;
        if values.len() % 2 == 1 {
            Some(values[index])
        } else {
            Some((values[index - 1] + values[index]) / 2.0)
        }
    }

    /// Group the values by hour of day and average them.
    #[must_use]
    fn average_hourly<K, V>(self) -> [Option<V>; 24]
    where
        Self: Sized + Iterator<Item = (K, V)>,
        K: Timelike,
        V: Copy + Sum + Add<V, Output = V> + Div<f64, Output = V>,
    {
        let mut sums: [Option<V>; 24] = [None; 24];
        let mut weights = [0_u32; 24];
        for (timestamp, value) in self {
            let hour = timestamp.hour() as usize;
            weights[hour] += 1;
            sums[hour] = Some(sums[hour].map_or(value, |sum| sum + value));
        }
        array::from_fn(|hour| sums[hour].map(|sum| sum / f64::from(weights[hour])))
    }
}

fn compare<V: PartialOrd>(lhs: &V, rhs: &V) -> Ordering {
    lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)
}
