use std::{
    iter::Sum,
    ops::{Add, Div},
};

use itertools::Itertools;

impl<T> Aggregate for T where T: ?Sized {}

pub trait Aggregate {
    #[must_use]
    fn median<V>(self) -> Option<V>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Copy + Add<Output = V> + Div<f64, Output = V> + Ord,
    {
        let mut values = self.into_iter().collect_vec();
        if values.is_empty() {
            None
        } else {
            values.sort_unstable();
            let index = values.len() / 2;
            if values.len() % 2 == 1 {
                Some(values[index])
            } else {
                Some((values[index - 1] + values[index]) / 2.0)
            }
        }
    }

    #[must_use]
    fn mean<V>(self) -> Option<V>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Sum + Div<f64, Output = V>,
    {
        let mut n_values = 0_u32;
        let sum: V = self.into_iter().inspect(|_| n_values += 1).sum();
        (n_values != 0).then(|| sum / f64::from(n_values))
    }
}
