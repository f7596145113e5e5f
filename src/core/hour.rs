use std::{fmt::Formatter, ops::Range};

use serde::Serialize;

/// One-based label of an hourly slot: label `H` covers the wall-clock hour `(H-1):00..H:00`.
///
/// Label `1` is midnight to 1 AM, label `24` is the last hour of the day.
/// Array positions are zero-based, so label `H` lives at index `H - 1`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, derive_more::Into)]
#[serde(transparent)]
pub struct HourLabel(u8);

impl HourLabel {
    pub const N_HOURS: usize = 24;

    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(24);

    /// All the labels in ascending order.
    #[expect(clippy::cast_possible_truncation)]
    pub const ALL: [Self; Self::N_HOURS] = {
        let mut labels = [Self::FIRST; Self::N_HOURS];
        let mut index = 0;
        while index < Self::N_HOURS {
            labels[index] = Self(index as u8 + 1);
            index += 1;
        }
        labels
    };

    /// Validate the one-based label.
    pub const fn new(label: u8) -> Option<Self> {
        if label >= 1 && label <= 24 { Some(Self(label)) } else { None }
    }

    /// Zero-based array index of the label.
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Label of the slot which contains the wall-clock hour `0..=23`.
    ///
    /// Hour `0` maps onto label `1`, hour `23` onto label `24`.
    pub const fn of_wall_clock(hour: u32) -> Self {
        Self::ALL[(hour % 24) as usize]
    }

    /// Label of the slot which a quarter-hour sample timestamped at `hour:minute` belongs to.
    ///
    /// The sample closes its quarter-hour delivery period, so `:15`, `:30`, and `:45` belong
    /// to the slot of the same wall-clock hour, while `:00` closes the previous slot.
    /// Midnight closes label `24` of the previous day.
    /// Returns [`None`] for the minutes off the quarter-hour grid.
    pub const fn of_quarter(hour: u32, minute: u32) -> Option<Self> {
        match minute {
            0 if hour % 24 == 0 => Some(Self::LAST),
            0 => Some(Self::ALL[(hour % 24) as usize - 1]),
            15 | 30 | 45 => Some(Self::of_wall_clock(hour)),
            _ => None,
        }
    }

    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub const fn half(self) -> Half {
        if self.0 <= 12 { Half::Am } else { Half::Pm }
    }

    /// Wall-clock start of the slot, `HH:00`.
    pub fn window_start(self) -> String {
        format!("{:02}:00", self.0 - 1)
    }
}

impl std::fmt::Display for HourLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::fmt::Debug for HourLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.0)
    }
}

/// Half of the day: labels `1..=12` and `13..=24`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Half {
    Am,
    Pm,
}

impl Half {
    /// Zero-based index range of the half.
    pub const fn indices(self) -> Range<usize> {
        match self {
            Self::Am => 0..12,
            Self::Pm => 12..24,
        }
    }
}
