quantity!(
    /// Market price in Polish złoty per megawatt-hour.
    MegawattHourPrice, via: f64, suffix: "PLN/MWh", precision: 2
);

impl MegawattHourPrice {
    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(MegawattHourPrice(412.5).to_string(), "412.50 PLN/MWh");
    }

    #[test]
    fn test_ordering() {
        assert!(MegawattHourPrice(-10.0) < MegawattHourPrice(0.0));
        assert_eq!(MegawattHourPrice(1.5).max(MegawattHourPrice(1.25)), MegawattHourPrice(1.5));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(MegawattHourPrice::from_str("512.34").unwrap(), MegawattHourPrice(512.34));
        assert!(MegawattHourPrice::from_str("n/a").is_err());
    }

    #[test]
    fn test_sum_and_div() {
        let total: MegawattHourPrice =
            [MegawattHourPrice(1.0), MegawattHourPrice(2.0)].into_iter().sum();
        assert_eq!(total / 2.0, MegawattHourPrice(1.5));
    }

    #[test]
    fn test_round() {
        let total: MegawattHourPrice =
            [412.5, 412.0, 412.0, 412.0].into_iter().map(MegawattHourPrice).sum();
        let mean = total / 4.0;
        assert_eq!(mean.round(2), MegawattHourPrice(412.12));
        assert_eq!(MegawattHourPrice(2.675).round(2), MegawattHourPrice(2.67));
    }

    #[test]
    fn test_serialize_transparent() {
        assert_eq!(serde_json::to_string(&MegawattHourPrice(1.5)).unwrap(), "1.5");
    }
}
