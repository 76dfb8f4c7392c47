/// Flat energy tariff used for every cost figure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tariff {
    rate_per_kwh: f64,
    currency: String,
}

impl Tariff {
    pub fn new(rate_per_kwh: f64, currency: impl Into<String>) -> Self {
        Self {
            rate_per_kwh,
            currency: currency.into(),
        }
    }

    pub fn rate_per_kwh(&self) -> f64 {
        self.rate_per_kwh
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn cost(&self, energy_kwh: f64) -> f64 {
        energy_kwh * self.rate_per_kwh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_scales_with_rate() {
        let tariff = Tariff::new(0.80, "BRL");
        assert!((tariff.cost(10.0) - 8.0).abs() < 1e-12);
        assert_eq!(Tariff::new(1.5, "EUR").cost(2.0), 3.0);
        assert_eq!(tariff.currency(), "BRL");
    }
}
