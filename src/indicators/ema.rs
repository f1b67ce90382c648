/// Exponential moving average, incremental.
///
/// Matches pandas `ewm(span=window, adjust=False).mean()`:
///   bar 0  → value = price (seeded by the first observation)
///   bar 1+ → value = α·price + (1−α)·prev   where α = 2/(span+1)
///
/// Every earlier observation keeps a (geometrically shrinking) weight,
/// so there is no warm-up window before the value is usable.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            value: None,
        }
    }

    /// Feed one observation, return the updated average.
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            None => price,
            Some(prev) => self.alpha * price + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Smooth a whole slice with a fresh [`Ema`].
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = Ema::new(span);
    values.iter().map(|&v| ema.update(v)).collect()
}
