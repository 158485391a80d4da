/// Running statistics for one station.
///
/// The mean is never stored; it is always `sum / count` so it cannot drift
/// from the observed values.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Statistics {
    pub minimum: f64,
    pub maximum: f64,
    pub sum: f64,
    pub count: u64,
}

impl Statistics {
    /// Seeds a record from its first observation.
    pub fn new(value: f64) -> Self {
        Self {
            minimum: value,
            maximum: value,
            sum: value,
            count: 1,
        }
    }

    /// Folds one more observation into the record.
    ///
    /// Strict comparisons mean a NaN observation never displaces an existing
    /// extremum, while a NaN seed is never displaced either.
    #[inline(always)]
    pub fn update(&mut self, value: f64) {
        if value < self.minimum {
            self.minimum = value;
        }

        if value > self.maximum {
            self.maximum = value;
        }

        self.sum += value;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Combines two independently built records for the same station.
    pub fn merge(&mut self, other: &Statistics) {
        if other.minimum < self.minimum {
            self.minimum = other.minimum;
        }

        if other.maximum > self.maximum {
            self.maximum = other.maximum;
        }

        self.sum += other.sum;
        self.count += other.count;
    }
}
