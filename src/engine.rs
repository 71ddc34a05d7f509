pub const SAMPLE_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendUpdate {
    pub average: u32,
    pub trend: Trend,
}

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: [u32; SAMPLE_WINDOW],
    cursor: usize,
    primed: bool,
}

impl SampleBuffer {
    pub fn new() -> Self {
        return SampleBuffer {
            samples: [0; SAMPLE_WINDOW],
            cursor: 0,
            primed: false,
        };
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    pub fn push(&mut self, value: u32) {
        // First reading primes every slot so the early average is not biased
        // toward zero
        if !self.primed {
            self.samples = [value; SAMPLE_WINDOW];
            self.primed = true;
            return;
        }
        self.samples[self.cursor] = value;
        self.cursor = (self.cursor + 1) % SAMPLE_WINDOW;
    }

    pub fn average(&self) -> u32 {
        let sum: u64 = self.samples.iter().map(|&sample| u64::from(sample)).sum();
        return (sum / SAMPLE_WINDOW as u64) as u32;
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// Spikes are not rejected; a bad reading pollutes the average for at most
// SAMPLE_WINDOW further readings and then decays out of the window.
#[derive(Debug, Clone)]
pub struct TrendEngine {
    buffer: SampleBuffer,
    previous_average: u32,
    average: u32,
    trend: Trend,
}

impl TrendEngine {
    pub fn new() -> Self {
        return TrendEngine {
            buffer: SampleBuffer::new(),
            previous_average: 0,
            average: 0,
            trend: Trend::Flat,
        };
    }

    pub fn accept(&mut self, raw: u32) -> TrendUpdate {
        // First reading seeds the baseline, so the first update is Flat
        if !self.buffer.is_primed() {
            self.previous_average = raw;
        }
        self.buffer.push(raw);

        let average = self.buffer.average();
        self.trend = if self.previous_average < average {
            Trend::Up
        } else if self.previous_average > average {
            Trend::Down
        } else {
            Trend::Flat
        };
        self.previous_average = average;
        self.average = average;

        return TrendUpdate {
            average,
            trend: self.trend,
        };
    }

    pub fn average(&self) -> u32 {
        self.average
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self::new()
    }
}
