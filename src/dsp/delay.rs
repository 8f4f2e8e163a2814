/// Circular delay line. Capacity is fixed at construction; nothing allocates afterwards.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Room for delays of up to `max_delay_samples`.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(1) + 1],
            write_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1
    }

    /// The sample written `delay_samples` writes ago.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(1, len - 1);
        let read_pos = (self.write_pos + len - delay_samples) % len;
        self.buffer[read_pos]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Plain delay without feedback.
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(sample);
        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples);
        }
    }
}
