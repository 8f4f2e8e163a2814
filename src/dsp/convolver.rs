use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::EngineError;

/*
Partitioned Convolution
=======================

Direct convolution with a two second impulse response costs ~96k multiplies
per output sample at 48 kHz. Splitting the response into blocks of N samples
and convolving each block in the frequency domain brings that down to a
handful of FFTs per N samples.

  impulse response   | h0 | h1 | h2 | ... | hP-1 |      P partitions of N
  input blocks       ... | x(j-2) | x(j-1) | x(j) |

  Y(j) = Σk  X(j-k) · H(k)

Each X is the FFT of the last 2N input samples (previous block + current
block), each H the FFT of one partition zero-padded to 2N. After the inverse
FFT only the last N samples are free of circular wrap-around (overlap-save),
and those are the output block.

Latency is one block: the output for block j is computed once block j is
complete and played back while block j+1 is being gathered.

Everything is allocated in `new`. `process` never allocates.
*/

type Spectrum = Vec<Complex<f32>>;

fn try_zeroed(len: usize) -> Result<Spectrum, EngineError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| EngineError::exhausted(format!("convolver buffer of {len} bins: {e}")))?;
    buffer.resize(len, Complex::new(0.0, 0.0));
    Ok(buffer)
}

pub struct PartitionedConvolver {
    block: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,

    partitions: Vec<Spectrum>,
    history: Vec<Spectrum>,
    history_pos: usize,

    window: Vec<f32>,
    fill: usize,
    output: Vec<f32>,

    accumulator: Spectrum,
    scratch: Spectrum,
}

impl PartitionedConvolver {
    /// Prepare a convolver for `impulse` using blocks of `block` samples.
    ///
    /// `block` is rounded up to a power of two.
    pub fn new(impulse: &[f32], block: usize) -> Result<Self, EngineError> {
        let block = block.max(1).next_power_of_two();
        let size = block * 2;

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let mut scratch = try_zeroed(scratch_len)?;

        let count = impulse.len().div_ceil(block).max(1);
        let mut partitions = Vec::new();
        partitions
            .try_reserve_exact(count)
            .map_err(|e| EngineError::exhausted(format!("{count} convolver partitions: {e}")))?;
        for index in 0..count {
            let mut spectrum = try_zeroed(size)?;
            let start = (index * block).min(impulse.len());
            let end = (start + block).min(impulse.len());
            for (bin, &sample) in spectrum.iter_mut().zip(&impulse[start..end]) {
                bin.re = sample;
            }
            forward.process_with_scratch(&mut spectrum, &mut scratch);
            partitions.push(spectrum);
        }

        let mut history = Vec::new();
        history
            .try_reserve_exact(count)
            .map_err(|e| EngineError::exhausted(format!("{count} convolver history slots: {e}")))?;
        for _ in 0..count {
            history.push(try_zeroed(size)?);
        }

        Ok(Self {
            block,
            forward,
            inverse,
            partitions,
            history,
            history_pos: 0,
            window: vec![0.0; size],
            fill: 0,
            output: vec![0.0; block],
            accumulator: try_zeroed(size)?,
            scratch,
        })
    }

    /// Block size, which is also the latency in samples.
    pub fn latency(&self) -> usize {
        self.block
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let out = self.output[self.fill];
        self.window[self.block + self.fill] = sample;
        self.fill += 1;

        if self.fill == self.block {
            self.convolve_block();
            self.fill = 0;
        }
        out
    }

    pub fn render(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &sample) in output.iter_mut().zip(input) {
            *out = self.process(sample);
        }
    }

    fn convolve_block(&mut self) {
        let count = self.partitions.len();
        self.history_pos = (self.history_pos + 1) % count;

        let current = &mut self.history[self.history_pos];
        for (bin, &sample) in current.iter_mut().zip(&self.window) {
            *bin = Complex::new(sample, 0.0);
        }
        self.forward.process_with_scratch(current, &mut self.scratch);

        self.accumulator.fill(Complex::new(0.0, 0.0));
        for (k, partition) in self.partitions.iter().enumerate() {
            let spectrum = &self.history[(self.history_pos + count - k) % count];
            for ((acc, &x), &h) in self.accumulator.iter_mut().zip(spectrum).zip(partition) {
                *acc += x * h;
            }
        }
        self.inverse
            .process_with_scratch(&mut self.accumulator, &mut self.scratch);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / (2 * self.block) as f32;
        for (out, bin) in self.output.iter_mut().zip(&self.accumulator[self.block..]) {
            *out = bin.re * scale;
        }

        self.window.copy_within(self.block.., 0);
    }
}
