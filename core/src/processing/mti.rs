/// Moving-target-indication filter: exponential-moving-average background
/// subtraction per bin across successive frames.
///
/// `alpha` close to 0 keeps a long background memory, close to 1 tracks the
/// input quickly. The history lives as long as the filter; [`MtiFilter::init`]
/// is the only way to reset it.
#[derive(Debug, Clone)]
pub struct MtiFilter {
    alpha: f32,
    history: Vec<f32>,
}

impl MtiFilter {
    pub fn new(alpha: f32, len: usize) -> Self {
        let mut filter = Self {
            alpha,
            history: Vec::new(),
        };
        filter.init(alpha, len);
        filter
    }

    /// Zeroes the history for `len` bins and stores `alpha`.
    pub fn init(&mut self, alpha: f32, len: usize) {
        assert!((0.0..=1.0).contains(&alpha), "MTI alpha {} outside [0, 1]", alpha);
        self.alpha = alpha;
        self.history.clear();
        self.history.resize(len, 0.0);
    }

    /// `output[i] = input[i] - history[i]`, then `history[i] += alpha * output[i]`.
    pub fn apply(&mut self, input: &[f32], output: &mut [f32]) {
        assert_eq!(input.len(), self.history.len(), "MTI input length");
        assert_eq!(output.len(), self.history.len(), "MTI output length");

        for ((out, &sample), past) in output.iter_mut().zip(input).zip(self.history.iter_mut()) {
            *out = sample - *past;
            *past += self.alpha * *out;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn history(&self) -> &[f32] {
        &self.history
    }
}
