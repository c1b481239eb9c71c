/// Returns and lengths of completed episodes across a batch.
#[derive(Clone, Debug, Default)]
pub struct EpisodeStats {
    running_return: Vec<f32>,
    running_length: Vec<u32>,
    /// Sum of returns of completed episodes.
    pub total_return: f32,
    /// Sum of lengths of completed episodes.
    pub total_steps: u64,
    pub episode_count: u32,
}

impl EpisodeStats {
    #[must_use]
    pub fn new(num_envs: usize) -> Self {
        Self {
            running_return: vec![0.0; num_envs],
            running_length: vec![0; num_envs],
            ..Self::default()
        }
    }

    /// Accumulates one step; environments whose reset flag is raised close
    /// their episode.
    pub fn record(&mut self, rewards: &[f32], resets: &[bool]) {
        debug_assert_eq!(rewards.len(), self.running_return.len());
        debug_assert_eq!(resets.len(), self.running_return.len());
        for i in 0..rewards.len() {
            self.running_return[i] += rewards[i];
            self.running_length[i] += 1;
            if resets[i] {
                self.total_return += self.running_return[i];
                self.total_steps += u64::from(self.running_length[i]);
                self.episode_count += 1;
                self.running_return[i] = 0.0;
                self.running_length[i] = 0;
            }
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_return(&self) -> Option<f32> {
        (self.episode_count > 0).then(|| self.total_return / self.episode_count as f32)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_length(&self) -> Option<f32> {
        (self.episode_count > 0).then(|| self.total_steps as f32 / self.episode_count as f32)
    }

    /// Forgets completed episodes; episodes in progress keep accumulating.
    pub fn clear(&mut self) {
        self.total_return = 0.0;
        self.total_steps = 0;
        self.episode_count = 0;
    }
}
