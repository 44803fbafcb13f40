use std::ops::{Add, AddAssign};

/// Running totals over finished episodes
///
/// Only an explicit flush ([`crate::game::Game::flush_stats`]) clears them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EpisodeStats {
    pub episodes: u64,
    pub player_wins: u64,
    pub total_reward: f32,
    /// Half-moves played, summed over episodes
    pub total_length: u64,
}

impl EpisodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished episode with its final reward and length in half-moves
    pub fn record(&mut self, reward: f32, length: u32) {
        self.episodes += 1;
        if reward > 0.0 {
            self.player_wins += 1;
        }
        self.total_reward += reward;
        self.total_length += length as u64;
    }

    pub fn win_rate(&self) -> f32 {
        self.per_episode(self.player_wins as f32)
    }

    pub fn mean_reward(&self) -> f32 {
        self.per_episode(self.total_reward)
    }

    pub fn mean_length(&self) -> f32 {
        self.per_episode(self.total_length as f32)
    }

    fn per_episode(&self, total: f32) -> f32 {
        if self.episodes == 0 {
            0.0
        } else {
            total / self.episodes as f32
        }
    }
}

impl AddAssign for EpisodeStats {
    fn add_assign(&mut self, other: Self) {
        self.episodes += other.episodes;
        self.player_wins += other.player_wins;
        self.total_reward += other.total_reward;
        self.total_length += other.total_length;
    }
}

impl Add for EpisodeStats {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}
