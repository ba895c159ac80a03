use std::fmt;

use serde::Serialize;

use super::policy::AchievementPolicy;
use super::types::SimulationState;

/// One-time milestones unlocked during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstHundredSaved,
    EcoWarrior,
    WeekVeteran,
    PerfectBalance,
}

impl Achievement {
    /// Evaluation order; also the order unlocks are reported within one hour.
    pub const ALL: [Achievement; 4] = [
        Self::FirstHundredSaved,
        Self::EcoWarrior,
        Self::WeekVeteran,
        Self::PerfectBalance,
    ];

    /// Returns `true` if `state` meets this achievement's threshold.
    pub fn is_met(self, state: &SimulationState, policy: &AchievementPolicy) -> bool {
        match self {
            Self::FirstHundredSaved => state.cumulative_savings >= policy.savings_milestone,
            Self::EcoWarrior => state.emissions_saved_kg >= policy.eco_warrior_kg,
            Self::WeekVeteran => state.current_day >= policy.veteran_day,
            Self::PerfectBalance => {
                state.satisfaction >= policy.balance_satisfaction
                    && state.cumulative_savings >= policy.balance_savings
            }
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstHundredSaved => "First $100 Saved",
            Self::EcoWarrior => "Eco Warrior",
            Self::WeekVeteran => "Week Veteran",
            Self::PerfectBalance => "Perfect Balance",
        };
        f.write_str(name)
    }
}

/// Adds every newly met achievement to `state` and returns them.
///
/// Already unlocked achievements are never added again.
pub fn unlock_new(state: &mut SimulationState, policy: &AchievementPolicy) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    for achievement in Achievement::ALL {
        if !state.unlocked_achievements.contains(&achievement) && achievement.is_met(state, policy)
        {
            state.unlocked_achievements.push(achievement);
            unlocked.push(achievement);
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_once() {
        let policy = AchievementPolicy::default();
        let mut state = SimulationState::new(100);
        state.cumulative_savings = 150.0;

        let first = unlock_new(&mut state, &policy);
        assert_eq!(
            first,
            vec![Achievement::FirstHundredSaved, Achievement::PerfectBalance]
        );
        let second = unlock_new(&mut state, &policy);
        assert!(second.is_empty());
        assert_eq!(state.unlocked_achievements.len(), 2);
    }

    #[test]
    fn perfect_balance_needs_both_conditions() {
        let policy = AchievementPolicy::default();
        let mut state = SimulationState::new(94);
        state.cumulative_savings = 60.0;
        assert!(!Achievement::PerfectBalance.is_met(&state, &policy));
        state.satisfaction = 95;
        assert!(Achievement::PerfectBalance.is_met(&state, &policy));
        state.cumulative_savings = 49.99;
        assert!(!Achievement::PerfectBalance.is_met(&state, &policy));
    }

    #[test]
    fn veteran_and_eco_thresholds() {
        let policy = AchievementPolicy::default();
        let mut state = SimulationState::new(100);
        state.current_day = 6;
        state.emissions_saved_kg = 49.9;
        assert!(!Achievement::WeekVeteran.is_met(&state, &policy));
        assert!(!Achievement::EcoWarrior.is_met(&state, &policy));
        state.current_day = 7;
        state.emissions_saved_kg = 50.0;
        assert!(Achievement::WeekVeteran.is_met(&state, &policy));
        assert!(Achievement::EcoWarrior.is_met(&state, &policy));
    }

    #[test]
    fn display_names() {
        assert_eq!(Achievement::FirstHundredSaved.to_string(), "First $100 Saved");
        assert_eq!(Achievement::PerfectBalance.to_string(), "Perfect Balance");
    }
}
