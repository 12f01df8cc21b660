use {super::*, std::collections::HashMap};

/// A reward graph collapsed to its reward-bearing vertices: all-pairs travel times between them
/// (computed by the caller, typically via `breadth_first_graph_distances`), travel times from the
/// shared start, and the per-tick reward rate each vertex yields once activated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RewardNetwork {
    /// `travel[from][to]`, in ticks. Square, indexed like `rates`.
    pub travel: Vec<Vec<u32>>,

    /// Travel time from the shared start vertex to each target.
    pub from_start: Vec<u32>,

    /// Reward accrued per tick once a target is activated.
    pub rates: Vec<u32>,
}

/// Claimed targets are tracked in a `u16` mask.
pub const MAX_TARGETS: usize = u16::BITS as usize;

/// The soonest an unclaimed target can start producing: at least one tick of travel plus the
/// activation tick. Only used to tighten the optimistic pruning bound; correctness doesn't depend
/// on distances actually being >= 1.
const MIN_ACTIVATION_TICKS: u32 = 2_u32;

#[derive(Debug, PartialEq)]
pub enum AgentSearchError {
    MismatchedLengths {
        travel: usize,
        from_start: usize,
        rates: usize,
    },
    TooManyTargets(usize),
    UnreachableTarget(usize),
}

/// One agent: the target it last committed to (`START` before any assignment) and the ticks left
/// until that target's reward starts accruing. `eta == 0` means the agent is ready for a new
/// assignment; `eta == DONE` means it has retired.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
struct AgentState {
    at: u8,
    eta: u8,
}

impl AgentState {
    const START: u8 = u8::MAX;
    const DONE: u8 = u8::MAX;

    const fn initial() -> Self {
        Self {
            at: Self::START,
            eta: 0_u8,
        }
    }

    const fn retired() -> Self {
        Self {
            at: Self::START,
            eta: Self::DONE,
        }
    }
}

/// Memo key for tick-advance states. The agent pair is sorted, so two searches that differ only by
/// which agent is labeled first share entries.
#[derive(Eq, Hash, PartialEq)]
struct MemoKey {
    time_left: u8,
    claimed: u16,
    agents: [AgentState; 2_usize],
    score: u32,
    rate: u32,
}

struct AgentSearch<'n> {
    network: &'n RewardNetwork,
    memo: HashMap<MemoKey, u32>,
    best: u32,
}

impl<'n> AgentSearch<'n> {
    fn new(network: &'n RewardNetwork) -> Self {
        Self {
            network,
            memo: HashMap::new(),
            best: 0_u32,
        }
    }

    /// Best reward still reachable by any unclaimed or in-transit target, assuming everything
    /// activates as early as physically possible.
    fn optimistic_bound(
        &self,
        time_left: u8,
        claimed: u16,
        agents: &[AgentState; 2_usize],
        score: u32,
        rate: u32,
    ) -> u32 {
        let time_left: u32 = time_left as u32;
        let mut bound: u32 = score + rate * time_left;

        for agent in agents {
            if agent.eta != 0_u8 && agent.eta != AgentState::DONE {
                bound += self.network.rates[agent.at as usize]
                    * time_left.saturating_sub(agent.eta as u32);
            }
        }

        for (target, &target_rate) in self.network.rates.iter().enumerate() {
            if claimed & (1_u16 << target) == 0_u16 {
                bound += target_rate * time_left.saturating_sub(MIN_ACTIVATION_TICKS);
            }
        }

        bound
    }

    fn run(
        &mut self,
        time_left: u8,
        claimed: u16,
        agents: [AgentState; 2_usize],
        score: u32,
        rate: u32,
    ) -> u32 {
        if time_left == 0_u8 {
            self.best = self.best.max(score);

            return score;
        }

        // Assignment phase: any ready agent commits to an unclaimed target, or retires. Claiming
        // at commit time means two agents can never pick the same target in the same tick.
        if let Some(agent_index) = agents.iter().position(|agent| agent.eta == 0_u8) {
            let agent: AgentState = agents[agent_index];
            let mut retired_agents: [AgentState; 2_usize] = agents;

            retired_agents[agent_index] = AgentState::retired();

            let mut best: u32 = self.run(time_left, claimed, retired_agents, score, rate);

            for target in 0_usize..self.network.rates.len() {
                let target_bit: u16 = 1_u16 << target;

                if claimed & target_bit != 0_u16 {
                    continue;
                }

                let distance: u32 = if agent.at == AgentState::START {
                    self.network.from_start[target]
                } else {
                    self.network.travel[agent.at as usize][target]
                };
                let eta: u32 = distance + 1_u32;

                // The target needs at least one tick of accrual to matter.
                if eta >= time_left as u32 {
                    continue;
                }

                let mut next_agents: [AgentState; 2_usize] = agents;

                next_agents[agent_index] = AgentState {
                    at: target as u8,
                    eta: eta as u8,
                };
                best = best.max(self.run(time_left, claimed | target_bit, next_agents, score, rate));
            }

            return best;
        }

        // Tick phase: both agents are in transit or retired.
        let mut canonical_agents: [AgentState; 2_usize] = agents;

        canonical_agents.sort_unstable();

        let memo_key: MemoKey = MemoKey {
            time_left,
            claimed,
            agents: canonical_agents,
            score,
            rate,
        };

        if let Some(&memoized) = self.memo.get(&memo_key) {
            return memoized;
        }

        if self.optimistic_bound(time_left, claimed, &canonical_agents, score, rate) <= self.best {
            // This subtree can't beat a score already found; `score` is still an achievable value,
            // so returning it never inflates an ancestor's max.
            return score;
        }

        let mut next_agents: [AgentState; 2_usize] = canonical_agents;
        let mut next_rate: u32 = rate;

        for agent in next_agents.iter_mut() {
            if agent.eta != AgentState::DONE {
                agent.eta -= 1_u8;

                if agent.eta == 0_u8 {
                    next_rate += self.network.rates[agent.at as usize];
                }
            }
        }

        let result: u32 = self.run(time_left - 1_u8, claimed, next_agents, score + rate, next_rate);

        self.memo.insert(memo_key, result);

        result
    }
}

fn validate(network: &RewardNetwork) -> Result<(), AgentSearchError> {
    use AgentSearchError::*;

    let target_count: usize = network.rates.len();

    if network.travel.len() != target_count
        || network.from_start.len() != target_count
        || network
            .travel
            .iter()
            .any(|travel_row| travel_row.len() != target_count)
    {
        return Err(MismatchedLengths {
            travel: network.travel.len(),
            from_start: network.from_start.len(),
            rates: target_count,
        });
    }

    if target_count > MAX_TARGETS {
        return Err(TooManyTargets(target_count));
    }

    for (target, &distance) in network.from_start.iter().enumerate() {
        if distance == UNDISCOVERED {
            return Err(UnreachableTarget(target));
        }
    }

    for travel_row in network.travel.iter() {
        for (target, &distance) in travel_row.iter().enumerate() {
            if distance == UNDISCOVERED {
                return Err(UnreachableTarget(target));
            }
        }
    }

    Ok(())
}

fn optimize(network: &RewardNetwork, time_budget: u8, agents: [AgentState; 2_usize]) -> u32 {
    AgentSearch::new(network).run(time_budget, 0_u16, agents, 0_u32, 0_u32)
}

/// Maximum total reward a single agent can accrue within `time_budget` ticks.
pub fn optimize_single_agent(
    network: &RewardNetwork,
    time_budget: u8,
) -> Result<u32, AgentSearchError> {
    validate(network)?;

    Ok(optimize(
        network,
        time_budget,
        [AgentState::initial(), AgentState::retired()],
    ))
}

/// Maximum total reward two cooperating agents can accrue within `time_budget` ticks. Both agents
/// start at the shared start vertex; each target can only be activated once.
pub fn optimize_multi_agent(
    network: &RewardNetwork,
    time_budget: u8,
) -> Result<u32, AgentSearchError> {
    validate(network)?;

    Ok(optimize(
        network,
        time_budget,
        [AgentState::initial(), AgentState::initial()],
    ))
}
