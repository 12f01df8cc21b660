use {
    super::*,
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Hash, PartialEq)]
#[repr(usize)]
pub enum Resource {
    Ore,
    Clay,
    Obsidian,
    Geode,
}

pub type ResourceCounts = [u32; Resource::COUNT];

/// Per-robot build costs, indexed as `costs[robot as usize][resource as usize]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Blueprint {
    pub costs: [ResourceCounts; Resource::COUNT],
}

/// The optimizer branches per robot built, not per tick, so its recursion depth is bounded by the
/// robot count rather than the budget. Budgets past this threshold aren't meaningfully bounded by
/// the optimistic-geode prune and aren't supported.
pub const MAX_TIME_BUDGET: u32 = 32_u32;

#[derive(Debug, PartialEq)]
pub enum ProductionError {
    /// A robot kind with an all-zero cost could be built every tick forever.
    FreeRobot(Resource),
    TimeBudgetTooLarge(u32),
}

struct ProductionSearch<'b> {
    blueprint: &'b Blueprint,

    /// The most of each resource any single build can consume. Owning more robots of a kind than
    /// this can't increase throughput, so such branches are skipped. The geode slot is `u32::MAX`:
    /// geode robots are always worth building.
    max_costs: ResourceCounts,
    best: u32,
}

impl<'b> ProductionSearch<'b> {
    const GEODE: usize = Resource::Geode as usize;

    fn run(&mut self, time: u32, robots: ResourceCounts, resources: ResourceCounts) {
        // Doing nothing further is always an option.
        let baseline: u32 = resources[Self::GEODE] + robots[Self::GEODE] * time;

        self.best = self.best.max(baseline);

        if time <= 1_u32 {
            return;
        }

        // Optimistic upper bound: a new geode robot every remaining tick.
        if baseline + triangle_number(time - 1_u32) <= self.best {
            return;
        }

        for robot in Resource::iter() {
            let robot_index: usize = robot as usize;

            if robots[robot_index] >= self.max_costs[robot_index] {
                continue;
            }

            let costs: &ResourceCounts = &self.blueprint.costs[robot_index];

            if costs
                .iter()
                .zip(robots.iter())
                .any(|(&cost, &rate)| cost > 0_u32 && rate == 0_u32)
            {
                continue;
            }

            // Ticks until the costs are covered, plus the build tick itself.
            let wait: u32 = costs
                .iter()
                .zip(robots.iter().zip(resources.iter()))
                .map(|(&cost, (&rate, &have))| {
                    if cost <= have {
                        0_u32
                    } else {
                        (cost - have).div_ceil(rate)
                    }
                })
                .max()
                .unwrap()
                + 1_u32;

            // The new robot needs at least one tick of output to matter.
            if wait >= time {
                continue;
            }

            let mut next_robots: ResourceCounts = robots;
            let mut next_resources: ResourceCounts = resources;

            for resource_index in 0_usize..Resource::COUNT {
                next_resources[resource_index] = resources[resource_index]
                    + robots[resource_index] * wait
                    - costs[resource_index];
            }

            next_robots[robot_index] += 1_u32;
            self.run(time - wait, next_robots, next_resources);
        }
    }
}

/// Maximizes the geode count reachable within `time_budget` ticks, starting from one ore robot and
/// empty stockpiles.
pub fn optimize_production(
    blueprint: &Blueprint,
    time_budget: u32,
) -> Result<u32, ProductionError> {
    use ProductionError::*;

    if time_budget > MAX_TIME_BUDGET {
        return Err(TimeBudgetTooLarge(time_budget));
    }

    let mut max_costs: ResourceCounts = ResourceCounts::default();

    for robot in Resource::iter() {
        let costs: &ResourceCounts = &blueprint.costs[robot as usize];

        if *costs == ResourceCounts::default() {
            return Err(FreeRobot(robot));
        }

        for (max_cost, &cost) in max_costs.iter_mut().zip(costs.iter()) {
            *max_cost = (*max_cost).max(cost);
        }
    }

    max_costs[Resource::Geode as usize] = u32::MAX;

    let mut search: ProductionSearch = ProductionSearch {
        blueprint,
        max_costs,
        best: 0_u32,
    };
    let mut robots: ResourceCounts = ResourceCounts::default();

    robots[Resource::Ore as usize] = 1_u32;
    search.run(time_budget, robots, ResourceCounts::default());

    Ok(search.best)
}
