use {
    crate::*,
    nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::multispace1,
        combinator::map,
        error::Error,
        multi::{many0, many1, separated_list1},
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
    rayon::iter::{IntoParallelRefIterator, ParallelIterator},
};

impl Parse for Resource {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        alt((
            map(tag("ore"), |_| Self::Ore),
            map(tag("clay"), |_| Self::Clay),
            map(tag("obsidian"), |_| Self::Obsidian),
            map(tag("geode"), |_| Self::Geode),
        ))(input)
    }
}

/// One "Each <robot> robot costs <amount> <resource>[ and <amount> <resource>]*." clause.
fn parse_robot_costs<'i>(input: &'i str) -> IResult<&'i str, (Resource, ResourceCounts)> {
    map(
        tuple((
            preceded(tag("Each "), Resource::parse),
            preceded(
                tag(" robot costs "),
                separated_list1(
                    tag(" and "),
                    tuple((
                        terminated(parse_integer::<u32>, tag(" ")),
                        Resource::parse,
                    )),
                ),
            ),
            tag("."),
        )),
        |(robot, cost_clauses, _)| {
            let mut costs: ResourceCounts = ResourceCounts::default();

            for (amount, resource) in cost_clauses {
                costs[resource as usize] += amount;
            }

            (robot, costs)
        },
    )(input)
}

#[derive(Debug, PartialEq)]
struct IdBlueprint {
    id: u32,
    blueprint: Blueprint,
}

impl Parse for IdBlueprint {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                preceded(tag("Blueprint "), parse_integer::<u32>),
                tag(":"),
                many1(preceded(multispace1, parse_robot_costs)),
            )),
            |(id, _, robot_costs)| {
                let mut blueprint: Blueprint = Blueprint::default();

                for (robot, costs) in robot_costs {
                    blueprint.costs[robot as usize] = costs;
                }

                Self { id, blueprint }
            },
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<IdBlueprint>);

impl Solution {
    const Q1_TIME_BUDGET: u32 = 24_u32;
    const Q2_TIME_BUDGET: u32 = 32_u32;
    const Q2_BLUEPRINT_COUNT: usize = 3_usize;

    fn quality_level_sum(&self) -> Result<u32, ProductionError> {
        self.0
            .par_iter()
            .map(|id_blueprint| {
                optimize_production(&id_blueprint.blueprint, Self::Q1_TIME_BUDGET)
                    .map(|geodes| id_blueprint.id * geodes)
            })
            .sum()
    }

    fn max_geode_product(&self) -> Result<u32, ProductionError> {
        self.0[..self.0.len().min(Self::Q2_BLUEPRINT_COUNT)]
            .par_iter()
            .map(|id_blueprint| {
                optimize_production(&id_blueprint.blueprint, Self::Q2_TIME_BUDGET)
            })
            .product()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many0(terminated(IdBlueprint::parse, many0(multispace1))),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.quality_level_sum());
    }

    /// Eight extra minutes per blueprint, but only the first three blueprints survive.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.max_geode_product());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = "\
        Blueprint 1: \
        Each ore robot costs 4 ore. \
        Each clay robot costs 2 ore. \
        Each obsidian robot costs 3 ore and 14 clay. \
        Each geode robot costs 2 ore and 7 obsidian.\n\
        Blueprint 2: \
        Each ore robot costs 2 ore. \
        Each clay robot costs 3 ore. \
        Each obsidian robot costs 3 ore and 8 clay. \
        Each geode robot costs 3 ore and 12 obsidian.\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_solution_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 2_usize);
        assert_eq!(
            solution.0.first(),
            Some(&IdBlueprint {
                id: 1_u32,
                blueprint: Blueprint {
                    costs: [
                        [4_u32, 0_u32, 0_u32, 0_u32],
                        [2_u32, 0_u32, 0_u32, 0_u32],
                        [3_u32, 14_u32, 0_u32, 0_u32],
                        [2_u32, 0_u32, 7_u32, 0_u32],
                    ],
                },
            })
        );
    }

    #[test]
    fn test_quality_level_sum() {
        assert_eq!(solution().quality_level_sum(), Ok(33_u32));
    }

    #[test]
    fn test_max_geode_product() {
        assert_eq!(solution().max_geode_product(), Ok(3472_u32));
    }
}
